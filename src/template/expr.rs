//! A small, sandboxed expression language for template spans.
//!
//! Expressions see nothing but the template variables, each bound under
//! [`VARIABLE_PREFIX`](super::VARIABLE_PREFIX). There is no host evaluation:
//! source text is tokenized, parsed into an expression tree by recursive
//! descent and then evaluated.
//!
//! ```text
//! expr        := or_expr ( "if" or_expr "else" expr )?
//! or_expr     := and_expr ( "or" and_expr )*
//! and_expr    := not_expr ( "and" not_expr )*
//! not_expr    := "not" not_expr | comparison
//! comparison  := additive ( CMP additive )*
//! additive    := unary ( ("+" | "-") unary )*
//! unary       := "-" unary | primary
//! primary     := STRING | INTEGER | "True" | "False" | NAME | "(" expr ")"
//! ```
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use super::VARIABLE_PREFIX;

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text.
    Str(String),
    /// A 64-bit signed integer.
    Int(i64),
    /// `True` or `False`.
    Bool(bool),
}

impl Value {
    /// Empty strings, zero and `False` are false; everything else is true.
    #[must_use]
    pub const fn truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Int(i) => *i != 0,
            Self::Bool(b) => *b,
        }
    }

    const fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "str",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
        }
    }
}

/// The text substituted into the template.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
        }
    }
}

/// Why an expression could not be evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// The source is not a well-formed expression.
    #[error("invalid syntax: {0}")]
    Syntax(String),

    /// A name that is not a bound variable.
    #[error("name '{0}' is not defined")]
    UndefinedName(String),

    /// A binary operator applied to incompatible types.
    #[error("unsupported operand type(s) for {op}: '{lhs}' and '{rhs}'")]
    UnsupportedOperands {
        /// Operator symbol.
        op: &'static str,
        /// Left operand type.
        lhs: &'static str,
        /// Right operand type.
        rhs: &'static str,
    },

    /// Unary minus applied to a non-integer.
    #[error("bad operand type for unary -: '{0}'")]
    BadUnaryOperand(&'static str),

    /// An ordering comparison between different types.
    #[error("'{op}' not supported between instances of '{lhs}' and '{rhs}'")]
    Unorderable {
        /// Operator symbol.
        op: &'static str,
        /// Left operand type.
        lhs: &'static str,
        /// Right operand type.
        rhs: &'static str,
    },

    /// Integer arithmetic left the 64-bit range.
    #[error("integer overflow")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Str(String),
    Int(i64),
    Name(String),
    Keyword(&'static str),
    Op(&'static str),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Name(n) => f.write_str(n),
            Self::Keyword(k) | Self::Op(k) => f.write_str(k),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

const KEYWORDS: [&str; 7] = ["if", "else", "and", "or", "not", "True", "False"];

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                continue;
            }
            let token = match c {
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                '+' => self.single(Token::Op("+")),
                '-' => self.single(Token::Op("-")),
                '=' | '!' | '<' | '>' => self.comparison(c)?,
                '"' | '\'' => self.string(c)?,
                '0'..='9' => self.integer()?,
                c if c == '_' || c.is_alphabetic() => self.name(),
                other => {
                    return Err(ExprError::Syntax(format!("unexpected character '{other}'")));
                }
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn single(&mut self, token: Token) -> Token {
        self.chars.next();
        token
    }

    fn comparison(&mut self, first: char) -> Result<Token, ExprError> {
        self.chars.next();
        let followed_by_eq = self.chars.next_if(|&(_, c)| c == '=').is_some();
        let op = match (first, followed_by_eq) {
            ('=', true) => "==",
            ('!', true) => "!=",
            ('<', true) => "<=",
            ('>', true) => ">=",
            ('<', false) => "<",
            ('>', false) => ">",
            _ => return Err(ExprError::Syntax(format!("unexpected character '{first}'"))),
        };
        Ok(Token::Op(op))
    }

    fn string(&mut self, quote: char) -> Result<Token, ExprError> {
        self.chars.next();
        let mut s = String::new();
        loop {
            match self.chars.next() {
                None => return Err(ExprError::Syntax("unterminated string literal".to_string())),
                Some((_, c)) if c == quote => return Ok(Token::Str(s)),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => s.push('\n'),
                    Some((_, 't')) => s.push('\t'),
                    Some((_, c @ ('\\' | '\'' | '"'))) => s.push(c),
                    Some((_, c)) => {
                        s.push('\\');
                        s.push(c);
                    }
                    None => {
                        return Err(ExprError::Syntax("unterminated string literal".to_string()));
                    }
                },
                Some((_, c)) => s.push(c),
            }
        }
    }

    fn integer(&mut self) -> Result<Token, ExprError> {
        let mut digits = String::new();
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| c.is_ascii_digit() || c == '_') {
            if c != '_' {
                digits.push(c);
            }
        }
        if self.chars.peek().is_some_and(|&(_, c)| c.is_alphanumeric()) {
            return Err(ExprError::Syntax(format!("invalid decimal literal '{digits}'")));
        }
        digits.parse().map(Token::Int).map_err(|_| ExprError::Overflow)
    }

    fn name(&mut self) -> Token {
        let mut name = String::new();
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| c == '_' || c.is_alphanumeric()) {
            name.push(c);
        }
        match KEYWORDS.iter().find(|k| **k == name) {
            Some(keyword) => Token::Keyword(*keyword),
            None => Token::Name(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn from_symbol(op: &str) -> Option<Self> {
        Some(match op {
            "==" => Self::Eq,
            "!=" => Self::Ne,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            _ => return None,
        })
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    fn apply(self, lhs: &Value, rhs: &Value) -> Result<bool, ExprError> {
        match self {
            Self::Eq => return Ok(lhs == rhs),
            Self::Ne => return Ok(lhs != rhs),
            _ => {}
        }
        let ordering = match (lhs, rhs) {
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => {
                return Err(ExprError::Unorderable {
                    op: self.symbol(),
                    lhs: lhs.type_name(),
                    rhs: rhs.type_name(),
                });
            }
        };
        Ok(match self {
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge | Self::Eq | Self::Ne => ordering != Ordering::Less,
        })
    }
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Literal(Value),
    Name(String),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare(Box<Expr>, Vec<(CmpOp, Expr)>),
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

/// Deepest expression tree the parser builds before giving up.
const MAX_DEPTH: usize = 100;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    const fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Account for one more level of tree depth.
    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::Syntax("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    /// Run `parse` one level deeper.
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Expr, ExprError>,
    ) -> Result<Expr, ExprError> {
        self.descend()?;
        let expr = parse(self);
        self.depth -= 1;
        expr
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Keyword(k)) if *k == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(token: Option<Token>) -> ExprError {
        match token {
            Some(token) => ExprError::Syntax(format!("unexpected '{token}'")),
            None => ExprError::Syntax("unexpected end of expression".to_string()),
        }
    }

    fn parse(mut self) -> Result<Expr, ExprError> {
        let expr = self.expr()?;
        match self.advance() {
            None => Ok(expr),
            token => Err(Self::unexpected(token)),
        }
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        self.nested(Self::conditional)
    }

    fn conditional(&mut self) -> Result<Expr, ExprError> {
        let then = self.or_expr()?;
        if !self.eat_keyword("if") {
            return Ok(then);
        }
        let cond = self.or_expr()?;
        if !self.eat_keyword("else") {
            return Err(Self::unexpected(self.advance()));
        }
        let otherwise = self.expr()?;
        Ok(Expr::Conditional {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn or_expr(&mut self) -> Result<Expr, ExprError> {
        let depth = self.depth;
        let mut lhs = self.and_expr()?;
        while self.eat_keyword("or") {
            self.descend()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(self.and_expr()?));
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ExprError> {
        let depth = self.depth;
        let mut lhs = self.not_expr()?;
        while self.eat_keyword("and") {
            self.descend()?;
            lhs = Expr::And(Box::new(lhs), Box::new(self.not_expr()?));
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, ExprError> {
        if self.eat_keyword("not") {
            return self.nested(|p| Ok(Expr::Not(Box::new(p.not_expr()?))));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ExprError> {
        let first = self.additive()?;
        let mut rest = Vec::new();
        while let Some(Token::Op(op)) = self.peek()
            && let Some(cmp) = CmpOp::from_symbol(op)
        {
            self.pos += 1;
            rest.push((cmp, self.additive()?));
        }
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare(Box::new(first), rest))
        }
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        // Each chained operator wraps the tree built so far.
        let depth = self.depth;
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Op("+")) => {
                    self.pos += 1;
                    self.descend()?;
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Token::Op("-")) => {
                    self.pos += 1;
                    self.descend()?;
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.unary()?));
                }
                _ => {
                    self.depth = depth;
                    return Ok(lhs);
                }
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if matches!(self.peek(), Some(Token::Op("-"))) {
            self.pos += 1;
            return self.nested(|p| Ok(Expr::Neg(Box::new(p.unary()?))));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.advance() {
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Token::Int(i)) => Ok(Expr::Literal(Value::Int(i))),
            Some(Token::Keyword("True")) => Ok(Expr::Literal(Value::Bool(true))),
            Some(Token::Keyword("False")) => Ok(Expr::Literal(Value::Bool(false))),
            Some(Token::Name(name)) => Ok(Expr::Name(name)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    token => Err(Self::unexpected(token)),
                }
            }
            token => Err(Self::unexpected(token)),
        }
    }
}

impl Expr {
    fn eval(&self, variables: &BTreeMap<String, String>) -> Result<Value, ExprError> {
        match self {
            Self::Literal(v) => Ok(v.clone()),
            Self::Name(name) => name
                .strip_prefix(VARIABLE_PREFIX)
                .and_then(|bare| variables.get(bare))
                .map(|v| Value::Str(v.clone()))
                .ok_or_else(|| ExprError::UndefinedName(name.clone())),
            Self::Neg(inner) => match inner.eval(variables)? {
                Value::Int(i) => i.checked_neg().map(Value::Int).ok_or(ExprError::Overflow),
                other => Err(ExprError::BadUnaryOperand(other.type_name())),
            },
            Self::Not(inner) => Ok(Value::Bool(!inner.eval(variables)?.truthy())),
            Self::Add(lhs, rhs) => match (lhs.eval(variables)?, rhs.eval(variables)?) {
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                (Value::Int(a), Value::Int(b)) => {
                    a.checked_add(b).map(Value::Int).ok_or(ExprError::Overflow)
                }
                (a, b) => Err(ExprError::UnsupportedOperands {
                    op: "+",
                    lhs: a.type_name(),
                    rhs: b.type_name(),
                }),
            },
            Self::Sub(lhs, rhs) => match (lhs.eval(variables)?, rhs.eval(variables)?) {
                (Value::Int(a), Value::Int(b)) => {
                    a.checked_sub(b).map(Value::Int).ok_or(ExprError::Overflow)
                }
                (a, b) => Err(ExprError::UnsupportedOperands {
                    op: "-",
                    lhs: a.type_name(),
                    rhs: b.type_name(),
                }),
            },
            Self::And(lhs, rhs) => {
                let left = lhs.eval(variables)?;
                if left.truthy() {
                    rhs.eval(variables)
                } else {
                    Ok(left)
                }
            }
            Self::Or(lhs, rhs) => {
                let left = lhs.eval(variables)?;
                if left.truthy() {
                    Ok(left)
                } else {
                    rhs.eval(variables)
                }
            }
            Self::Compare(first, rest) => {
                let mut left = first.eval(variables)?;
                for (op, operand) in rest {
                    let right = operand.eval(variables)?;
                    if !op.apply(&left, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }
            Self::Conditional {
                cond,
                then,
                otherwise,
            } => {
                if cond.eval(variables)?.truthy() {
                    then.eval(variables)
                } else {
                    otherwise.eval(variables)
                }
            }
        }
    }
}

/// Parse and evaluate `source` against `variables`.
///
/// # Errors
///
/// Returns an [`ExprError`] if the source does not parse or evaluation
/// fails (undefined name, type mismatch, overflow).
pub fn evaluate(source: &str, variables: &BTreeMap<String, String>) -> Result<Value, ExprError> {
    let tokens = Lexer::new(source).tokenize()?;
    let expr = Parser::new(tokens).parse()?;
    expr.eval(variables)
}
