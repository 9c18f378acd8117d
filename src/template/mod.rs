//! Delimiter-bounded expression substitution.
//!
//! A template is plain text in which every span between the `begin` and
//! `end` delimiters is an expression. [`render`] evaluates each span with
//! [`expr::evaluate`] and replaces it with the value's text form.
pub mod expr;
pub mod variables;

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::BuildError;

/// Prefix under which every variable is visible to expressions: variable
/// `x` is referenced as `_x`.
pub const VARIABLE_PREFIX: &str = "_";

/// Substitute every `begin … end` span in `text`.
///
/// Spans are matched non-greedily and may cross lines. All spans see the
/// same `variables`. Output is produced only when every span evaluates.
///
/// # Errors
///
/// Returns [`BuildError::Expression`] for the first span that fails to
/// evaluate and [`BuildError::Delimiters`] if the delimiters cannot be
/// compiled.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use dots::template::render;
///
/// let vars = BTreeMap::from([("x".to_string(), "5".to_string())]);
/// assert_eq!(render(&vars, "{{{", "}}}", "v={{{_x}}}").unwrap(), "v=5");
/// ```
pub fn render(
    variables: &BTreeMap<String, String>,
    begin: &str,
    end: &str,
    text: &str,
) -> Result<String, BuildError> {
    let pattern = format!("(?s){}(.*?){}", regex::escape(begin), regex::escape(end));
    let re = Regex::new(&pattern).map_err(|e| BuildError::Delimiters(e.to_string()))?;

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let (Some(span), Some(source)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(text.get(last..span.start()).unwrap_or_default());
        let value = expr::evaluate(source.as_str(), variables).map_err(|e| {
            BuildError::Expression {
                expression: source.as_str().to_string(),
                message: e.to_string(),
            }
        })?;
        out.push_str(&value.to_string());
        last = span.end();
    }
    out.push_str(text.get(last..).unwrap_or_default());
    Ok(out)
}
