//! Core logging types: status lines and the [`Log`] trait.
use std::fmt;

/// How a single operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed. Only shown on the console when verbose.
    Ok,
    /// The operation failed. Always shown, on stderr.
    Failed,
    /// Dry run: the operation would have been performed.
    DryRun,
}

impl Outcome {
    /// The one-character prefix of a status line.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Ok => '+',
            Self::Failed => '-',
            Self::DryRun => '?',
        }
    }
}

/// One status line, e.g. `+ Build (template) vim/vimrc -> build/vim/vimrc`.
///
/// # Examples
///
/// ```
/// use dots::logging::{Outcome, Status};
///
/// let s = Status::new(Outcome::Failed, "Install")
///     .src("bashrc")
///     .target("~/.bashrc")
///     .message("name '_x' is not defined");
/// assert_eq!(
///     s.to_string(),
///     "- Install bashrc -> ~/.bashrc: name '_x' is not defined"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Result of the operation.
    pub outcome: Outcome,
    /// Operation title, including any modifiers.
    pub title: String,
    /// What the operation read from.
    pub src: Option<String>,
    /// What the operation wrote to.
    pub target: Option<String>,
    /// Detail, usually an error message.
    pub message: Option<String>,
}

impl Status {
    /// A status line with only a title.
    #[must_use]
    pub fn new(outcome: Outcome, title: impl Into<String>) -> Self {
        Self {
            outcome,
            title: title.into(),
            src: None,
            target: None,
            message: None,
        }
    }

    /// Set the source.
    #[must_use]
    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Set the target.
    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.outcome.prefix(), self.title)?;
        if let Some(src) = &self.src {
            write!(f, " {}", src.trim())?;
        }
        if let Some(target) = &self.target {
            write!(f, " -> {}", target.trim())?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message.trim())?;
        }
        Ok(())
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) emits through `tracing`; tests use a
/// recording implementation so pipeline output can be asserted on.
pub trait Log: Send + Sync {
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log a dry-run notice.
    fn dry_run(&self, msg: &str);
    /// Report the outcome of one operation.
    fn status(&self, status: &Status);
}
