//! Domain-specific error types for the dots engine.
//!
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error families
//!
//! ```text
//! ConfigError       — always fatal: JSON, schema, includes, snippets, packages
//! └── Validation(ValidationError)
//! BuildError        — recoverable per file: template rendering
//! FilesFailed       — the non-zero outcome once failed files are reported
//! ```

use thiserror::Error;

/// A schema violation located within the configuration document.
///
/// The display form is the rendered document path followed by the message,
/// e.g. `packages.vim.requires[0] must be a non-empty string`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path} {message}")]
pub struct ValidationError {
    /// Human-readable document path (e.g. `packages.foo.files[2]`).
    pub path: String,
    /// What is wrong with the value at `path`.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors that arise from loading, validating and resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read config file {path}")]
    Read {
        /// Path to the configuration file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON.
    #[error("{path} is not valid JSON")]
    Json {
        /// Path to the configuration file.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The document does not match the schema.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A required include file is absent.
    #[error("include file {0} does not exist")]
    IncludeMissing(String),

    /// An include file exists but could not be read.
    #[error("could not open include file {path}")]
    IncludeUnreadable {
        /// Include path as written in the configuration.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An include file is not parseable JSON.
    #[error("include file {path} contents are not valid")]
    IncludeInvalid {
        /// Include path as written in the configuration.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// An include file parsed but is not a flat string-to-string mapping.
    #[error("include file {0} must be a mapping of string to string")]
    IncludeNotStringMap(String),

    /// The snippets directory exists but could not be listed.
    #[error("could not open snippets directory {path}")]
    SnippetsUnreadable {
        /// Snippets directory as written in the configuration.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A snippet file could not be read as text.
    #[error("could not open snippets file {path}")]
    SnippetUnreadable {
        /// Path of the snippet file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A destination path references an undefined environment variable.
    #[error("environment variable {var} in path {path} not defined")]
    UndefinedEnvVar {
        /// The variable reference as written (e.g. `$FOO` or `${FOO}`).
        var: String,
        /// The destination path as written in the configuration.
        path: String,
    },

    /// A package requested on the command line does not exist.
    #[error("package \"{0}\" does not exist")]
    UnknownPackage(String),

    /// A package listed in another package's `requires` does not exist.
    #[error("package \"{name}\" required by \"{required_by}\" does not exist")]
    UnknownDependency {
        /// The missing package.
        name: String,
        /// The package whose `requires` referenced it.
        required_by: String,
    },
}

/// Errors that arise while rendering a single file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A template expression failed to parse or evaluate.
    #[error("{message}")]
    Expression {
        /// The expression text between the delimiters.
        expression: String,
        /// Why it failed (e.g. `name '_x' is not defined`).
        message: String,
    },

    /// The configured delimiters could not be compiled into a matcher.
    #[error("invalid template delimiters: {0}")]
    Delimiters(String),
}

/// One or more files failed during a traversal.
///
/// Each failure has already been reported on its own status line, so this
/// error only carries the count.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{failed} of {total} files failed")]
pub struct FilesFailed {
    /// Files that failed.
    pub failed: u32,
    /// Files attempted.
    pub total: u32,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn validation_error_display_puts_path_first() {
        let e = ValidationError::new("packages.vim.requires[0]", "must be a non-empty string");
        assert_eq!(
            e.to_string(),
            "packages.vim.requires[0] must be a non-empty string"
        );
    }

    #[test]
    fn validation_converts_into_config_error() {
        let e: ConfigError = ValidationError::new("build", "must be a mapping or null").into();
        assert_eq!(e.to_string(), "build must be a mapping or null");
    }

    #[test]
    fn unknown_package_display() {
        let e = ConfigError::UnknownPackage("missing".to_string());
        assert_eq!(e.to_string(), "package \"missing\" does not exist");
    }

    #[test]
    fn unknown_dependency_names_requester() {
        let e = ConfigError::UnknownDependency {
            name: "b".to_string(),
            required_by: "a".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "package \"b\" required by \"a\" does not exist"
        );
    }

    #[test]
    fn undefined_env_var_display() {
        let e = ConfigError::UndefinedEnvVar {
            var: "$NOPE".to_string(),
            path: "$NOPE/bashrc".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "environment variable $NOPE in path $NOPE/bashrc not defined"
        );
    }

    #[test]
    fn include_unreadable_has_source() {
        use std::error::Error as _;
        let e = ConfigError::IncludeUnreadable {
            path: "vars.json".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("vars.json"));
    }

    #[test]
    fn build_error_displays_message_only() {
        let e = BuildError::Expression {
            expression: "_x".to_string(),
            message: "name '_x' is not defined".to_string(),
        };
        assert_eq!(e.to_string(), "name '_x' is not defined");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<ConfigError>();
        assert_send_sync::<ValidationError>();
        assert_send_sync::<BuildError>();
        assert_send_sync::<FilesFailed>();
    }

    #[test]
    fn files_failed_display() {
        let e = FilesFailed { failed: 2, total: 5 };
        assert_eq!(e.to_string(), "2 of 5 files failed");
    }

    #[test]
    fn config_error_converts_to_anyhow() {
        let e = ConfigError::IncludeMissing("vars.json".to_string());
        let _anyhow_err: anyhow::Error = e.into();
    }
}
