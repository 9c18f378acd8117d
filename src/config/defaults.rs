//! Default values for every optional configuration field.

/// Default values applied when a configuration field is absent or `null`.
///
/// Built once at startup and passed explicitly into every parse and
/// serialize call; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Build staging directory.
    pub build_dir: String,
    /// Whether the configuration file is rewritten after every command.
    pub build_format: bool,
    /// Configuration file path used by the CLI.
    pub config_file: String,
    /// Whether files are executable unless stated otherwise.
    pub file_executable: bool,
    /// Whether files are templates unless stated otherwise.
    pub file_template: bool,
    /// Whether a missing include file is tolerated.
    pub include_optional: bool,
    /// Opening template delimiter.
    pub template_begin: String,
    /// Closing template delimiter.
    pub template_end: String,
    /// Snippets directory.
    pub template_snippets: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            build_dir: "build".to_string(),
            build_format: true,
            config_file: "dots.json".to_string(),
            file_executable: false,
            file_template: false,
            include_optional: false,
            template_begin: "{{{".to_string(),
            template_end: "}}}".to_string(),
            template_snippets: "snippets".to_string(),
        }
    }
}
