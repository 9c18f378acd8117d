//! Target path computation, done for every file before anything is written.
use std::path::{Path, PathBuf};

use super::{Context, Mode};
use crate::config::FileConfig;
use crate::error::ConfigError;
use crate::paths::{build_target, expand_path};

/// One file to deploy, with its target already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOperation {
    /// Source path as written in the configuration.
    pub source: String,
    /// Source path on disk.
    pub source_path: PathBuf,
    /// Absolute destination.
    pub target: PathBuf,
    /// Destination as shown on status lines.
    pub display_target: String,
    /// Per-file behaviour.
    pub config: FileConfig,
}

impl FileOperation {
    /// Status line title, e.g. `Install (executable)`.
    #[must_use]
    pub fn title(&self, mode: Mode) -> String {
        format!("{}{}", mode.title(), self.config.modifiers())
    }
}

/// Compute every operation for `packages`, in package then file order.
///
/// Install mode drops files without a destination.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPackage`] for a name missing from the
/// configuration and [`ConfigError::UndefinedEnvVar`] when a destination
/// cannot be expanded.
pub fn plan<S: AsRef<str>>(
    ctx: &Context,
    mode: Mode,
    packages: &[S],
) -> Result<Vec<FileOperation>, ConfigError> {
    let build_dir = Path::new(&ctx.config.build.dir);
    let mut operations = Vec::new();
    for name in packages {
        let name = name.as_ref();
        let package = ctx
            .config
            .packages
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPackage(name.to_string()))?;
        for entry in &package.files {
            let (target, display_target) = match mode {
                Mode::Build => {
                    let target = build_target(build_dir, &entry.source, &ctx.base);
                    let display = target
                        .strip_prefix(&ctx.base)
                        .unwrap_or(&target)
                        .display()
                        .to_string();
                    (target, display)
                }
                Mode::Install => {
                    let Some(dest) = &entry.config.dest else {
                        continue;
                    };
                    (expand_path(dest, &ctx.base)?, dest.clone())
                }
            };
            operations.push(FileOperation {
                source: entry.source.clone(),
                source_path: ctx.base.join(&entry.source),
                target,
                display_target,
                config: entry.config.clone(),
            });
        }
    }
    Ok(operations)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::{Config, Defaults};
    use crate::logging::RecordingLog;
    use crate::pipeline::FailurePolicy;
    use serde_json::json;
    use std::sync::Arc;

    fn context(doc: &serde_json::Value) -> Context {
        let base = PathBuf::from("/nonexistent/dots");
        let config = Config::from_value(doc, &base, &Defaults::default()).unwrap();
        Context::new(
            Arc::new(config),
            Arc::new(RecordingLog::default()),
            base,
            false,
            FailurePolicy::StopAtFirst,
        )
    }

    fn sample() -> Context {
        context(&json!({
            "templates": {"snippets": false},
            "packages": {
                "shell": {"files": {
                    "shell/bashrc": "/home/ada/.bashrc",
                    "shell/aliases": {},
                    "shell/bin/hello": {"dest": "/home/ada/bin/hello", "executable": true}
                }}
            }
        }))
    }

    #[test]
    fn build_targets_mirror_sources_in_declared_order() {
        let ops = plan(&sample(), Mode::Build, &["shell"]).unwrap();
        let targets: Vec<_> = ops.iter().map(|o| o.display_target.as_str()).collect();
        assert_eq!(
            targets,
            ["build/shell/bashrc", "build/shell/aliases", "build/shell/bin/hello"]
        );
        assert_eq!(ops[0].target, PathBuf::from("/nonexistent/dots/build/shell/bashrc"));
        assert_eq!(ops[0].source_path, PathBuf::from("/nonexistent/dots/shell/bashrc"));
    }

    #[test]
    fn install_skips_build_only_files() {
        let ops = plan(&sample(), Mode::Install, &["shell"]).unwrap();
        let sources: Vec<_> = ops.iter().map(|o| o.source.as_str()).collect();
        assert_eq!(sources, ["shell/bashrc", "shell/bin/hello"]);
        assert_eq!(ops[1].target, PathBuf::from("/home/ada/bin/hello"));
        assert_eq!(ops[1].display_target, "/home/ada/bin/hello");
    }

    #[test]
    fn install_shows_destination_as_written() {
        let ctx = context(&json!({
            "templates": {"snippets": false},
            "packages": {"p": {"files": {"a": "./x/../a"}}}
        }));
        let ops = plan(&ctx, Mode::Install, &["p"]).unwrap();
        assert_eq!(ops[0].display_target, "./x/../a");
        assert_eq!(ops[0].target, PathBuf::from("/nonexistent/dots/a"));
    }

    #[test]
    fn undefined_variable_fails_planning() {
        let ctx = context(&json!({
            "templates": {"snippets": false},
            "packages": {"p": {"files": {"a": "$DOTS_TEST_SURELY_UNDEFINED/a"}}}
        }));
        let err = plan(&ctx, Mode::Install, &["p"]).unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedEnvVar { .. }));
        // Build mode never looks at destinations.
        assert_eq!(plan(&ctx, Mode::Build, &["p"]).unwrap().len(), 1);
    }

    #[test]
    fn titles_carry_modifiers() {
        let ops = plan(&sample(), Mode::Install, &["shell"]).unwrap();
        assert_eq!(ops[0].title(Mode::Install), "Install");
        assert_eq!(ops[1].title(Mode::Build), "Build (executable)");
    }

    #[test]
    fn unknown_package_is_an_error() {
        let err = plan(&sample(), Mode::Build, &["nope"]).unwrap_err();
        assert_eq!(err.to_string(), "package \"nope\" does not exist");
    }
}
