use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// What to do once a file has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// End the traversal after the first failed file.
    #[default]
    StopAtFirst,
    /// Process every file, then report all failures.
    CollectAll,
}

impl FailurePolicy {
    /// The policy selected by the `--keep-going` flag.
    #[must_use]
    pub const fn from_keep_going(keep_going: bool) -> Self {
        if keep_going {
            Self::CollectAll
        } else {
            Self::StopAtFirst
        }
    }
}

/// Shared state for one traversal.
pub struct Context {
    /// The validated configuration with resolved variables.
    pub config: Arc<Config>,
    /// Logger for status lines and diagnostics.
    pub log: Arc<dyn Log>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Directory relative paths are resolved against.
    pub base: PathBuf,
    /// Whether to preview changes without applying them.
    pub dry_run: bool,
    /// Failure handling.
    pub policy: FailurePolicy,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("log", &"<dyn Log>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .field("base", &self.base)
            .field("dry_run", &self.dry_run)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Context {
    /// Create a context that operates on the real filesystem.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        log: Arc<dyn Log>,
        base: PathBuf,
        dry_run: bool,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            config,
            log,
            fs_ops: Arc::new(SystemFileSystemOps),
            base,
            dry_run,
            policy,
        }
    }

    /// Replace the filesystem implementation.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_going_selects_collect_all() {
        assert_eq!(FailurePolicy::from_keep_going(true), FailurePolicy::CollectAll);
        assert_eq!(FailurePolicy::from_keep_going(false), FailurePolicy::StopAtFirst);
        assert_eq!(FailurePolicy::default(), FailurePolicy::StopAtFirst);
    }
}
