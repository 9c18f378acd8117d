//! Structured logger that forwards to `tracing`.
use std::path::PathBuf;

use super::subscriber::{DRY_RUN_TARGET, STATUS_TARGET};
use super::types::{Log, Outcome, Status};
use super::utils::log_file_path;

/// Implement the message methods of [`Log`] by delegating to inherent
/// methods of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger.
///
/// All messages are also written to a persistent log file at
/// `$XDG_CACHE_HOME/dots/<command>.log` (default `~/.cache/dots/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// The log file itself is created by
    /// [`init_subscriber`](super::subscriber::init_subscriber); this
    /// constructor only records where it lives.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file via the [`FileLayer`](super::subscriber::FileLayer)).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a dry-run notice.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Report a status line. Successes are debug events so they only reach
    /// the console when verbose; failures are errors and go to stderr.
    pub fn status(&self, status: &Status) {
        match status.outcome {
            Outcome::Ok => tracing::debug!(target: STATUS_TARGET, "{status}"),
            Outcome::DryRun => tracing::info!(target: STATUS_TARGET, "{status}"),
            Outcome::Failed => tracing::error!(target: STATUS_TARGET, "{status}"),
        }
    }
}

impl Log for Logger {
    forward_log_methods!(info, debug, warn, dry_run);

    fn status(&self, status: &Status) {
        self.status(status);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    fn log_contents(log: &Logger) -> String {
        fs::read_to_string(log.log_path().expect("log path")).unwrap()
    }

    #[test]
    fn log_file_is_created() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path should exist");
        assert!(path.exists(), "log file should be created by the file layer");
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = log_contents(&log);
        assert!(contents.contains("[debug]"));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn warn_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("warn-marker");
        let contents = log_contents(&log);
        assert!(contents.contains("[warn] warn-marker"));
    }

    #[test]
    fn dry_run_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.dry_run("nothing will be written");
        assert!(log_contents(&log).contains("[dry run] nothing will be written"));
    }

    #[test]
    fn status_lines_written_to_file_for_every_outcome() {
        let (log, _tmp, _guard) = isolated_logger();
        log.status(&Status::new(Outcome::Ok, "Build").src("a").target("build/a"));
        log.status(&Status::new(Outcome::DryRun, "Format").src("dots.json"));
        log.status(&Status::new(Outcome::Failed, "Install").src("b").message("boom"));
        let contents = log_contents(&log);
        assert!(contents.contains("+ Build a -> build/a"));
        assert!(contents.contains("? Format dots.json"));
        assert!(contents.contains("- Install b: boom"));
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.info("via-trait");
        assert!(log_contents(&log).contains("via-trait"));
    }
}
