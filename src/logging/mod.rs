//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, Outcome, Status};

/// Serializes `XDG_CACHE_HOME` manipulation across parallel test threads.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Create a Logger backed by an isolated per-thread tracing subscriber
/// with a [`FileLayer`](subscriber::FileLayer), so that tracing events
/// emitted by logger methods actually reach the log file during tests.
///
/// Returns a [`tracing::dispatcher::DefaultGuard`] that must be kept alive
/// for the duration of the test; dropping it restores the previous
/// thread-local dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let env_lock = TEST_ENV_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    // SAFETY: Protected by TEST_ENV_MUTEX; restored before lock is released.
    #[allow(unsafe_code)]
    unsafe {
        std::env::set_var("XDG_CACHE_HOME", tmp.path());
    }
    let file_layer = subscriber::FileLayer::new("test").expect("failed to create file layer");
    let log = Logger::new("test");
    #[allow(unsafe_code)]
    unsafe {
        std::env::remove_var("XDG_CACHE_HOME");
    }
    drop(env_lock);
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}

/// A [`Log`] that records everything it is given, for asserting on output.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingLog {
    messages: std::sync::Mutex<Vec<String>>,
    statuses: std::sync::Mutex<Vec<Status>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl RecordingLog {
    /// Every status reported so far.
    pub(crate) fn statuses(&self) -> Vec<Status> {
        self.statuses.lock().unwrap().clone()
    }

    /// Every status rendered as its line.
    pub(crate) fn status_lines(&self) -> Vec<String> {
        self.statuses().iter().map(ToString::to_string).collect()
    }

    /// Every non-status message, prefixed with its kind (e.g. `warn: ...`).
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    fn push(&self, kind: &str, msg: &str) {
        self.messages.lock().unwrap().push(format!("{kind}: {msg}"));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl Log for RecordingLog {
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }

    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }

    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }

    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }

    fn status(&self, status: &Status) {
        self.statuses.lock().unwrap().push(status.clone());
    }
}
