//! Utility functions for path resolution, ANSI stripping, and time formatting.
use std::fs;
use std::path::PathBuf;

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range), so cursor movement, erase, etc.
/// are also stripped without consuming unrelated text.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Return the `$XDG_CACHE_HOME/dots/` directory, creating it if needed.
pub(super) fn dots_cache_dir() -> Option<PathBuf> {
    let cache_dir = std::env::var("XDG_CACHE_HOME").map_or_else(
        |_| {
            std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .map_or_else(|_| PathBuf::from("."), PathBuf::from)
                .join(".cache")
        },
        PathBuf::from,
    );
    let dir = cache_dir.join("dots");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return the log file path under `$XDG_CACHE_HOME/dots/` (or `~/.cache/dots/`).
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(dots_cache_dir()?.join(format!("{command}.log")))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(unsafe_code)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::TEST_ENV_MUTEX;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;32m+ Build\x1b[0m vimrc -> build/vimrc"),
            "+ Build vimrc -> build/vimrc"
        );
    }

    #[test]
    fn strip_ansi_handles_csi_sequences() {
        assert_eq!(strip_ansi("\x1b[2;5Htext"), "text");
        assert_eq!(strip_ansi("\x1b[2Jhello"), "hello");
        assert_eq!(strip_ansi("\x1b[Kworld"), "world");
        assert_eq!(strip_ansi("\x1b[31m\x1b[2JERROR\x1b[0m"), "ERROR");
        assert_eq!(strip_ansi("\x1bMtext"), "text");
    }

    #[test]
    fn strip_ansi_empty_string() {
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn log_file_lives_under_xdg_cache_home() {
        let tmp = tempfile::tempdir().unwrap();
        let _lock = TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: Protected by TEST_ENV_MUTEX; restored before lock is released.
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", tmp.path());
        }
        let path = log_file_path("build");
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        assert_eq!(path, Some(tmp.path().join("dots").join("build.log")));
        assert!(tmp.path().join("dots").is_dir());
    }

    #[test]
    fn format_utc_time_has_correct_format() {
        let s = format_utc_time();
        assert_eq!(s.len(), 8, "HH:MM:SS should be 8 chars");
        assert_eq!(&s[2..3], ":", "colon at position 2");
        assert_eq!(&s[5..6], ":", "colon at position 5");
    }

    #[test]
    fn format_utc_datetime_has_correct_format() {
        let s = format_utc_datetime();
        assert_eq!(s.len(), 19, "YYYY-MM-DD HH:MM:SS should be 19 chars");
        assert_eq!(&s[4..5], "-", "dash at position 4");
        assert_eq!(&s[10..11], " ", "space at position 10");
    }
}
