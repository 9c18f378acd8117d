//! Destination path expansion and build-directory layout.
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ConfigError;

#[allow(clippy::expect_used)] // pattern is a compile-time constant
static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:([A-Za-z_][A-Za-z0-9_]*)|\{([A-Za-z_][A-Za-z0-9_]*)\})")
        .expect("valid env var pattern")
});

/// Expand a configured destination using the process environment.
///
/// See [`expand_path_with`].
///
/// # Errors
///
/// Returns [`ConfigError::UndefinedEnvVar`] if the path references an
/// undefined variable.
pub fn expand_path(path: &str, base: &Path) -> Result<PathBuf, ConfigError> {
    expand_path_with(path, base, |name| std::env::var(name).ok())
}

/// Expand a configured destination into an absolute, normalized path.
///
/// A leading `~` or `~/` becomes the `HOME` variable. `$NAME` and `${NAME}`
/// are replaced by `lookup(NAME)`. Relative results are joined onto `base`
/// and `.`/`..` components are resolved lexically.
///
/// # Errors
///
/// Returns [`ConfigError::UndefinedEnvVar`] naming the first reference that
/// `lookup` cannot resolve. An undefined `HOME` is reported as `$HOME`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dots::paths::expand_path_with;
///
/// let lookup = |name: &str| (name == "HOME").then(|| "/home/ada".to_string());
/// let p = expand_path_with("~/.config/../.bashrc", Path::new("/"), lookup).unwrap();
/// assert_eq!(p, PathBuf::from("/home/ada/.bashrc"));
/// ```
pub fn expand_path_with(
    path: &str,
    base: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf, ConfigError> {
    let undefined = |var: &str| ConfigError::UndefinedEnvVar {
        var: var.to_string(),
        path: path.to_string(),
    };

    let home_relative = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };
    let with_home = match home_relative {
        Some(rest) => {
            let home = lookup("HOME").ok_or_else(|| undefined("$HOME"))?;
            if rest.is_empty() {
                home
            } else {
                format!("{}/{rest}", home.trim_end_matches('/'))
            }
        }
        None => path.to_string(),
    };

    let mut missing = None;
    let expanded = ENV_VAR.replace_all(&with_home, |caps: &Captures<'_>| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        lookup(name).unwrap_or_else(|| {
            if missing.is_none() {
                missing = caps.get(0).map(|m| m.as_str().to_string());
            }
            String::new()
        })
    });
    if let Some(var) = missing {
        return Err(undefined(&var));
    }

    Ok(normalize(&base.join(expanded.as_ref())))
}

/// Resolve `.` and `..` components without touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Where build mode stages `source`: `build_dir` joined with the source path
/// made relative.
///
/// Absolute sources under `base` are taken relative to `base`; any other
/// absolute source loses its root. Leading `..` components are dropped so the
/// target always stays inside `build_dir`.
#[must_use]
pub fn build_target(build_dir: &Path, source: &str, base: &Path) -> PathBuf {
    let source = normalize(Path::new(source));
    let relative = source
        .strip_prefix(normalize(base))
        .map_or_else(|_| source.clone(), Path::to_path_buf);
    let inside: PathBuf = relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    normalize(&base.join(build_dir).join(inside))
}
