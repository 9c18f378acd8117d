//! Package dependency closure.
use std::collections::BTreeSet;

use crate::config::Config;
use crate::error::ConfigError;

/// Expand `requested` to every package it transitively requires.
///
/// The result is duplicate-free and sorted by name. Dependency cycles are
/// tolerated: a package already in the result is never revisited.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPackage`] for a requested name that does
/// not exist and [`ConfigError::UnknownDependency`] for a missing package
/// named in another package's `requires`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dots::config::{Config, Defaults};
/// use dots::resolve::resolve;
///
/// let doc = serde_json::json!({"packages": {
///     "vim": {"requires": ["base"]},
///     "base": null,
///     "zsh": null
/// }});
/// let config = Config::from_value(&doc, Path::new("/nonexistent"), &Defaults::default()).unwrap();
/// assert_eq!(resolve(&config, &["vim"]).unwrap(), ["base", "vim"]);
/// ```
pub fn resolve<S: AsRef<str>>(config: &Config, requested: &[S]) -> Result<Vec<String>, ConfigError> {
    let mut resolved = BTreeSet::new();
    let mut pending: Vec<(String, Option<String>)> = requested
        .iter()
        .map(|name| (name.as_ref().to_string(), None))
        .collect();

    while let Some((name, required_by)) = pending.pop() {
        if resolved.contains(&name) {
            continue;
        }
        let Some(package) = config.packages.get(&name) else {
            return Err(match required_by {
                Some(required_by) => ConfigError::UnknownDependency { name, required_by },
                None => ConfigError::UnknownPackage(name),
            });
        };
        for dependency in &package.requires {
            if !resolved.contains(dependency) {
                pending.push((dependency.clone(), Some(name.clone())));
            }
        }
        resolved.insert(name);
    }

    Ok(resolved.into_iter().collect())
}
