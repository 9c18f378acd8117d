//! Variable resolution: inline values, include files and snippets.
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::config::TemplatesConfig;
use crate::error::ConfigError;

/// Merge every variable source of `templates` into one map.
///
/// Layers apply in order, later ones overwriting earlier keys: inline
/// variables, include files in declared order, then snippets.
///
/// # Errors
///
/// Returns a [`ConfigError`] when a required include is missing, an include
/// cannot be read or is not a flat string map, or the snippets directory
/// exists but cannot be read.
pub fn resolve(
    templates: &TemplatesConfig,
    base: &Path,
) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut variables = templates.inline_variables.clone();
    for include in &templates.include {
        if let Some(included) = read_include(&base.join(&include.path), &include.path, include.optional)? {
            variables.extend(included);
        }
    }
    if let Some(snippets) = &templates.snippets {
        variables.extend(read_snippets(&base.join(snippets), snippets)?);
    }
    Ok(variables)
}

/// Read one include file. `Ok(None)` means an optional file is absent.
fn read_include(
    file: &Path,
    display: &str,
    optional: bool,
) -> Result<Option<BTreeMap<String, String>>, ConfigError> {
    let text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if optional {
                return Ok(None);
            }
            return Err(ConfigError::IncludeMissing(display.to_string()));
        }
        Err(source) => {
            return Err(ConfigError::IncludeUnreadable {
                path: display.to_string(),
                source,
            });
        }
    };
    let value: Value = serde_json::from_str(&text).map_err(|source| ConfigError::IncludeInvalid {
        path: display.to_string(),
        source,
    })?;
    let Value::Object(map) = value else {
        return Err(ConfigError::IncludeNotStringMap(display.to_string()));
    };
    map.into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k, s)),
            _ => Err(ConfigError::IncludeNotStringMap(display.to_string())),
        })
        .collect::<Result<_, _>>()
        .map(Some)
}

/// Read every regular file directly inside `dir`, keyed by the file name up
/// to its first `.`.
fn read_snippets(dir: &Path, display: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let unreadable = |source: io::Error| ConfigError::SnippetsUnreadable {
        path: display.to_string(),
        source,
    };
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(unreadable(e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut snippets = BTreeMap::new();
    for path in files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name.split('.').next().unwrap_or_default();
        // Dot files have no stem to bind.
        if name.is_empty() {
            continue;
        }
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::SnippetUnreadable {
            path: path.display().to_string(),
            source,
        })?;
        snippets.insert(name.to_string(), text);
    }
    Ok(snippets)
}
