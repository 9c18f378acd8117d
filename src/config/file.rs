//! Per-file behaviour within a package.
use serde_json::{Map, Value};

use super::defaults::Defaults;
use super::node::{self, ConfigNode};
use super::path::JsonPath;
use crate::error::ValidationError;

/// How a single source file is deployed.
///
/// In the document a bare string is shorthand for `{"dest": <string>}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    /// Install destination before expansion; `None` means build-only.
    pub dest: Option<String>,
    /// Set the execute bits on the written file.
    pub executable: bool,
    /// Render the contents through the template engine before writing.
    pub template: bool,
}

impl FileConfig {
    /// A build-only file with default flags.
    #[must_use]
    pub const fn with_defaults(defaults: &Defaults) -> Self {
        Self {
            dest: None,
            executable: defaults.file_executable,
            template: defaults.file_template,
        }
    }

    /// Modifier suffix for status lines, e.g. ` (executable, template)`.
    #[must_use]
    pub fn modifiers(&self) -> String {
        let mut flags = Vec::new();
        if self.executable {
            flags.push("executable");
        }
        if self.template {
            flags.push("template");
        }
        if flags.is_empty() {
            String::new()
        } else {
            format!(" ({})", flags.join(", "))
        }
    }
}

impl ConfigNode for FileConfig {
    fn parse(value: &Value, path: &JsonPath, defaults: &Defaults) -> Result<Self, ValidationError> {
        let mut file = Self::with_defaults(defaults);
        match value {
            Value::String(dest) if !dest.is_empty() => {
                file.dest = Some(dest.clone());
            }
            Value::Object(map) => {
                for (k, v) in map {
                    match k.as_str() {
                        "dest" => file.dest = node::non_empty_str_or_null(v, &path.key(k), None)?,
                        "executable" => {
                            file.executable =
                                node::bool_or_null(v, &path.key(k), defaults.file_executable)?;
                        }
                        "template" => {
                            file.template =
                                node::bool_or_null(v, &path.key(k), defaults.file_template)?;
                        }
                        _ => return Err(node::invalid_key(path, k)),
                    }
                }
            }
            _ => {
                return Err(ValidationError::new(
                    path.to_string(),
                    "must be a non-empty string or mapping",
                ));
            }
        }
        Ok(file)
    }

    fn to_json(&self, defaults: &Defaults, minify: bool) -> Value {
        let mut map = Map::new();
        map.insert("dest".into(), self.dest.clone().map_or(Value::Null, Value::from));
        map.insert("executable".into(), Value::from(self.executable));
        map.insert("template".into(), Value::from(self.template));
        if minify {
            node::remove_if_default(&mut map, "dest", &Value::Null);
            node::remove_if_default(&mut map, "executable", &Value::from(defaults.file_executable));
            node::remove_if_default(&mut map, "template", &Value::from(defaults.file_template));
            // Only `dest` left: use the shorthand form.
            if map.len() == 1
                && let Some(dest) = map.remove("dest")
            {
                return dest;
            }
        }
        Value::Object(map)
    }
}
