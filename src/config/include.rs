//! Variable include files.
use serde_json::{Map, Value};

use super::defaults::Defaults;
use super::node::{self, ConfigNode};
use super::path::JsonPath;
use crate::error::ValidationError;

/// A JSON file of extra template variables.
///
/// A bare string is shorthand for `{"path": <string>}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeConfig {
    /// Path of the JSON file, relative to the configuration base directory.
    pub path: String,
    /// Silently skip the include when the file does not exist.
    pub optional: bool,
}

impl ConfigNode for IncludeConfig {
    fn parse(value: &Value, path: &JsonPath, defaults: &Defaults) -> Result<Self, ValidationError> {
        match value {
            Value::String(p) if !p.is_empty() => Ok(Self {
                path: p.clone(),
                optional: defaults.include_optional,
            }),
            Value::Object(map) => {
                let mut include_path = None;
                let mut optional = defaults.include_optional;
                for (k, v) in map {
                    match k.as_str() {
                        "path" => include_path = Some(node::non_empty_str(v, &path.key(k))?),
                        "optional" => {
                            optional = node::bool_or_null(v, &path.key(k), defaults.include_optional)?;
                        }
                        _ => return Err(node::invalid_key(path, k)),
                    }
                }
                let include_path = include_path
                    .ok_or_else(|| ValidationError::new(path.key("path").to_string(), "must be set"))?;
                Ok(Self {
                    path: include_path,
                    optional,
                })
            }
            _ => Err(ValidationError::new(
                path.to_string(),
                "must be a non-empty string or mapping",
            )),
        }
    }

    fn to_json(&self, defaults: &Defaults, minify: bool) -> Value {
        let mut map = Map::new();
        map.insert("path".into(), Value::from(self.path.as_str()));
        map.insert("optional".into(), Value::from(self.optional));
        if minify {
            node::remove_if_default(&mut map, "optional", &Value::from(defaults.include_optional));
            if map.len() == 1 {
                return Value::from(self.path.as_str());
            }
        }
        Value::Object(map)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &Value) -> Result<IncludeConfig, ValidationError> {
        let path = JsonPath::root().key("templates").key("include").index(0);
        IncludeConfig::parse(value, &path, &Defaults::default())
    }

    #[test]
    fn bare_string_is_path_shorthand() {
        let include = parse(&json!("vars.json")).unwrap();
        assert_eq!(include.path, "vars.json");
        assert!(!include.optional);
        assert_eq!(include.to_json(&Defaults::default(), true), json!("vars.json"));
    }

    #[test]
    fn optional_include_keeps_mapping_form() {
        let include = parse(&json!({"path": "local.json", "optional": true})).unwrap();
        assert!(include.optional);
        assert_eq!(
            include.to_json(&Defaults::default(), true),
            json!({"path": "local.json", "optional": true})
        );
    }

    #[test]
    fn path_is_required() {
        let err = parse(&json!({"optional": true})).unwrap_err();
        assert_eq!(err.to_string(), "templates.include[0].path must be set");
    }

    #[test]
    fn path_must_be_non_empty_string() {
        let err = parse(&json!({"path": ""})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "templates.include[0].path must be a non-empty string"
        );
        let err = parse(&json!({"path": null})).unwrap_err();
        assert_eq!(err.message, "must be a non-empty string");
    }

    #[test]
    fn lists_are_rejected() {
        let err = parse(&json!(["vars.json"])).unwrap_err();
        assert_eq!(err.message, "must be a non-empty string or mapping");
    }
}
