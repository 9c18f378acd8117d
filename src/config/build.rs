//! Build settings: staging directory and auto-format switch.
use serde_json::{Map, Value};

use super::defaults::Defaults;
use super::node::{self, ConfigNode};
use super::path::JsonPath;
use crate::error::ValidationError;

/// The `build` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory that build mode stages files into.
    pub dir: String,
    /// Rewrite the configuration file in canonical form after every command.
    pub format: bool,
}

impl BuildConfig {
    /// The configuration used when the section is absent.
    #[must_use]
    pub fn with_defaults(defaults: &Defaults) -> Self {
        Self {
            dir: defaults.build_dir.clone(),
            format: defaults.build_format,
        }
    }
}

impl ConfigNode for BuildConfig {
    fn parse(value: &Value, path: &JsonPath, defaults: &Defaults) -> Result<Self, ValidationError> {
        let mut build = Self::with_defaults(defaults);
        let Some(map) = node::mapping_or_null(value, path)? else {
            return Ok(build);
        };
        for (k, v) in map {
            match k.as_str() {
                "dir" => {
                    if let Some(dir) = node::non_empty_str_or_null(v, &path.key(k), None)? {
                        build.dir = dir;
                    }
                }
                "format" => build.format = node::bool_or_null(v, &path.key(k), defaults.build_format)?,
                _ => return Err(node::invalid_key(path, k)),
            }
        }
        Ok(build)
    }

    fn to_json(&self, defaults: &Defaults, minify: bool) -> Value {
        let mut map = Map::new();
        map.insert("dir".into(), Value::from(self.dir.as_str()));
        map.insert("format".into(), Value::from(self.format));
        if minify {
            node::remove_if_default(&mut map, "dir", &Value::from(defaults.build_dir.as_str()));
            node::remove_if_default(&mut map, "format", &Value::from(defaults.build_format));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &Value) -> Result<BuildConfig, ValidationError> {
        BuildConfig::parse(value, &JsonPath::root().key("build"), &Defaults::default())
    }

    #[test]
    fn null_yields_defaults() {
        let build = parse(&Value::Null).unwrap();
        assert_eq!(build.dir, "build");
        assert!(build.format);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let build = parse(&json!({"dir": "out", "format": false})).unwrap();
        assert_eq!(build.dir, "out");
        assert!(!build.format);
    }

    #[test]
    fn null_fields_keep_defaults() {
        let build = parse(&json!({"dir": null, "format": null})).unwrap();
        assert_eq!(build, BuildConfig::with_defaults(&Defaults::default()));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse(&json!({"target": "x"})).unwrap_err();
        assert_eq!(err.to_string(), "build.target is not a valid key");
    }

    #[test]
    fn mistyped_fields_are_rejected() {
        let err = parse(&json!({"format": "yes"})).unwrap_err();
        assert_eq!(err.to_string(), "build.format must be a boolean or null");
        let err = parse(&json!({"dir": 5})).unwrap_err();
        assert_eq!(err.to_string(), "build.dir must be a non-empty string or null");
    }

    #[test]
    fn non_mapping_is_rejected() {
        let err = parse(&json!("build")).unwrap_err();
        assert_eq!(err.to_string(), "build must be a mapping or null");
    }

    #[test]
    fn minified_defaults_serialize_empty() {
        let d = Defaults::default();
        assert_eq!(BuildConfig::with_defaults(&d).to_json(&d, true), json!({}));
        assert_eq!(
            BuildConfig::with_defaults(&d).to_json(&d, false),
            json!({"dir": "build", "format": true})
        );
    }
}
