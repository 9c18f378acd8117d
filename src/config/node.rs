//! The parse/serialize capability shared by every configuration node.
use serde_json::{Map, Value};

use super::defaults::Defaults;
use super::path::JsonPath;
use crate::error::ValidationError;

/// A configuration node that can be validated from, and serialized back to,
/// an untyped JSON value.
///
/// Parsing is fail-closed: unknown keys and mistyped values are errors
/// located by `path`. Serialization with `minify` omits every value equal to
/// its default and collapses shorthand-eligible nodes to their bare string,
/// so that re-parsing the minified output yields an equal node.
pub trait ConfigNode: Sized {
    /// Validate `value` located at `path`, filling defaults from `defaults`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending location.
    fn parse(value: &Value, path: &JsonPath, defaults: &Defaults) -> Result<Self, ValidationError>;

    /// Serialize back to JSON, optionally minified.
    fn to_json(&self, defaults: &Defaults, minify: bool) -> Value;
}

pub(super) fn invalid_key(path: &JsonPath, key: &str) -> ValidationError {
    ValidationError::new(path.key(key).to_string(), "is not a valid key")
}

/// Accept a mapping or `null` (returned as `None`).
pub(super) fn mapping_or_null<'a>(
    value: &'a Value,
    path: &JsonPath,
) -> Result<Option<&'a Map<String, Value>>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        _ => Err(ValidationError::new(
            path.to_string(),
            "must be a mapping or null",
        )),
    }
}

pub(super) fn bool_or_null(
    value: &Value,
    path: &JsonPath,
    default: bool,
) -> Result<bool, ValidationError> {
    match value {
        Value::Null => Ok(default),
        Value::Bool(b) => Ok(*b),
        _ => Err(ValidationError::new(
            path.to_string(),
            "must be a boolean or null",
        )),
    }
}

/// A required, non-empty string.
pub(super) fn non_empty_str(value: &Value, path: &JsonPath) -> Result<String, ValidationError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ValidationError::new(
            path.to_string(),
            "must be a non-empty string",
        )),
    }
}

/// A non-empty string, or `null` meaning `default`.
pub(super) fn non_empty_str_or_null(
    value: &Value,
    path: &JsonPath,
    default: Option<&str>,
) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(default.map(str::to_string)),
        Value::String(s) if !s.is_empty() => Ok(Some(s.clone())),
        _ => Err(ValidationError::new(
            path.to_string(),
            "must be a non-empty string or null",
        )),
    }
}

/// Empty containers serialize as `null`.
pub(super) fn null_if_empty(value: Value) -> Value {
    match &value {
        Value::Object(map) if map.is_empty() => Value::Null,
        Value::Array(items) if items.is_empty() => Value::Null,
        _ => value,
    }
}

/// Drop `key` from `map` when its value is `null` or equals `default`.
pub(super) fn remove_if_default(map: &mut Map<String, Value>, key: &str, default: &Value) {
    if map
        .get(key)
        .is_some_and(|v| v.is_null() || v == default)
    {
        map.remove(key);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path() -> JsonPath {
        JsonPath::root().key("build").key("format")
    }

    #[test]
    fn bool_or_null_uses_default_for_null() {
        assert!(bool_or_null(&Value::Null, &path(), true).unwrap());
        assert!(!bool_or_null(&json!(false), &path(), true).unwrap());
    }

    #[test]
    fn bool_or_null_rejects_numbers_and_lists() {
        for bad in [json!(1), json!([true]), json!("true")] {
            let err = bool_or_null(&bad, &path(), true).unwrap_err();
            assert_eq!(err.to_string(), "build.format must be a boolean or null");
        }
    }

    #[test]
    fn non_empty_str_rejects_empty_and_other_types() {
        assert_eq!(non_empty_str(&json!("x"), &path()).unwrap(), "x");
        assert!(non_empty_str(&json!(""), &path()).is_err());
        assert!(non_empty_str(&json!(3), &path()).is_err());
        assert!(non_empty_str(&Value::Null, &path()).is_err());
    }

    #[test]
    fn non_empty_str_or_null_falls_back_to_default() {
        assert_eq!(
            non_empty_str_or_null(&Value::Null, &path(), Some("d")).unwrap(),
            Some("d".to_string())
        );
        assert_eq!(non_empty_str_or_null(&Value::Null, &path(), None).unwrap(), None);
        assert!(non_empty_str_or_null(&json!(false), &path(), None).is_err());
    }

    #[test]
    fn mapping_or_null_rejects_lists() {
        assert!(mapping_or_null(&Value::Null, &path()).unwrap().is_none());
        assert!(mapping_or_null(&json!({}), &path()).unwrap().is_some());
        let err = mapping_or_null(&json!([]), &path()).unwrap_err();
        assert_eq!(err.message, "must be a mapping or null");
    }

    #[test]
    fn null_if_empty_collapses_containers_only() {
        assert_eq!(null_if_empty(json!({})), Value::Null);
        assert_eq!(null_if_empty(json!([])), Value::Null);
        assert_eq!(null_if_empty(json!("")), json!(""));
        assert_eq!(null_if_empty(json!([1])), json!([1]));
    }

    #[test]
    fn remove_if_default_drops_null_and_default() {
        let mut map = Map::new();
        map.insert("a".into(), Value::Null);
        map.insert("b".into(), json!("build"));
        map.insert("c".into(), json!("out"));
        remove_if_default(&mut map, "a", &json!("x"));
        remove_if_default(&mut map, "b", &json!("build"));
        remove_if_default(&mut map, "c", &json!("build"));
        assert_eq!(Value::Object(map), json!({"c": "out"}));
    }
}
