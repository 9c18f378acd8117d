//! Template settings and the variable map.
use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use super::defaults::Defaults;
use super::include::IncludeConfig;
use super::node::{self, ConfigNode};
use super::path::JsonPath;
use crate::error::{ConfigError, ValidationError};
use crate::template;

/// The `templates` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatesConfig {
    /// Opening expression delimiter.
    pub begin: String,
    /// Closing expression delimiter.
    pub end: String,
    /// Include files, merged in declared order.
    pub include: Vec<IncludeConfig>,
    /// Snippets directory; `None` disables snippet loading.
    pub snippets: Option<String>,
    /// Fully resolved variables. Equal to `inline_variables` until
    /// [`TemplatesConfig::resolve`] has run.
    pub variables: BTreeMap<String, String>,
    /// Variables declared directly in the document.
    pub inline_variables: BTreeMap<String, String>,
}

impl TemplatesConfig {
    /// The configuration used when the section is absent.
    #[must_use]
    pub fn with_defaults(defaults: &Defaults) -> Self {
        Self {
            begin: defaults.template_begin.clone(),
            end: defaults.template_end.clone(),
            include: Vec::new(),
            snippets: Some(defaults.template_snippets.clone()),
            variables: BTreeMap::new(),
            inline_variables: BTreeMap::new(),
        }
    }

    /// Build the full variable map: inline, then includes, then snippets.
    ///
    /// Relative include and snippet paths are taken from `base`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required include is absent or any
    /// include or snippet cannot be read or parsed.
    pub fn resolve(&mut self, base: &Path) -> Result<(), ConfigError> {
        self.variables = template::variables::resolve(self, base)?;
        Ok(())
    }

    fn parse_include(
        &mut self,
        value: &Value,
        path: &JsonPath,
        defaults: &Defaults,
    ) -> Result<(), ValidationError> {
        match value {
            Value::Null => Ok(()),
            Value::Array(items) => {
                self.include = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| IncludeConfig::parse(item, &path.index(i), defaults))
                    .collect::<Result<_, _>>()?;
                Ok(())
            }
            _ => Err(ValidationError::new(
                path.to_string(),
                "must be a list or null",
            )),
        }
    }

    fn parse_variables(&mut self, value: &Value, path: &JsonPath) -> Result<(), ValidationError> {
        let Some(map) = node::mapping_or_null(value, path)? else {
            return Ok(());
        };
        for (k, v) in map {
            let Value::String(s) = v else {
                return Err(ValidationError::new(
                    path.key(k).to_string(),
                    "must be a string",
                ));
            };
            self.inline_variables.insert(k.clone(), s.clone());
        }
        self.variables = self.inline_variables.clone();
        Ok(())
    }
}

fn parse_snippets(
    value: &Value,
    path: &JsonPath,
    defaults: &Defaults,
) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(Some(defaults.template_snippets.clone())),
        Value::Bool(false) => Ok(None),
        Value::String(s) if !s.is_empty() => Ok(Some(s.clone())),
        _ => Err(ValidationError::new(
            path.to_string(),
            "must be a non-empty string, false or null",
        )),
    }
}

impl ConfigNode for TemplatesConfig {
    fn parse(value: &Value, path: &JsonPath, defaults: &Defaults) -> Result<Self, ValidationError> {
        let mut templates = Self::with_defaults(defaults);
        let Some(map) = node::mapping_or_null(value, path)? else {
            return Ok(templates);
        };
        for (k, v) in map {
            let child = path.key(k);
            match k.as_str() {
                "begin" => {
                    if let Some(begin) = node::non_empty_str_or_null(v, &child, None)? {
                        templates.begin = begin;
                    }
                }
                "end" => {
                    if let Some(end) = node::non_empty_str_or_null(v, &child, None)? {
                        templates.end = end;
                    }
                }
                "include" => templates.parse_include(v, &child, defaults)?,
                "snippets" => templates.snippets = parse_snippets(v, &child, defaults)?,
                "variables" => templates.parse_variables(v, &child)?,
                _ => return Err(node::invalid_key(path, k)),
            }
        }
        Ok(templates)
    }

    fn to_json(&self, defaults: &Defaults, minify: bool) -> Value {
        let include: Vec<Value> = self
            .include
            .iter()
            .map(|i| i.to_json(defaults, minify))
            .collect();
        let variables: Map<String, Value> = self
            .inline_variables
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
            .collect();

        let mut map = Map::new();
        map.insert("begin".into(), Value::from(self.begin.as_str()));
        map.insert("end".into(), Value::from(self.end.as_str()));
        map.insert("include".into(), node::null_if_empty(Value::Array(include)));
        map.insert(
            "snippets".into(),
            self.snippets.as_deref().map_or(Value::Bool(false), Value::from),
        );
        map.insert("variables".into(), node::null_if_empty(Value::Object(variables)));
        if minify {
            node::remove_if_default(&mut map, "begin", &Value::from(defaults.template_begin.as_str()));
            node::remove_if_default(&mut map, "end", &Value::from(defaults.template_end.as_str()));
            node::remove_if_default(&mut map, "include", &Value::Null);
            node::remove_if_default(
                &mut map,
                "snippets",
                &Value::from(defaults.template_snippets.as_str()),
            );
            node::remove_if_default(&mut map, "variables", &Value::Null);
        }
        Value::Object(map)
    }
}
