//! The configuration data model.
//!
//! A `dots.json` document is parsed into a tree of typed nodes, each
//! implementing [`ConfigNode`]. Parsing validates the whole document up
//! front and fills every omitted field from [`Defaults`]; serialization
//! writes it back, optionally minified.
pub mod build;
pub mod defaults;
pub mod file;
pub mod include;
mod node;
pub mod package;
mod path;
pub mod templates;

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

pub use build::BuildConfig;
pub use defaults::Defaults;
pub use file::FileConfig;
pub use include::IncludeConfig;
pub use node::ConfigNode;
pub use package::{FileEntry, PackageConfig};
pub use path::JsonPath;
pub use templates::TemplatesConfig;

use crate::error::{ConfigError, ValidationError};

/// A fully validated configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Build settings.
    pub build: BuildConfig,
    /// Packages by name, sorted.
    pub packages: BTreeMap<String, PackageConfig>,
    /// Template settings and the resolved variable map.
    pub templates: TemplatesConfig,
}

impl Config {
    /// Read, validate and resolve the document at `path`.
    ///
    /// Include and snippet paths are resolved relative to `base`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, is not JSON,
    /// fails validation, or its template variables cannot be resolved.
    pub fn load(path: &Path, base: &Path, defaults: &Defaults) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: display,
            source,
        })?;
        Self::from_value(&value, base, defaults)
    }

    /// Validate `value` and resolve its template variables against `base`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] on validation or variable resolution
    /// failure.
    pub fn from_value(value: &Value, base: &Path, defaults: &Defaults) -> Result<Self, ConfigError> {
        let mut config = Self::parse(value, &JsonPath::root(), defaults)?;
        config.templates.resolve(base)?;
        Ok(config)
    }

    fn parse_packages(
        value: &Value,
        path: &JsonPath,
        defaults: &Defaults,
    ) -> Result<BTreeMap<String, PackageConfig>, ValidationError> {
        let Some(map) = node::mapping_or_null(value, path)? else {
            return Ok(BTreeMap::new());
        };
        map.iter()
            .map(|(name, v)| Ok((name.clone(), PackageConfig::parse(v, &path.key(name), defaults)?)))
            .collect()
    }
}

/// Parsing a `Config` validates only; variables stay unresolved until
/// [`Config::from_value`] or [`Config::load`] runs the resolver.
impl ConfigNode for Config {
    fn parse(value: &Value, path: &JsonPath, defaults: &Defaults) -> Result<Self, ValidationError> {
        let Value::Object(map) = value else {
            return Err(ValidationError::new(path.to_string(), "must be a mapping"));
        };
        let mut config = Self {
            build: BuildConfig::with_defaults(defaults),
            packages: BTreeMap::new(),
            templates: TemplatesConfig::with_defaults(defaults),
        };
        for (k, v) in map {
            let child = path.key(k);
            match k.as_str() {
                "build" => config.build = BuildConfig::parse(v, &child, defaults)?,
                "packages" => config.packages = Self::parse_packages(v, &child, defaults)?,
                "templates" => config.templates = TemplatesConfig::parse(v, &child, defaults)?,
                _ => return Err(node::invalid_key(path, k)),
            }
        }
        Ok(config)
    }

    fn to_json(&self, defaults: &Defaults, minify: bool) -> Value {
        let packages: Map<String, Value> = self
            .packages
            .iter()
            .map(|(name, p)| (name.clone(), p.to_json(defaults, minify)))
            .collect();

        let mut map = Map::new();
        map.insert("build".into(), self.build.to_json(defaults, minify));
        map.insert("packages".into(), node::null_if_empty(Value::Object(packages)));
        map.insert("templates".into(), self.templates.to_json(defaults, minify));
        if minify {
            for key in ["build", "packages", "templates"] {
                let empty = map.get(key).is_some_and(|v| node::null_if_empty(v.clone()).is_null());
                if empty {
                    map.remove(key);
                }
            }
        }
        Value::Object(map)
    }
}
