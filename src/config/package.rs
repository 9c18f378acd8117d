//! Packages: named groups of files with dependencies.
use serde_json::{Map, Value};

use super::defaults::Defaults;
use super::file::FileConfig;
use super::node::{self, ConfigNode};
use super::path::JsonPath;
use crate::error::ValidationError;

/// One `source path → behaviour` entry of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Source path as written in the configuration.
    pub source: String,
    /// How the file is deployed.
    pub config: FileConfig,
}

/// A named, independently selectable group of files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageConfig {
    /// Files in the order they are declared in the document.
    pub files: Vec<FileEntry>,
    /// Names of packages this one depends on, sorted. Duplicates are kept.
    pub requires: Vec<String>,
}

impl PackageConfig {
    fn parse_files(
        &mut self,
        value: &Value,
        path: &JsonPath,
        defaults: &Defaults,
    ) -> Result<(), ValidationError> {
        let Some(map) = node::mapping_or_null(value, path)? else {
            return Ok(());
        };
        for (source, v) in map {
            self.files.push(FileEntry {
                source: source.clone(),
                config: FileConfig::parse(v, &path.key(source), defaults)?,
            });
        }
        Ok(())
    }

    fn parse_requires(&mut self, value: &Value, path: &JsonPath) -> Result<(), ValidationError> {
        let items = match value {
            Value::Null => return Ok(()),
            Value::Array(items) => items,
            _ => {
                return Err(ValidationError::new(
                    path.to_string(),
                    "must be a list or null",
                ));
            }
        };
        let mut requires = items
            .iter()
            .enumerate()
            .map(|(i, item)| node::non_empty_str(item, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()?;
        requires.sort();
        self.requires = requires;
        Ok(())
    }
}

impl ConfigNode for PackageConfig {
    fn parse(value: &Value, path: &JsonPath, defaults: &Defaults) -> Result<Self, ValidationError> {
        let mut package = Self::default();
        let Some(map) = node::mapping_or_null(value, path)? else {
            return Ok(package);
        };
        for (k, v) in map {
            match k.as_str() {
                "files" => package.parse_files(v, &path.key(k), defaults)?,
                "requires" => package.parse_requires(v, &path.key(k))?,
                _ => return Err(node::invalid_key(path, k)),
            }
        }
        Ok(package)
    }

    fn to_json(&self, defaults: &Defaults, minify: bool) -> Value {
        let files: Map<String, Value> = self
            .files
            .iter()
            .map(|entry| (entry.source.clone(), entry.config.to_json(defaults, minify)))
            .collect();
        let requires: Vec<Value> = self.requires.iter().map(|r| Value::from(r.as_str())).collect();

        let mut map = Map::new();
        map.insert("files".into(), node::null_if_empty(Value::Object(files)));
        map.insert("requires".into(), node::null_if_empty(Value::Array(requires)));
        if minify {
            node::remove_if_default(&mut map, "files", &Value::Null);
            node::remove_if_default(&mut map, "requires", &Value::Null);
        }
        Value::Object(map)
    }
}
