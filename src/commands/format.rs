//! Command: rewrite the configuration file in canonical form.
use std::sync::Arc;

use anyhow::{Context as _, Result};
use serde_json::{Map, Value};

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::config::ConfigNode as _;
use crate::logging::{Log, Outcome, Status};
use crate::operations::SystemFileSystemOps;
use crate::resources::file::ContentResource;
use crate::resources::{Resource as _, ResourceChange};

/// Status line title for configuration rewrites.
const TITLE: &str = "Format";

/// Serialize `value` with 2-space indentation, every object's keys sorted,
/// and a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Examples
///
/// ```
/// use dots::commands::format::canonical_json;
///
/// let v = serde_json::json!({"b": 1, "a": {"d": true, "c": null}});
/// assert_eq!(
///     canonical_json(&v).unwrap(),
///     "{\n  \"a\": {\n    \"c\": null,\n    \"d\": true\n  },\n  \"b\": 1\n}\n"
/// );
/// ```
pub fn canonical_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(&sorted(value))?;
    text.push('\n');
    Ok(text)
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted(v)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

/// Rewrite the configuration file from the parsed configuration, minified
/// and canonical.
///
/// Nothing is written when the file already matches. A dry run reports the
/// rewrite without performing it.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn apply(setup: &CommandSetup, dry_run: bool, log: &dyn Log) -> Result<()> {
    let text = canonical_json(&setup.config.to_json(&setup.defaults, true))
        .context("serialize configuration")?;
    let status = |outcome| Status::new(outcome, TITLE).src(setup.config_arg.display().to_string());

    if dry_run {
        log.status(&status(Outcome::DryRun));
        return Ok(());
    }

    let fs = SystemFileSystemOps;
    let file = ContentResource::new(setup.config_path.clone(), text, &fs);
    if file.ensure()? == ResourceChange::Applied {
        log.status(&status(Outcome::Ok));
    } else {
        log.debug(&format!("{} already formatted", setup.config_arg.display()));
    }
    Ok(())
}

/// Run the format command.
///
/// # Errors
///
/// Returns an error if the configuration fails to load or cannot be
/// rewritten.
pub fn run(global: &GlobalOpts, log: &Arc<dyn Log>) -> Result<()> {
    let setup = CommandSetup::init(global, log.as_ref())?;
    apply(&setup, global.dry_run, log.as_ref())
}
