//! Top-level subcommand orchestration.
pub mod build;
pub mod format;
pub mod install;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{DeployOpts, GlobalOpts};
use crate::config::{Config, Defaults};
use crate::error::FilesFailed;
use crate::logging::Log;
use crate::paths::normalize;
use crate::pipeline::{self, FailurePolicy, Mode};
use crate::resolve::resolve;

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates root resolution and configuration loading so that each
/// command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Default values used to parse and serialize the configuration.
    pub defaults: Defaults,
    /// Directory relative paths are resolved against.
    pub root: PathBuf,
    /// Configuration file as given on the command line.
    pub config_arg: PathBuf,
    /// Configuration file on disk.
    pub config_path: PathBuf,
    /// The validated configuration with resolved variables.
    pub config: Arc<Config>,
}

impl CommandSetup {
    /// Resolve the root directory and load the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or the
    /// configuration fails to load, validate or resolve.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let defaults = Defaults::default();
        let root = resolve_root(global)?;
        let config_arg = global
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(&defaults.config_file));
        let config_path = root.join(&config_arg);

        log.debug(&format!("root: {}", root.display()));
        log.debug(&format!("loading {}", config_path.display()));
        let config = Config::load(&config_path, &root, &defaults)?;
        log.debug(&format!(
            "loaded {} packages, {} variables",
            config.packages.len(),
            config.templates.variables.len()
        ));

        Ok(Self {
            defaults,
            root,
            config_arg,
            config_path,
            config: Arc::new(config),
        })
    }
}

/// Resolve the root directory from the CLI argument or the current directory.
///
/// # Errors
///
/// Returns an error if `--root` is not given and the current directory
/// cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("determine current directory")?;
    Ok(match &global.root {
        Some(root) => normalize(&cwd.join(root)),
        None => cwd,
    })
}

/// Run `build` or `install`: resolve packages, traverse them, then format
/// the configuration when `build.format` is set.
///
/// # Errors
///
/// Returns an error if setup, package resolution or the traversal fails,
/// and [`FilesFailed`] if any file failed to render.
pub fn deploy(global: &GlobalOpts, opts: &DeployOpts, mode: Mode, log: &Arc<dyn Log>) -> Result<()> {
    let setup = CommandSetup::init(global, log.as_ref())?;

    if opts.packages.is_empty() {
        log.warn("no packages requested");
    }
    let packages = resolve(&setup.config, opts.packages.as_slice())?;
    log.debug(&format!("packages: {}", packages.join(", ")));

    let ctx = pipeline::Context::new(
        Arc::clone(&setup.config),
        Arc::clone(log),
        setup.root.clone(),
        global.dry_run,
        FailurePolicy::from_keep_going(opts.keep_going),
    );
    let report = pipeline::run(&ctx, mode, packages.as_slice())?;
    if global.dry_run {
        log.dry_run(&report.summary());
    } else {
        log.debug(&report.summary());
    }

    if !report.is_success() {
        return Err(FilesFailed {
            failed: report.failed,
            total: report.total(),
        }
        .into());
    }

    if setup.config.build.format {
        format::apply(&setup, global.dry_run, log.as_ref())?;
    }
    Ok(())
}
