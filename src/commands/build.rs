//! Command: stage packages into the build directory.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{DeployOpts, GlobalOpts};
use crate::logging::Log;
use crate::pipeline::Mode;

/// Run the build command.
///
/// # Errors
///
/// Returns an error if configuration loading, package resolution or the
/// traversal fails, or if any file fails to render.
pub fn run(global: &GlobalOpts, opts: &DeployOpts, log: &Arc<dyn Log>) -> Result<()> {
    super::deploy(global, opts, Mode::Build, log)
}
