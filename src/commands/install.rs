//! Command: install packages onto the live filesystem.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{DeployOpts, GlobalOpts};
use crate::logging::Log;
use crate::pipeline::Mode;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration loading, package resolution, path
/// expansion or the traversal fails, or if any file fails to render.
pub fn run(global: &GlobalOpts, opts: &DeployOpts, log: &Arc<dyn Log>) -> Result<()> {
    super::deploy(global, opts, Mode::Install, log)
}
