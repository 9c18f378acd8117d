//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;

use crate::operations::FileSystemOps;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// This is a shared helper for resource `apply()` methods that write a file
/// into a tree that may not exist yet.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(fs: &dyn FileSystemOps, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !fs.exists(parent)
    {
        fs.create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}
