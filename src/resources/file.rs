//! File contents resource.
use anyhow::{Context as _, Result};
use std::io;
use std::path::PathBuf;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::operations::FileSystemOps;

/// A file whose contents should equal `contents`.
#[derive(Debug)]
pub struct ContentResource<'a> {
    /// Target file path (absolute).
    pub target: PathBuf,
    /// Desired file contents.
    pub contents: String,
    fs: &'a dyn FileSystemOps,
}

impl<'a> ContentResource<'a> {
    /// Create a new content resource.
    #[must_use]
    pub const fn new(target: PathBuf, contents: String, fs: &'a dyn FileSystemOps) -> Self {
        Self {
            target,
            contents,
            fs,
        }
    }
}

impl Applicable for ContentResource<'_> {
    fn description(&self) -> String {
        format!("write {}", self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        super::helpers::fs::ensure_parent_dir(self.fs, &self.target)?;
        self.fs
            .write(&self.target, &self.contents)
            .with_context(|| format!("write file: {}", self.target.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ContentResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.fs.exists(&self.target) {
            return Ok(ResourceState::Missing);
        }
        match self.fs.read_to_string(&self.target) {
            Ok(current) if current == self.contents => Ok(ResourceState::Correct),
            Ok(current) => Ok(ResourceState::Incorrect {
                current: format!("{} bytes", current.len()),
            }),
            // Binary contents can never match rendered text.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Ok(ResourceState::Incorrect {
                current: "non-UTF-8 contents".to_string(),
            }),
            Err(e) => {
                Err(e).with_context(|| format!("read file: {}", self.target.display()))
            }
        }
    }
}
