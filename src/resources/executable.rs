//! Execute-permission resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::operations::FileSystemOps;

/// The user, group and other execute bits.
pub const EXECUTE_BITS: u32 = 0o111;

/// Desired mode for a file currently at `mode`: only the execute bits change.
///
/// # Examples
///
/// ```
/// use dots::resources::executable::desired_mode;
///
/// assert_eq!(desired_mode(0o644, true), 0o755);
/// assert_eq!(desired_mode(0o750, false), 0o640);
/// ```
#[must_use]
pub const fn desired_mode(mode: u32, executable: bool) -> u32 {
    if executable {
        mode | EXECUTE_BITS
    } else {
        mode & !EXECUTE_BITS
    }
}

/// Execute bits on an existing file.
#[derive(Debug)]
pub struct ExecutableResource<'a> {
    /// Target file path (absolute).
    pub target: PathBuf,
    /// Whether the execute bits should be set or cleared.
    pub executable: bool,
    fs: &'a dyn FileSystemOps,
}

impl<'a> ExecutableResource<'a> {
    /// Create a new executable resource.
    #[must_use]
    pub const fn new(target: PathBuf, executable: bool, fs: &'a dyn FileSystemOps) -> Self {
        Self {
            target,
            executable,
            fs,
        }
    }

    fn mode(&self) -> Result<u32> {
        self.fs
            .mode(&self.target)
            .with_context(|| format!("read permissions: {}", self.target.display()))
    }
}

impl Applicable for ExecutableResource<'_> {
    fn description(&self) -> String {
        let action = if self.executable { "+x" } else { "-x" };
        format!("chmod {action} {}", self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let current = self.mode()?;
        let desired = desired_mode(current, self.executable);
        if desired == current {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        self.fs
            .set_mode(&self.target, desired)
            .with_context(|| format!("set permissions: {}", self.target.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ExecutableResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.fs.exists(&self.target) {
            return Ok(ResourceState::Missing);
        }
        let current = self.mode()?;
        if desired_mode(current, self.executable) == current {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("{current:o}"),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;
    use std::path::Path;

    #[test]
    fn matching_mode_makes_no_change() {
        let fs = MockFileSystemOps::new().with_file("/bin/tool", "", 0o755);
        let r = ExecutableResource::new(PathBuf::from("/bin/tool"), true, &fs);
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(r.ensure().unwrap(), ResourceChange::AlreadyCorrect);
        assert_eq!(fs.mode_changes(), 0);
    }

    #[test]
    fn setting_adds_exactly_the_execute_bits() {
        let fs = MockFileSystemOps::new().with_file("/bin/tool", "", 0o640);
        let r = ExecutableResource::new(PathBuf::from("/bin/tool"), true, &fs);
        assert_eq!(
            r.current_state().unwrap(),
            ResourceState::Incorrect {
                current: "640".into()
            }
        );
        assert_eq!(r.ensure().unwrap(), ResourceChange::Applied);
        assert_eq!(fs.mode(Path::new("/bin/tool")).unwrap(), 0o751);
        assert_eq!(fs.mode_changes(), 1);
    }

    #[test]
    fn clearing_removes_only_the_execute_bits() {
        let fs = MockFileSystemOps::new().with_file("/a", "", 0o4755);
        let r = ExecutableResource::new(PathBuf::from("/a"), false, &fs);
        r.ensure().unwrap();
        assert_eq!(fs.mode(Path::new("/a")).unwrap(), 0o4644);
    }

    #[test]
    fn missing_target_reports_missing() {
        let fs = MockFileSystemOps::new();
        let r = ExecutableResource::new(PathBuf::from("/nope"), true, &fs);
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        assert!(r.apply().is_err());
    }

    #[test]
    fn description_shows_direction() {
        let fs = MockFileSystemOps::new();
        assert_eq!(
            ExecutableResource::new(PathBuf::from("/a"), true, &fs).description(),
            "chmod +x /a"
        );
        assert_eq!(
            ExecutableResource::new(PathBuf::from("/a"), false, &fs).description(),
            "chmod -x /a"
        );
    }
}
