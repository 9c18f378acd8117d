//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that resources and the pipeline
//! can be unit-tested without touching the real filesystem. Production code
//! uses [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::io;
use std::path::Path;

/// Abstraction over the filesystem calls made while deploying files.
///
/// The production implementation is [`SystemFileSystemOps`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file at `path` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the contents of the file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Permission bits of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read.
    fn mode(&self, path: &Path) -> io::Result<u32>;

    /// Set the permission bits of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the permissions cannot be changed.
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    #[cfg(unix)]
    fn mode(&self, path: &Path) -> io::Result<u32> {
        use std::os::unix::fs::PermissionsExt;
        Ok(std::fs::metadata(path)?.permissions().mode() & 0o7777)
    }

    #[cfg(not(unix))]
    fn mode(&self, path: &Path) -> io::Result<u32> {
        let readonly = std::fs::metadata(path)?.permissions().readonly();
        Ok(if readonly { 0o444 } else { 0o644 })
    }

    #[cfg(unix)]
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
    }

    /// Execute bits have no meaning here.
    #[cfg(not(unix))]
    fn set_mode(&self, _path: &Path, _mode: u32) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Seed files with [`MockFileSystemOps::with_file`]; every mutation is
/// applied to the in-memory tree and counted so tests can assert that an
/// operation was, or was not, performed.
///
/// # Example
///
/// ```ignore
/// use dots::operations::MockFileSystemOps;
///
/// let fs = MockFileSystemOps::new().with_file("/home/ada/.bashrc", "export A=1\n", 0o644);
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: std::sync::Mutex<std::collections::HashMap<std::path::PathBuf, (String, u32)>>,
    dirs: std::sync::Mutex<std::collections::HashSet<std::path::PathBuf>>,
    writes: std::sync::atomic::AtomicUsize,
    mode_changes: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given contents and mode.
    #[must_use]
    pub fn with_file(self, path: impl Into<std::path::PathBuf>, contents: &str, mode: u32) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), (contents.to_string(), mode));
        self
    }

    /// Current contents of `path`, if it exists.
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).map(|(c, _)| c.clone())
    }

    /// Number of [`FileSystemOps::write`] calls made so far.
    pub fn writes(&self) -> usize {
        self.writes.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Number of [`FileSystemOps::set_mode`] calls made so far.
    pub fn mode_changes(&self) -> usize {
        self.mode_changes.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Whether `path` was created as a directory.
    pub fn has_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.dirs.lock().unwrap().contains(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.contents(path).ok_or_else(|| Self::not_found(path))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut files = self.files.lock().unwrap();
        let mode = files.get(path).map_or(0o644, |(_, m)| *m);
        files.insert(path.to_path_buf(), (contents.to_string(), mode));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn mode(&self, path: &Path) -> io::Result<u32> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|(_, m)| *m)
            .ok_or_else(|| Self::not_found(path))
    }

    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.mode_changes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut files = self.files.lock().unwrap();
        let entry = files.get_mut(path).ok_or_else(|| Self::not_found(path))?;
        entry.1 = mode;
        Ok(())
    }
}
