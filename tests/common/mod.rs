// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed test repository and a fluent builder
// so each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dots::cli::{DeployOpts, GlobalOpts};
use dots::logging::{Log, Logger};

/// An isolated dots repository backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped (via the underlying
/// [`tempfile::TempDir`]).
pub struct TestRepo {
    /// Temporary directory containing the repository.
    pub root: tempfile::TempDir,
}

impl TestRepo {
    /// Path to the repository root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `rel` inside the repository.
    pub fn join(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Contents of `rel`, panicking if it cannot be read.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.join(rel))
            .unwrap_or_else(|e| panic!("read {rel}: {e}"))
    }

    /// Whether `rel` exists.
    pub fn exists(&self, rel: &str) -> bool {
        self.join(rel).exists()
    }

    /// Global options rooted at this repository.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            config: None,
            dry_run: false,
            root: Some(self.path().to_path_buf()),
        }
    }

    /// Global options rooted at this repository, in dry-run mode.
    pub fn global_dry_run(&self) -> GlobalOpts {
        GlobalOpts {
            dry_run: true,
            ..self.global()
        }
    }
}

/// Fluent builder for [`TestRepo`].
pub struct TestRepoBuilder {
    repo: TestRepo,
}

impl TestRepoBuilder {
    /// Begin building an empty repository.
    pub fn new() -> Self {
        Self {
            repo: TestRepo {
                root: tempfile::tempdir().expect("create temp dir"),
            },
        }
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.repo.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, contents).expect("write file");
        self
    }

    /// Write `config` as `dots.json`.
    ///
    /// `{root}` in any string is replaced by the repository path so tests
    /// can install to absolute destinations inside the temp directory.
    pub fn config(self, config: &serde_json::Value) -> Self {
        let text = serde_json::to_string(config).expect("serialize config");
        let root = self.repo.path().display().to_string();
        let text = text.replace("{root}", &root);
        self.file("dots.json", &text)
    }

    /// Finalise the repository.
    pub fn build(self) -> TestRepo {
        self.repo
    }
}

/// A logger with no subscriber installed, so nothing is printed.
pub fn quiet_log() -> Arc<dyn Log> {
    Arc::new(Logger::new("integration-test"))
}

/// Options selecting `packages`.
pub fn packages(names: &[&str]) -> DeployOpts {
    DeployOpts {
        packages: names.iter().map(ToString::to_string).collect(),
        keep_going: false,
    }
}
