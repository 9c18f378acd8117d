#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! Integration tests for the `build` command.
//!
//! These tests run the command end to end against a temporary repository:
//! configuration loading, variable resolution, dependency closure, staging
//! into the build directory and the automatic configuration rewrite.

mod common;

use common::{TestRepo, TestRepoBuilder, packages, quiet_log};
use dots::commands;
use dots::error::{ConfigError, FilesFailed};
use serde_json::json;

fn shell_repo() -> TestRepo {
    TestRepoBuilder::new()
        .config(&json!({
            "templates": {
                "variables": {"user": "ada"},
                "include": ["vars.json"]
            },
            "packages": {
                "base": {"files": {"profile": "~/.profile"}},
                "shell": {
                    "requires": ["base"],
                    "files": {
                        "shell/bashrc": {"dest": "~/.bashrc", "template": true},
                        "shell/bin/greet": {"executable": true}
                    }
                }
            }
        }))
        .file("vars.json", r#"{"editor": "vim"}"#)
        .file("snippets/banner.txt", "# managed by dots\n")
        .file("profile", "export PATH\n")
        .file("shell/bashrc", "{{{_banner}}}export EDITOR={{{_editor}}} USER={{{_user}}}\n")
        .file("shell/bin/greet", "#!/bin/sh\necho hi\n")
        .build()
}

// ---------------------------------------------------------------------------
// Staging
// ---------------------------------------------------------------------------

#[test]
fn build_stages_requested_package_and_dependencies() {
    let repo = shell_repo();
    commands::build::run(&repo.global(), &packages(&["shell"]), &quiet_log()).unwrap();

    assert_eq!(repo.read("build/profile"), "export PATH\n");
    assert_eq!(
        repo.read("build/shell/bashrc"),
        "# managed by dots\nexport EDITOR=vim USER=ada\n"
    );
    assert_eq!(repo.read("build/shell/bin/greet"), "#!/bin/sh\necho hi\n");
}

#[cfg(unix)]
#[test]
fn build_sets_execute_bits() {
    use std::os::unix::fs::PermissionsExt as _;

    let repo = shell_repo();
    commands::build::run(&repo.global(), &packages(&["shell"]), &quiet_log()).unwrap();
    let mode = std::fs::metadata(repo.join("build/shell/bin/greet"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0o111);
    let mode = std::fs::metadata(repo.join("build/profile"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0);
}

#[test]
fn build_with_no_packages_stages_nothing() {
    let repo = shell_repo();
    commands::build::run(&repo.global(), &packages(&[]), &quiet_log()).unwrap();
    assert!(!repo.exists("build"));
}

#[test]
fn dry_run_writes_nothing() {
    let repo = shell_repo();
    let before = repo.read("dots.json");
    commands::build::run(&repo.global_dry_run(), &packages(&["shell"]), &quiet_log()).unwrap();
    assert!(!repo.exists("build"));
    assert_eq!(repo.read("dots.json"), before);
}

#[test]
fn custom_build_directory() {
    let repo = TestRepoBuilder::new()
        .config(&json!({
            "build": {"dir": "out/stage"},
            "templates": {"snippets": false},
            "packages": {"p": {"files": {"a": {}}}}
        }))
        .file("a", "A")
        .build();
    commands::build::run(&repo.global(), &packages(&["p"]), &quiet_log()).unwrap();
    assert_eq!(repo.read("out/stage/a"), "A");
}

// ---------------------------------------------------------------------------
// Configuration rewrite
// ---------------------------------------------------------------------------

#[test]
fn build_rewrites_configuration_canonically() {
    let repo = shell_repo();
    commands::build::run(&repo.global(), &packages(&["base"]), &quiet_log()).unwrap();
    let written = repo.read("dots.json");
    assert!(written.starts_with("{\n  \"packages\": {\n    \"base\": {"));
    assert!(written.ends_with("}\n"));
    assert!(written.contains("\"shell/bin/greet\": {\n          \"executable\": true\n        }"));
}

#[test]
fn format_disabled_leaves_configuration_alone() {
    let raw = r#"{"build":{"format":false},"templates":{"snippets":false},"packages":{"p":{"files":{"a":{}}}}}"#;
    let repo = TestRepoBuilder::new().file("dots.json", raw).file("a", "A").build();
    commands::build::run(&repo.global(), &packages(&["p"]), &quiet_log()).unwrap();
    assert_eq!(repo.read("dots.json"), raw);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn unknown_package_is_fatal() {
    let repo = shell_repo();
    let err = commands::build::run(&repo.global(), &packages(&["nope"]), &quiet_log()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::UnknownPackage(name)) if name == "nope"
    ));
    assert!(!repo.exists("build"));
}

fn broken_repo() -> TestRepo {
    TestRepoBuilder::new()
        .config(&json!({
            "templates": {"snippets": false},
            "packages": {"p": {"files": {
                "bad": {"template": true},
                "good": {}
            }}}
        }))
        .file("bad", "{{{_undefined}}}")
        .file("good", "fine")
        .build()
}

#[test]
fn render_failure_stops_and_skips_rewrite() {
    let repo = broken_repo();
    let before = repo.read("dots.json");
    let err = commands::build::run(&repo.global(), &packages(&["p"]), &quiet_log()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<FilesFailed>(),
        Some(&FilesFailed { failed: 1, total: 1 })
    );
    assert!(!repo.exists("build/good"));
    assert_eq!(repo.read("dots.json"), before);
}

#[test]
fn keep_going_processes_remaining_files() {
    let repo = broken_repo();
    let mut opts = packages(&["p"]);
    opts.keep_going = true;
    let err = commands::build::run(&repo.global(), &opts, &quiet_log()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<FilesFailed>(),
        Some(&FilesFailed { failed: 1, total: 2 })
    );
    assert_eq!(repo.read("build/good"), "fine");
    assert!(!repo.exists("build/bad"));
}

#[test]
fn missing_required_include_is_fatal() {
    let repo = TestRepoBuilder::new()
        .config(&json!({"templates": {"include": ["absent.json"]}}))
        .build();
    let err = commands::build::run(&repo.global(), &packages(&[]), &quiet_log()).unwrap_err();
    assert_eq!(err.to_string(), "include file absent.json does not exist");
}
