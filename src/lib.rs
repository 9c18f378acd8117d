//! Configuration-driven dot file deployment.
//!
//! A JSON document describes *packages*: named groups of source files with
//! destinations, per-file behaviour and dependencies on other packages.
//! `dots` resolves the requested packages and either stages their files in
//! a build directory or installs them onto the live filesystem, rendering
//! embedded template expressions on the way.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]** — parse, validate and serialize the configuration document
//! - **[`template`]** — variable resolution and delimiter-bounded expression substitution
//! - **[`resolve`]** — package dependency closure
//! - **[`resources`]** — idempotent `check + apply` primitives (file contents, execute bits)
//! - **[`pipeline`]** — the build/install traversal wired to resources
//! - **[`commands`]** — top-level subcommand orchestration (`build`, `install`, `format`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod pipeline;
pub mod resolve;
pub mod resources;
pub mod template;
