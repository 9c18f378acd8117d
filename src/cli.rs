//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for dots.
#[derive(Parser, Debug)]
#[command(name = "dots", about = "Manage dot files", version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Config file path [default: dots.json]
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Preview changes without modifying any files on disk
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Directory that relative paths are resolved against [default: current directory]
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build packages locally
    Build(DeployOpts),
    /// Format the configuration file
    Format,
    /// Install packages on the system
    Install(DeployOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used to name the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Build(_) => "build",
            Self::Format => "format",
            Self::Install(_) => "install",
            Self::Version => "version",
        }
    }
}

/// Options for the `build` and `install` subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct DeployOpts {
    /// Package name to operate on
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Keep processing after a file fails and report every failure
    #[arg(short, long)]
    pub keep_going: bool,
}
