//! The build/install traversal.
//!
//! [`run`] plans every file of the requested packages up front, then
//! renders, writes and adjusts permissions file by file, reporting one
//! status line per file.
mod context;
pub mod plan;

pub use context::{Context, FailurePolicy};
pub use plan::{FileOperation, plan};

use anyhow::{Context as _, Result};

use crate::logging::{Outcome, Status};
use crate::resources::Resource as _;
use crate::resources::executable::ExecutableResource;
use crate::resources::file::ContentResource;
use crate::template;

/// Where files are deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stage files into the build directory.
    Build,
    /// Write files to their configured destinations.
    Install,
}

impl Mode {
    /// Status line title for this mode.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Build => "Build",
            Self::Install => "Install",
        }
    }
}

/// Per-file counts for one traversal.
///
/// # Examples
///
/// ```
/// use dots::pipeline::Report;
///
/// let report = Report { written: 3, failed: 1, dry_run: 0 };
/// assert_eq!(report.summary(), "3 written, 1 failed");
/// assert!(!report.is_success());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Files deployed (or already up to date).
    pub written: u32,
    /// Files that failed to render.
    pub failed: u32,
    /// Files that would have been deployed.
    pub dry_run: u32,
}

impl Report {
    /// Format the summary string (e.g. "3 written, 1 failed").
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.written > 0 || self.dry_run == 0 {
            parts.push(format!("{} written", self.written));
        }
        if self.dry_run > 0 {
            parts.push(format!("{} would be written", self.dry_run));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        parts.join(", ")
    }

    /// Files attempted.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.written + self.failed + self.dry_run
    }

    /// Whether every file succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    const fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Ok => self.written += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::DryRun => self.dry_run += 1,
        }
    }
}

/// Deploy every file of `packages` in `mode`.
///
/// Render failures are reported on the file's status line and counted in
/// the returned [`Report`]; with [`FailurePolicy::StopAtFirst`] the
/// traversal ends at the first one.
///
/// # Errors
///
/// Returns an error if planning fails (before anything is written) or if
/// reading a source, writing a target or changing its mode fails.
pub fn run<S: AsRef<str>>(ctx: &Context, mode: Mode, packages: &[S]) -> Result<Report> {
    let operations = plan(ctx, mode, packages)?;
    ctx.log.debug(&format!("{} files planned", operations.len()));

    let mut report = Report::default();
    for op in &operations {
        let outcome = execute(ctx, mode, op)?;
        report.record(outcome);
        if outcome == Outcome::Failed && ctx.policy == FailurePolicy::StopAtFirst {
            break;
        }
    }
    Ok(report)
}

/// Deploy a single file and report its status line.
fn execute(ctx: &Context, mode: Mode, op: &FileOperation) -> Result<Outcome> {
    let title = op.title(mode);
    let status = |outcome| {
        Status::new(outcome, title.as_str())
            .src(op.source.as_str())
            .target(op.display_target.as_str())
    };

    let text = ctx
        .fs_ops
        .read_to_string(&op.source_path)
        .with_context(|| format!("read source file: {}", op.source_path.display()))?;

    let contents = if op.config.template {
        let templates = &ctx.config.templates;
        match template::render(&templates.variables, &templates.begin, &templates.end, &text) {
            Ok(rendered) => rendered,
            Err(e) => {
                ctx.log.status(&status(Outcome::Failed).message(e.to_string()));
                return Ok(Outcome::Failed);
            }
        }
    } else {
        text
    };

    if ctx.dry_run {
        ctx.log.status(&status(Outcome::DryRun));
        return Ok(Outcome::DryRun);
    }

    let fs = ctx.fs_ops.as_ref();
    let content = ContentResource::new(op.target.clone(), contents, fs);
    content.ensure()?;
    let executable = ExecutableResource::new(op.target.clone(), op.config.executable, fs);
    executable.ensure()?;

    ctx.log.status(&status(Outcome::Ok));
    Ok(Outcome::Ok)
}
