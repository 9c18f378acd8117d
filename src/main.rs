//! Command-line entry point for dots.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use dots::cli::{Cli, Command};
use dots::commands;
use dots::error::{ConfigError, FilesFailed};
use dots::logging::{self, Log, Logger, Outcome, Status};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose, args.command.name());
    let logger = Logger::new(args.command.name());
    if let Some(path) = logger.log_path() {
        logger.debug(&format!("log file: {}", path.display()));
    }
    let log: Arc<dyn Log> = Arc::new(logger);

    let result = match &args.command {
        Command::Build(opts) => commands::build::run(&args.global, opts, &log),
        Command::Format => commands::format::run(&args.global, &log),
        Command::Install(opts) => commands::install::run(&args.global, opts, &log),
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(log.as_ref(), &e);
            ExitCode::FAILURE
        }
    }
}

/// Report a fatal error once, as an `Exception` status line.
///
/// File failures were already reported on their own lines.
fn report(log: &dyn Log, err: &anyhow::Error) {
    if let Some(failed) = err.downcast_ref::<FilesFailed>() {
        log.debug(&failed.to_string());
        return;
    }
    let mut status = Status::new(Outcome::Failed, "Exception");
    if matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Json { .. } | ConfigError::Validation(_))
    ) {
        status = status.src("JSON Validation");
    }
    log.status(&status.message(format!("{err:#}")));
}
