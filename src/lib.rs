//! dupecull - Interactive Duplicate File Finder
//!
//! Lists the files under a directory grouped by size, confirms duplicates by
//! hashing only files that share a size, numbers every duplicate, and deletes
//! the ones picked by number.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod prompt;
pub mod report;
pub mod scanner;
pub mod session;

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::ExitCode;
use crate::progress::Progress;
use crate::session::Session;

/// Message printed when no directory is given.
pub const MISSING_ROOT: &str = "Directory is not specified";

/// Run the application with parsed CLI arguments.
///
/// Reads answers from stdin and prints listings to stdout.
///
/// # Errors
///
/// Returns an error for bad settings, filesystem failures during indexing
/// or hashing, closed input, and deletion failures unless
/// `--continue-on-error` is given.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color || !io::stdout().is_terminal() {
        yansi::disable();
    }

    let Some(root) = cli.path.as_deref() else {
        println!("{MISSING_ROOT}");
        return Ok(ExitCode::UsageError);
    };

    let settings = Settings::load(&cli).context("Invalid settings")?;
    log::debug!("Settings: {:?}", settings);

    let progress = Arc::new(Progress::new(cli.quiet || !io::stderr().is_terminal()));
    let mut session = Session::new(settings, io::stdin().lock(), io::stdout().lock())
        .with_color(yansi::is_enabled())
        .with_progress(progress);

    let summary = session.run(root)?;
    log::debug!("Session finished: {:?}", summary);

    Ok(ExitCode::Success)
}
