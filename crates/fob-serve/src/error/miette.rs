//! Conversion from CLI errors to miette reports.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert a [`CliError`] into a report for the terminal.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert a [`BuildError`] into a report.
///
/// Failed commands get their captured stderr as the body of the report.
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::CommandFailed { status, stderr } if !stderr.trim().is_empty() => {
            miette::miette!(
                "Build command exited with {}\n\n{}",
                status,
                stderr.trim_end()
            )
        }
        BuildError::CommandFailed { status, .. } => {
            miette::miette!(
                "Build command exited with {}\n\nHint: Run the command directly to see its output",
                status
            )
        }
        _ => miette::miette!("{}", err),
    }
}
