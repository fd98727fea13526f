//! Command-line interface for the dev server.
//!
//! - `fob-serve serve` - build, serve from memory, and live reload on change
//! - `fob-serve check` - validate the configuration and print it

mod commands;
mod validation;

use clap::Parser;

pub use commands::{CheckArgs, Command, ServeArgs};
pub use validation::parse_prefix;

/// fob-serve - in-memory dev server with live reload
#[derive(Parser, Debug)]
#[command(
    name = "fob-serve",
    version,
    about = "Serve build output from memory and live reload browsers on change",
    long_about = "fob-serve runs your build command, keeps its output in memory, and serves it over HTTP.\n\
                  Connected browsers are told which files changed through a Server-Sent Events stream."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
