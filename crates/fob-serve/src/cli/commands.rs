use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::validation::parse_prefix;
use crate::config::{NotifyMode, ServeOverrides};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build, serve the output from memory, and rebuild on change
    ///
    /// Runs the build command once, stages everything it wrote to the output
    /// directory in memory, then watches sources and pushes a change event to
    /// every connected browser after each rebuild.
    Serve(ServeArgs),

    /// Validate the configuration and print the resolved settings as JSON
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Path to a fob-serve.toml or fob-serve.json config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Directory the build command writes its output to
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Public path prefix for staged files (e.g. "static")
    #[arg(long, value_parser = parse_prefix)]
    pub prefix: Option<String>,

    /// Notify browsers once per stored file instead of once per rebuild
    #[arg(long)]
    pub per_write: bool,

    /// Build command and its arguments
    ///
    /// Example:
    ///   fob-serve serve -- npm run build
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl ServeArgs {
    /// CLI layer for configuration loading. Flags that were not given stay unset.
    pub fn overrides(&self) -> ServeOverrides {
        ServeOverrides {
            host: self.host.clone(),
            port: self.port,
            out_dir: self.out_dir.clone(),
            prefix: self.prefix.clone(),
            notify_mode: self.per_write.then_some(NotifyMode::PerWrite),
            command: (!self.command.is_empty()).then(|| self.command.clone()),
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to a fob-serve.toml or fob-serve.json config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
