//! Check command: resolve and validate the configuration without serving.

use crate::cli::CheckArgs;
use crate::config::{ServeConfig, ServeOverrides};
use crate::error::Result;
use crate::ui;

/// Print the resolved configuration as JSON on stdout.
///
/// # Errors
///
/// Any loading or validation error.
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking configuration...");

    let cwd = std::env::current_dir()?;
    let config = ServeConfig::load(&cwd, args.config.as_deref(), &ServeOverrides::default())?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    ui::success("Configuration is valid");
    Ok(())
}
