use crate::cli::parse_prefix;
use crate::config::ServeConfig;
use crate::error::{ConfigError, Result};

impl ServeConfig {
    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.command.is_empty() || self.command[0].trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "command".to_string(),
                hint: "Pass the build command after --, e.g. fob-serve serve -- npm run build"
                    .to_string(),
            }
            .into());
        }

        if self.port == 0 {
            return Err(invalid("port", "0", "Use a port between 1 and 65535"));
        }

        if self.keep_alive_secs == 0 {
            return Err(invalid(
                "keep_alive_secs",
                "0",
                "Keep-alive interval must be at least one second",
            ));
        }

        if self.queue_capacity == 0 {
            return Err(invalid(
                "queue_capacity",
                "0",
                "Each client needs room for at least one event",
            ));
        }

        if !self.stream_path.starts_with('/') {
            return Err(invalid(
                "stream_path",
                &self.stream_path,
                "The stream path must start with '/'",
            ));
        }

        if let Err(reason) = parse_prefix(&self.prefix) {
            return Err(invalid("prefix", &self.prefix, &reason));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: &str, hint: &str) -> crate::error::CliError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
    .into()
}
