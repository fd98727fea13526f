//! Error types for the dev server.
//!
//! [`CliError`] is what commands return. Domain errors ([`ConfigError`],
//! [`BuildError`]) convert into it with `?`, as do the library errors from
//! `fob-memfs` and `fob-reload`. At the binary edge a `CliError` becomes a
//! miette report via [`cli_error_to_miette`].

mod miette;

pub use self::miette::{build_error_to_miette, cli_error_to_miette};

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Asset store failures
    #[error("Store error: {0}")]
    Store(#[from] fob_memfs::StoreError),

    /// Event stream failures
    #[error("Live reload error: {0}")]
    Reload(#[from] fob_reload::ReloadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bind or serve failures
    #[error("Server error: {0}")]
    Server(String),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--config` pointed at a file that does not exist
    #[error("Config file not found: {}\n\nHint: Create fob-serve.toml or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// Merging the config layers failed
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Errors raised while running the build command or staging its output.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An output file is not under the configured output directory
    #[error("Output file {} is outside the output directory {}\n\nHint: The build must write into --out-dir", .path.display(), .root.display())]
    OutsideOutputRoot { path: PathBuf, root: PathBuf },

    /// The build command exited unsuccessfully
    #[error("Build command exited with {status}\n{stderr}")]
    CommandFailed { status: String, stderr: String },

    /// The build command could not be started
    #[error("Failed to start build command '{program}': {source}\n\nHint: Check that the program is installed and on PATH")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Walking the output directory failed
    #[error("Failed to read build output: {0}")]
    Walk(#[from] walkdir::Error),

    /// Reading one output file failed
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an output file into the store failed
    #[error("Failed to stage {path}: {source}")]
    Store {
        path: String,
        #[source]
        source: fob_memfs::StoreError,
    },

    /// Broadcasting the batch of changed paths failed
    #[error("Failed to notify clients: {0}")]
    Notify(#[from] fob_reload::ReloadError),
}

/// Result alias defaulting to [`CliError`].
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Helpers for adding context to errors on the way up.
pub trait ResultExt<T> {
    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_output_root_names_both_paths() {
        let err = BuildError::OutsideOutputRoot {
            path: PathBuf::from("/tmp/elsewhere/app.js"),
            root: PathBuf::from("/project/dist"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/elsewhere/app.js"));
        assert!(msg.contains("/project/dist"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_command_failed_includes_stderr() {
        let err = BuildError::CommandFailed {
            status: "exit status: 2".to_string(),
            stderr: "error: unexpected token".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit status: 2"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_store_error_converts() {
        let err: CliError = fob_memfs::StoreError::Closed.into();
        assert!(matches!(err, CliError::Store(_)));
    }

    #[test]
    fn test_config_error_converts() {
        let err: CliError = ConfigError::NotFound(PathBuf::from("fob-serve.toml")).into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("fob-serve.toml"));
    }

    #[test]
    fn test_invalid_value_message() {
        let err = ConfigError::InvalidValue {
            field: "port".to_string(),
            value: "0".to_string(),
            hint: "Use a port between 1 and 65535".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'port'"));
        assert!(msg.contains("between 1 and 65535"));
    }

    #[test]
    fn test_result_ext_with_hint() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::NotFound(PathBuf::from("serve.json")));

        let err = result.with_hint("Try creating the file").unwrap_err();
        assert!(err.to_string().contains("Hint: Try creating the file"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "address in use",
        ));

        let err = result.context("Failed to bind").unwrap_err();
        assert!(err.to_string().starts_with("Failed to bind: "));
    }
}
