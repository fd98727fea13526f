use crate::config::{NotifyMode, ServeConfig};
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Config files looked up in the project root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["fob-serve.toml", "fob-serve.json"];

/// Prefix for environment overrides, e.g. `FOB_SERVE_PORT=8080`.
pub const ENV_PREFIX: &str = "FOB_SERVE_";

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_mode: Option<NotifyMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

impl ServeConfig {
    /// Load and validate the configuration for a project rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `config_path` does not exist, a
    /// [`ConfigError::Load`] if a layer cannot be parsed, and any validation error.
    pub fn load(root: &Path, config_path: Option<&Path>, overrides: &ServeOverrides) -> Result<Self> {
        let figment = Self::figment(root, config_path)?
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides));

        let config: Self = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults merged with the config file, if any.
    pub(crate) fn figment(root: &Path, config_path: Option<&Path>) -> Result<Figment> {
        let figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let file = match config_path {
            Some(path) => {
                let path = root.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => CONFIG_FILE_NAMES
                .iter()
                .map(|name| root.join(name))
                .find(|path| path.is_file()),
        };

        Ok(match file {
            Some(path) if path.extension().is_some_and(|ext| ext == "json") => {
                tracing::debug!(path = %path.display(), "loading JSON config");
                figment.merge(Json::file(path))
            }
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading TOML config");
                figment.merge(Toml::file(path))
            }
            None => figment,
        })
    }
}
