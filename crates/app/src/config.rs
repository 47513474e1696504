use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,
    #[error("config file not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the hosting app's API, e.g. https://hearth.example
    pub api_url: String,
    /// Bearer token issued by the hosting app.
    pub api_token: String,
    /// Optional free-text filter applied to the suggestion table.
    #[serde(default)]
    pub search: Option<String>,
    /// Optional display cutoff on top of the engine's own threshold.
    #[serde(default)]
    pub min_confidence: Option<u8>,
    /// When set, suggestions at or above this confidence are confirmed
    /// and submitted without prompting.
    #[serde(default)]
    pub auto_confirm_at: Option<u8>,
}

impl Config {
    /// Loads from the given path, or from the platform config dir
    /// (~/.config/hearth/config.toml on Linux) when none is given.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_path()?,
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }
}

fn default_path() -> Result<PathBuf, ConfigError> {
    let dirs = directories::ProjectDirs::from("com", "hearthfin", "Hearth")
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join("config.toml"))
}
