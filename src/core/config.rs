use crate::core::model::{Stock, Trade};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Configuration shipped with the binary and written by `gbce setup`.
pub const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

fn default_precision() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Stocks created when the market starts.
    #[serde(default)]
    pub stocks: Vec<Stock>,
    /// Trades recorded, in order, once the stocks exist.
    #[serde(default)]
    pub trades: Vec<Trade>,
    /// Decimals shown for computed values.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in example",
                config_path.display()
            );
            return Self::example();
        }
        Self::load_from_path(&config_path)
    }

    pub fn example() -> Result<Self> {
        serde_yaml::from_str(EXAMPLE_CONFIG).context("Failed to parse built-in example config")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("uk", "gbce", "gbce")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
