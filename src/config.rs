use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::query::ExecutorConfig;
use crate::store::StoreOptions;

const APP_DIR: &str = "angel-tracker";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub query: QuerySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// JSON document file. Defaults to `angels.json` in the data directory.
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    pub timeout_ms: Option<u64>,
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_max_workers() -> usize {
    4
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            max_workers: default_max_workers(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file. Defaults to `angel-tracker.log` in the working directory.
    pub file: Option<PathBuf>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR);
        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            info!("Config file {:?} doesn't exist, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.exists()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        info!("Config saved to {:?}", path);
        Ok(())
    }

    pub fn data_file(&self) -> Result<PathBuf> {
        match &self.store.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(dirs::data_dir()
                .context("Failed to get data directory")?
                .join(APP_DIR)
                .join("angels.json")),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(|| PathBuf::from("angel-tracker.log"))
    }

    pub fn store_options(&self) -> Result<StoreOptions> {
        Ok(StoreOptions::default()
            .with_data_file(self.data_file()?)
            .with_latency(Duration::from_millis(self.store.latency_ms)))
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            max_workers: self.query.max_workers.max(1),
            default_timeout: self.query.timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.query.search_debounce_ms)
    }
}
