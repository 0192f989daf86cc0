//! Service configuration.
//!
//! Lookup order: the file named by `PILOT_CONFIG`, then `./budgetpilot.yml`,
//! then built-in defaults. `PILOT_ADDR` and `PILOT_INVENTORY_URL` override
//! single fields afterwards.

use pilot_budget::ABSOLUTE_TOLERANCE;
use pilot_inventory::DEFAULT_RECOMMENDATION_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_ENV: &str = "PILOT_CONFIG";
pub const ADDR_ENV: &str = "PILOT_ADDR";
pub const INVENTORY_URL_ENV: &str = "PILOT_INVENTORY_URL";
pub const LOCAL_CONFIG: &str = "budgetpilot.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Listen address
    pub addr: String,

    /// Base URL of the listing service
    pub inventory_url: String,

    /// Serve listings from JSON files in this directory instead of the listing service
    pub inventory_dir: Option<PathBuf>,

    /// Listing request timeout in milliseconds
    pub inventory_timeout_ms: u64,

    /// Candidates kept by recommendation matching
    pub recommendation_limit: usize,

    /// Allowed gap for absolute breakdowns
    pub absolute_tolerance: u64,

    /// Replacement report template set
    pub templates_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8787".to_string(),
            inventory_url: "http://127.0.0.1:8000".to_string(),
            inventory_dir: None,
            inventory_timeout_ms: 10_000,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            absolute_tolerance: ABSOLUTE_TOLERANCE,
            templates_path: None,
        }
    }
}

impl ApiConfig {
    /// Load from the usual places, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if let Ok(path) = std::env::var(CONFIG_ENV) {
            Self::load_from_file(&path)?
        } else if Path::new(LOCAL_CONFIG).exists() {
            match Self::load_from_file(LOCAL_CONFIG) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to load config from {}: {}", LOCAL_CONFIG, e);
                    Self::default()
                }
            }
        } else {
            info!("No config file found, using defaults");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Apply single-field overrides from `lookup` (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ADDR_ENV).filter(|v| !v.trim().is_empty()) {
            self.addr = addr;
        }
        if let Some(url) = lookup(INVENTORY_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.inventory_url = url;
        }
    }

    pub fn inventory_timeout(&self) -> Duration {
        Duration::from_millis(self.inventory_timeout_ms)
    }
}
