//! Configuration file support for Corx.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/corx/config.toml`.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Source data locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,

    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            rules_path: default_rules_path(),
            records_path: default_records_path(),
        }
    }
}

/// Export artifact configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub out_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: default_export_dir(),
        }
    }
}

// Default value functions
fn data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("corx")
}

fn default_rules_path() -> PathBuf {
    data_dir().join("association_rules.json")
}

fn default_records_path() -> PathBuf {
    data_dir().join("medicine_prescription_records.csv")
}

fn default_export_dir() -> PathBuf {
    data_dir().join("exports")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("corx").join("config.toml")
    }
}
