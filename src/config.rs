//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Warehouse configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    #[serde(default = "default_warehouse_path")]
    pub path: String,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Hours added to event timestamps before truncating to a calendar
    /// date. The warehouse stores UTC; the operating region is UTC-6.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i64,
}

// Default value functions
fn default_warehouse_path() -> String {
    "~/.local/share/gatescan/warehouse.db".to_string()
}

fn default_utc_offset_hours() -> i64 {
    -6
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            path: default_warehouse_path(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warehouse: WarehouseConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./gatescan.yaml (current directory)
    /// 3. ~/.config/gatescan/gatescan.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "gatescan.yaml".to_string(),
            shellexpand::tilde("~/.config/gatescan/gatescan.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the warehouse database path, expanding ~ to home directory
    pub fn warehouse_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.warehouse.path).to_string();
        PathBuf::from(expanded)
    }
}
