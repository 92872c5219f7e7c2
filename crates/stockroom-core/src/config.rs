use crate::status::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Loaded from `config.toml`, then overridden by CLI flags.
/// Priority: CLI > File > Defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Write config to disk, creating parent directories
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config dir>/stockroom/config.toml`
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::Config("Could not find config directory".into()))?
            .join("stockroom");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// The inventory JSON array
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Where `inventory_export.xlsx` / `.csv` are written
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Open the data file read-only
    #[serde(default)]
    pub preview: bool,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("inventory.json")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            export_dir: default_export_dir(),
            preview: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// How long a warning toast stays on screen
    #[serde(default = "default_toast_seconds")]
    pub toast_seconds: u64,
}

fn default_currency() -> String {
    "₱".to_string()
}

fn default_toast_seconds() -> u64 {
    5
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency(),
            toast_seconds: default_toast_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.data_file, PathBuf::from("inventory.json"));
        assert_eq!(config.thresholds.near_expiry_days, 7);
        assert_eq!(config.thresholds.low_stock_below, 5);
        assert_eq!(config.ui.toast_seconds, 5);
        assert!(!config.storage.preview);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("data_file"));
        assert!(toml.contains("near_expiry_days"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [thresholds]
            low_stock_below = 10

            [ui]
            currency_symbol = "$"
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.low_stock_below, 10);
        assert_eq!(config.thresholds.near_expiry_days, 7);
        assert_eq!(config.ui.currency_symbol, "$");
        assert_eq!(config.storage.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ui.toast_seconds = 9;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.toast_seconds, 9);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.thresholds, Thresholds::default());
    }
}
