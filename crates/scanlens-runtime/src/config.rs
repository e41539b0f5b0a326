use crate::{Error, Result};
use scanlens_types::PathFilters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolve the config file path based on priority:
/// 1. SCANLENS_CONFIG environment variable
/// 2. <config dir>/scanlens/config.toml
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(env_path) = std::env::var("SCANLENS_CONFIG") {
        return Ok(PathBuf::from(env_path));
    }

    dirs::config_dir()
        .map(|dir| dir.join("scanlens").join("config.toml"))
        .ok_or_else(|| {
            Error::Config("Could not determine config path: no config directory found".to_string())
        })
}

fn default_throttle_ms() -> u64 {
    16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectConfig {
    /// Window in which state signals collapse into one transition
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    /// Minimum spacing between handled pointer moves while picking
    #[serde(default = "default_throttle_ms")]
    pub pointer_throttle_ms: u64,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            pointer_throttle_ms: default_throttle_ms(),
        }
    }
}

impl InspectConfig {
    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn pointer_window(&self) -> Duration {
        Duration::from_millis(self.pointer_throttle_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub filters: PathFilters,
    #[serde(default)]
    pub inspect: InspectConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.filters, PathFilters::default());
        assert_eq!(config.inspect.throttle_window(), Duration::from_millis(16));
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.filters.skip_providers = false;
        config.inspect.pointer_throttle_ms = 32;

        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[filters]\nskip_hocs = false\n")?;

        let config = Config::load_from(&config_path)?;
        assert!(!config.filters.skip_hocs);
        assert!(config.filters.skip_boundaries);
        assert_eq!(config.inspect, InspectConfig::default());

        Ok(())
    }

    #[test]
    fn test_invalid_file_is_config_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[inspect]\nthrottle_ms = \"fast\"\n")?;

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("missing.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }
}
