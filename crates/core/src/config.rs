//! Application settings: built-in defaults, then the user config file, then
//! `GAMEHUB_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::CatalogResult;

/// Directory under `~/.config` holding `config.toml`.
pub const CONFIG_DIR: &str = "gamehub";
/// Prefix of the environment overrides, e.g. `GAMEHUB_DATA_URL`.
pub const ENV_PREFIX: &str = "GAMEHUB";

const DEFAULT_CONFIG: &str = r#"# GameHub settings. Environment variables (GAMEHUB_DATA_URL, ...) win over this file.

# Base URL serving data/*.json. Leave unset to read from data_dir instead.
# data_url = "https://gamehub.example.com/"

data_dir = "public"
cache_ttl_secs = 300
search_debounce_ms = 300
"#;

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP base serving `data/*.json`. Takes precedence over `data_dir`.
    #[serde(default)]
    pub data_url: Option<String>,
    /// Local directory containing `data/*.json`.
    pub data_dir: PathBuf,
    /// Where the file-backed cache keeps its entries.
    pub cache_root: PathBuf,
    /// Game list cache lifetime.
    pub cache_ttl_secs: u64,
    /// Quiet period before a search term is applied.
    pub search_debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: None,
            data_dir: PathBuf::from("public"),
            cache_root: default_cache_root(),
            cache_ttl_secs: 300,
            search_debounce_ms: 300,
        }
    }
}

impl AppConfig {
    /// Load from the default config file and the process environment.
    pub fn load() -> CatalogResult<Self> {
        Self::load_from(&config_path(), ENV_PREFIX)
    }

    /// Load from `path` (optional on disk) and variables starting with `env_prefix`.
    pub fn load_from(path: &Path, env_prefix: &str) -> CatalogResult<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().into_owned())?
            .set_default("cache_root", defaults.cache_root.to_string_lossy().into_owned())?
            .set_default("cache_ttl_secs", defaults.cache_ttl_secs)?
            .set_default("search_debounce_ms", defaults.search_debounce_ms)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?;
        let mut config: AppConfig = settings.try_deserialize()?;
        config.data_url = config
            .data_url
            .take()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        Ok(config)
    }

    /// Cache lifetime as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Search debounce as a duration.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// `~/.config/gamehub/config.toml`, or a relative path when the platform has
/// no config directory.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(CONFIG_DIR)
}

/// Write the commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(&dir.path().join("config.toml"), "GAMEHUB_TEST_MISSING")?;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        Ok(())
    }

    #[test]
    fn default_file_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        write_default_config(&path)?;
        let config = AppConfig::load_from(&path, "GAMEHUB_TEST_DEFAULT")?;
        assert_eq!(config.data_url, None);
        assert_eq!(config.data_dir, PathBuf::from("public"));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "data_url = \"https://games.example.com/\"\ncache_ttl_secs = 60\n",
        )?;
        let config = AppConfig::load_from(&path, "GAMEHUB_TEST_FILE")?;
        assert_eq!(config.data_url.as_deref(), Some("https://games.example.com/"));
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.search_debounce_ms, 300);
        Ok(())
    }

    #[test]
    fn existing_file_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "cache_ttl_secs = 5\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "cache_ttl_secs = 5\n");
        Ok(())
    }

    #[test]
    fn blank_url_counts_as_unset() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_url = \"  \"\n")?;
        assert_eq!(AppConfig::load_from(&path, "GAMEHUB_TEST_BLANK")?.data_url, None);
        Ok(())
    }
}
