use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::DEFAULT_SERVER_URL;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Query server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Local storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Query server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the procurement API server
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

/// Local storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the session snapshot; defaults to the
    /// platform data directory
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the storage directory, falling back to the platform
    /// data directory
    pub fn resolve_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        get_data_dir()
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the session sidebar at startup
    pub show_sidebar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { show_sidebar: true }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir()?;
    let config_file = config_dir.join("config.toml");

    // Build figment configuration
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if config_file.exists() {
        figment = figment.merge(Toml::file(&config_file));
    }

    // Add environment variables (PROCURA_ prefix, double underscore
    // for nesting: PROCURA_SERVER__URL)
    figment = figment.merge(Env::prefixed("PROCURA_").split("__"));

    figment.extract().context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "procura") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("procura");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Get the data directory used for session snapshots
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "procura") {
        Ok(proj_dirs.data_dir().to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".local").join("share").join("procura"))
    }
}
