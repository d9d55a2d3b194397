//! User configuration management
//!
//! This module handles reading and writing modtaur configuration files.
//! Configuration is stored in TOML format at `~/.modtaur/config.toml`.
//!
//! # Examples
//!
//! ```no_run
//! use modtaur::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//!
//! println!("Catalog URL: {}", config.catalog.url);
//! println!("Minecraft dir: {}", config.minecraft_dir().display());
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration file (`~/.modtaur/config.toml`)
///
/// Missing sections and fields fall back to their defaults, so an empty or
/// absent file is a fully working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog API settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the Modrinth-compatible API
    #[serde(default = "default_catalog_url")]
    pub url: String,

    /// User-Agent header sent with every request (Modrinth requires an
    /// identifying agent)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_catalog_url() -> String {
    "https://api.modrinth.com/v2".to_string()
}

fn default_user_agent() -> String {
    format!("modtaur/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Minecraft installation directory (mods and resourcepacks live under it)
    #[serde(default = "default_minecraft_dir")]
    pub minecraft_dir: String,

    /// Root of the local artifact store shared between runs
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: String,
}

fn default_minecraft_dir() -> String {
    "~/.minecraft".to_string()
}

fn default_downloads_dir() -> String {
    "~/.modtaur/downloads".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            minecraft_dir: default_minecraft_dir(),
            downloads_dir: default_downloads_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// Uses MODTAUR_CONFIG_DIR if set, otherwise ~/.modtaur/config.toml
    pub fn default_path() -> Result<PathBuf> {
        // Check for custom config directory (useful for testing)
        if let Ok(config_dir) = std::env::var("MODTAUR_CONFIG_DIR") {
            return Ok(PathBuf::from(config_dir).join("config.toml"));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("Could not find home directory".to_string()))?;

        Ok(home.join(".modtaur").join("config.toml"))
    }

    /// Load config from file, or return defaults if it doesn't exist
    ///
    /// Environment variable overrides:
    /// - `MODTAUR_API_URL`: Overrides `catalog.url`
    /// - `MODTAUR_CONFIG_DIR`: Overrides the config directory location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;

        let mut config = if !path.exists() {
            Self::default()
        } else {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        };

        // Override catalog URL from environment if set
        if let Ok(url) = std::env::var("MODTAUR_API_URL") {
            if !url.is_empty() {
                config.catalog.url = url;
            }
        }

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Minecraft installation directory with `~` expanded
    pub fn minecraft_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.paths.minecraft_dir).as_ref())
    }

    /// Artifact store root with `~` expanded
    pub fn downloads_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.paths.downloads_dir).as_ref())
    }
}
