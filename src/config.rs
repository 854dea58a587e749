//! DataDrill configuration
//!
//! Read once at startup from TOML and passed down by reference.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DrillError, DrillResult};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "datadrill.toml";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub annotator: AnnotatorConfig,
}

/// `[database]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5433/datadrill_db".to_string(),
            max_connections: 5,
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

/// `[annotator]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// First names recognized as people on top of the built-in list.
    pub person_names: Vec<String>,
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> DrillResult<Self> {
        toml::from_str(content).map_err(|e| DrillError::Config(e.to_string()))
    }

    /// Read a TOML file.
    pub fn from_file(path: &Path) -> DrillResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DrillError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
            .map_err(|e| DrillError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from `explicit` if given, else the first existing default
    /// location, else built-in defaults.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load(explicit: Option<&Path>) -> DrillResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_locations().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// `./datadrill.toml`, then `<config dir>/datadrill/config.toml`.
pub fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("datadrill").join("config.toml"));
    }
    paths
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from an already loaded configuration.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the database URL
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config.database.url = url.into();
        self
    }

    /// Set the bind address
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.config.server.bind = addr.into();
        self
    }

    pub fn person_name(mut self, name: impl Into<String>) -> Self {
        self.config.annotator.person_names.push(name.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}
