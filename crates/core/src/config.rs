use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::layout::DEFAULT_SOURCE_URL;
use crate::logging::sanitize_path;

/// Persisted document at `~/.modern-python-skill/config.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Remote repository the bundle comes from
    pub source_url: String,

    /// Registered projects: name -> absolute root path
    pub projects: BTreeMap<String, PathBuf>,
}

/// On-disk shape; either key may be absent or null
#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    projects: Option<BTreeMap<String, PathBuf>>,
}

impl From<ConfigDocument> for Config {
    fn from(doc: ConfigDocument) -> Self {
        Self {
            source_url: doc.source_url.unwrap_or_else(default_source_url),
            projects: doc.projects.unwrap_or_default(),
        }
    }
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config { source_url: default_source_url(), projects: BTreeMap::new() }
    }
}

impl Config {
    /// Parse a YAML document. An empty document yields the default config.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let doc: Option<ConfigDocument> =
            serde_yml::from_str(yaml).map_err(|e| Error::Config(ConfigError::from(e).to_string()))?;
        Ok(doc.map(Config::from).unwrap_or_default())
    }

    /// Serialize the full document
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yml::to_string(self).map_err(|e| Error::Config(ConfigError::from(e).to_string()))
    }

    /// Registered root of a project
    pub fn project(&self, name: &str) -> Option<&Path> {
        self.projects.get(name).map(PathBuf::as_path)
    }

    /// Register (or re-point) a project, returning its previous root
    pub fn register_project(&mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Option<PathBuf> {
        self.projects.insert(name.into(), root.into())
    }

    /// Drop a registration, returning the root it pointed at
    pub fn unregister_project(&mut self, name: &str) -> Option<PathBuf> {
        self.projects.remove(name)
    }
}

/// Reads and writes the config document at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the document, substituting the default when the file is missing or unreadable.
    ///
    /// A corrupt file never blocks a command; the cause is logged and the default returned.
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            debug!(path = %sanitize_path(&self.path), "config file missing, using defaults");
            return Config::default();
        }

        match fs::read_to_string(&self.path)
            .map_err(Error::from)
            .and_then(|content| Config::from_yaml_str(&content))
        {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %sanitize_path(&self.path), error = %e, "Error loading config, using defaults");
                Config::default()
            }
        }
    }

    /// Write the whole document, creating the parent directory if needed
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = config.to_yaml_string()?;
        fs::write(&self.path, yaml)?;
        debug!(path = %sanitize_path(&self.path), projects = config.projects.len(), "config saved");
        Ok(())
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// YAML parse or serialization error
    #[error("YAML error: {0}")]
    Yaml(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(err: serde_yml::Error) -> Self {
        ConfigError::Yaml(err.to_string())
    }
}
