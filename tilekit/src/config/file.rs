//! Configuration file handling for ~/.tilekit/config.ini.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ini::Ini;

use super::download::DownloadConfig;
use super::error::ConfigError;
use crate::provider::{Provider, ProviderCatalog};
use crate::tileset::{TileSet, TileSetSpec};

/// A named tile set as written in the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSetEntry {
    /// Provider name, resolved against the catalog when the set is built.
    pub provider: String,
    pub spec: TileSetSpec,
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub download: DownloadConfig,
    /// Root directory for job output.
    pub output_dir: PathBuf,
    /// User-defined providers, in file order.
    pub providers: Vec<Provider>,
    /// Named tile sets, keyed by section suffix.
    pub tilesets: BTreeMap<String, TileSetEntry>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            download: DownloadConfig::default(),
            output_dir: default_output_dir(),
            providers: Vec::new(),
            tilesets: BTreeMap::new(),
        }
    }
}

impl ConfigFile {
    /// Load configuration from the default path (~/.tilekit/config.ini).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read(ini::Error::Parse(e)))?;
        super::parser::parse_ini(&ini)
    }

    /// Built-in providers overlaid with the ones defined in this file.
    pub fn catalog(&self) -> ProviderCatalog {
        let mut catalog = ProviderCatalog::builtin();
        for provider in &self.providers {
            catalog.insert(provider.clone());
        }
        catalog
    }

    /// Build the named tile set, resolving its provider.
    pub fn tileset(&self, name: &str) -> Result<TileSet, ConfigError> {
        let entry = self
            .tilesets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTileSet(name.to_string()))?;

        let provider = self
            .catalog()
            .get(&entry.provider)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownProvider(entry.provider.clone()))?;

        Ok(TileSet::new(entry.spec.clone(), provider))
    }
}

/// Get the path to the config directory (~/.tilekit).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tilekit")
}

/// Get the path to the config file (~/.tilekit/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Default job output root (~/tiles).
pub fn default_output_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tiles")
}
