//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use tilekit::config::{config_file_path, expand_tilde, ConfigFile};
use tilekit::fetch::{CompletedFetch, FetchJob};
use tilekit::tileset::TileSet;
use tracing::debug;

use crate::error::CliError;

/// Global options every command receives.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub output: Option<String>,
}

/// Loaded configuration plus the resolved output root.
#[derive(Debug)]
pub struct Context {
    pub config: ConfigFile,
    pub output_dir: PathBuf,
}

impl Context {
    /// Load the config file and apply command-line overrides.
    pub fn load(args: &GlobalArgs) -> Result<Self, CliError> {
        let path = args.config.clone().unwrap_or_else(config_file_path);
        debug!(path = %path.display(), "Loading configuration");
        let config = ConfigFile::load_from(&path)?;
        Ok(Self::from_config(config, args.output.as_deref()))
    }

    pub fn from_config(config: ConfigFile, output: Option<&str>) -> Self {
        let output_dir = output
            .map(expand_tilde)
            .unwrap_or_else(|| config.output_dir.clone());
        Self { config, output_dir }
    }

    pub fn tileset(&self, name: &str) -> Result<TileSet, CliError> {
        Ok(self.config.tileset(name)?)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Partition the named tile set against disk without fetching.
    pub fn fetch_job(&self, name: &str) -> Result<FetchJob, CliError> {
        Ok(FetchJob::new(&self.output_dir, self.tileset(name)?))
    }

    /// The on-disk state of a tile set, for commands that read tiles.
    pub fn completed(&self, name: &str) -> Result<CompletedFetch, CliError> {
        Ok(self.fetch_job(name)?.into_completed())
    }
}
