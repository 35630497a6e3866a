//! Configuration for TileKit.
//!
//! Settings are read from an INI file (default `~/.tilekit/config.ini`):
//! download tuning, the output root, custom providers and named tile sets.
//!
//! ```
//! use tilekit::config::ConfigFile;
//!
//! let config = ConfigFile::from_ini_str(
//!     "[tileset.world]\nprovider = osm\nnorth = 85\nsouth = -85\neast = 180\nwest = -180\nzoom_max = 2\n",
//! )
//! .unwrap();
//! let tileset = config.tileset("world").unwrap();
//! assert_eq!(tileset.tile_count(), 1 + 4 + 16);
//! ```

mod download;
mod error;
mod file;
mod parser;

pub use download::{DownloadConfig, DEFAULT_CONCURRENCY};
pub use error::ConfigError;
pub use file::{
    config_directory, config_file_path, default_output_dir, ConfigFile, TileSetEntry,
};

pub use parser::expand_tilde;
