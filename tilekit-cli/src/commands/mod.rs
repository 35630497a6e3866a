//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`list`] - Configured tile sets and available providers
//! - [`count`] - Tile totals for a tile set
//! - [`download`] - Fetch missing tiles
//! - [`stitch`] - Compose one zoom level into a mosaic
//! - [`export`] - Viewer, MBTiles and GeoTIFF outputs

pub mod common;
pub mod count;
pub mod download;
pub mod export;
pub mod list;
pub mod stitch;
