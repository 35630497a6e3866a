//! TileKit - map tile downloading and mosaic stitching
//!
//! This library computes the tiles covering a geographic bounding box over
//! a range of zoom levels, fetches the missing ones from a tile provider
//! with bounded concurrency, and stitches a complete zoom level into a
//! single georeferenced PNG.
//!
//! # Example
//!
//! ```ignore
//! use tilekit::fetch::{FetchJob, FetchOptions};
//! use tilekit::provider::{ProviderCatalog, ReqwestClient};
//! use tilekit::stitch::StitchJob;
//! use tilekit::tileset::{BoundingBox, TileSet, TileSetSpec, ZoomRange};
//!
//! let provider = ProviderCatalog::builtin().get("osm").cloned().unwrap();
//! let spec = TileSetSpec::new(
//!     "manhattan",
//!     BoundingBox::new(40.88, 40.70, -73.90, -74.02)?,
//!     ZoomRange::new(12, 14)?,
//! );
//! let tileset = TileSet::new(spec, provider);
//!
//! let client = ReqwestClient::new()?;
//! let done = FetchJob::new("tiles", tileset)
//!     .run(&client, FetchOptions::default(), |p| println!("{}", p))
//!     .await;
//!
//! StitchJob::new(&done, 14)?.stitch()?;
//! ```

pub mod config;
pub mod coord;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod provider;
pub mod stitch;
pub mod tile;
pub mod tileset;
