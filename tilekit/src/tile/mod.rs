//! The tile value type.
//!
//! A [`Tile`] is addressed by `(x, y, zoom)` in the Slippy convention (row 0 at
//! the north edge). Everything else about it (TMS row, quadkey, corners,
//! on-disk path) is derived on demand from those three numbers.

use std::fmt;
use std::path::PathBuf;

use crate::coord::{self, GeoPoint, GroundPoint};

/// A single 256×256 map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile {
    /// Column, 0 at the antimeridian, increasing eastward.
    pub x: u32,
    /// Row, 0 at the north edge, increasing southward.
    pub y: u32,
    /// Zoom level.
    pub zoom: u8,
}

impl Tile {
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Returns `true` if the indices lie inside the grid for this zoom.
    pub fn is_valid(&self) -> bool {
        let max = coord::tiles_per_axis(self.zoom);
        self.x < max && self.y < max
    }

    /// Row index in the TMS convention (row 0 at the south edge).
    pub fn tms_y(&self) -> u32 {
        coord::tms_y(self.y, self.zoom)
    }

    /// Quadtree key, as used by Bing-style providers.
    pub fn quadkey(&self) -> String {
        coord::quadkey(self.x, self.y, self.zoom)
    }

    /// Geographic position of the north-west corner.
    pub fn top_left(&self) -> GeoPoint {
        coord::tile_to_point(self.x, self.y, self.zoom)
    }

    /// Geographic position of the south-east corner.
    pub fn bottom_right(&self) -> GeoPoint {
        coord::tile_to_point(self.x + 1, self.y + 1, self.zoom)
    }

    /// North-west corner in spherical Mercator meters.
    pub fn top_left_meters(&self) -> GroundPoint {
        let p = self.top_left();
        coord::lon_lat_to_meters(p.lon, p.lat)
    }

    /// South-east corner in spherical Mercator meters.
    pub fn bottom_right_meters(&self) -> GroundPoint {
        let p = self.bottom_right();
        coord::lon_lat_to_meters(p.lon, p.lat)
    }

    /// Path relative to a job's tile directory: `{zoom}/{x}/{y}.png`.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(self.zoom.to_string())
            .join(self.x.to_string())
            .join(format!("{}.png", self.y))
    }

    /// Provider-qualified identifier, e.g. `osm_12_2047_1362`.
    pub fn identifier(&self, provider_name: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            provider_name.to_lowercase(),
            self.zoom,
            self.x,
            self.y
        )
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
