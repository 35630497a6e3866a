//! Coordinate type definitions

/// Maximum latitude representable under spherical Mercator.
pub const MAX_LAT: f64 = 85.051_128_779_806_6;
pub const MIN_LAT: f64 = -MAX_LAT;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Highest zoom level accepted by tileset construction.
///
/// Keeps `2^zoom` and mosaic pixel arithmetic comfortably inside `u32`/`u64`.
pub const MAX_ZOOM: u8 = 24;

/// Earth radius used by the spherical Mercator projection (meters).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Edge length of a tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// A position in projected (spherical Mercator) meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPoint {
    pub x: f64,
    pub y: f64,
}

impl GroundPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
