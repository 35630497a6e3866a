//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! Slippy map tile indices and spherical Mercator ground coordinates.
//! Everything here is pure arithmetic with no I/O and no error conditions;
//! range checking belongs to tileset construction.

mod types;

pub use types::{
    GeoPoint, GroundPoint, EARTH_RADIUS, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, TILE_SIZE,
};

use std::f64::consts::PI;

/// Number of tiles along one axis at the given zoom level.
#[inline]
pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Clamps a latitude into the range representable by spherical Mercator.
#[inline]
pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Converts geographic coordinates to tile indices.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees
/// * `lon` - Longitude in degrees
/// * `zoom` - Zoom level
///
/// # Returns
///
/// The `(x, y)` tile indices. Both are clamped into `[0, 2^zoom)` so the
/// eastern edge (`lon = 180`) and the Mercator latitude limit stay on the grid.
#[inline]
pub fn deg_to_tile(lat: f64, lon: f64, zoom: u8) -> (u32, u32) {
    let n = 2.0_f64.powi(zoom as i32);
    let max_index = n - 1.0;

    let x = ((lon + 180.0) / 360.0 * n).floor();

    let lat_rad = lat.to_radians();
    let sec = 1.0 / lat_rad.cos();
    let y = ((1.0 - (lat_rad.tan() + sec).ln() / PI) / 2.0 * n).floor();

    (
        x.clamp(0.0, max_index) as u32,
        y.clamp(0.0, max_index) as u32,
    )
}

/// Converts tile indices back to geographic coordinates.
///
/// Returns the position of the tile's top-left (north-west) corner.
#[inline]
pub fn tile_to_point(x: u32, y: u32, zoom: u8) -> GeoPoint {
    let n = 2.0_f64.powi(zoom as i32);

    let lon = x as f64 / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let lat_rad = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan();

    GeoPoint::new(lon, lat_rad.to_degrees())
}

/// Projects WGS84 longitude/latitude to spherical Mercator meters (EPSG:3857).
#[inline]
pub fn lon_lat_to_meters(lon: f64, lat: f64) -> GroundPoint {
    let origin_shift = PI * EARTH_RADIUS;

    let mx = lon * origin_shift / 180.0;
    let my = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    let my = my * origin_shift / 180.0;

    GroundPoint::new(mx, my)
}

/// Mirrors a Slippy row index into the TMS convention.
#[inline]
pub fn tms_y(y: u32, zoom: u8) -> u32 {
    tiles_per_axis(zoom) - y - 1
}

/// Encodes a tile position as a quadtree key.
///
/// One base-4 digit per zoom level, most significant first. The key for
/// zoom 0 is the empty string.
pub fn quadkey(x: u32, y: u32, zoom: u8) -> String {
    let mut key = String::with_capacity(zoom as usize);

    for level in (1..=zoom).rev() {
        let mask = 1u32 << (level - 1);
        let mut digit = b'0';
        if x & mask != 0 {
            digit += 1;
        }
        if y & mask != 0 {
            digit += 2;
        }
        key.push(digit as char);
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let (x, y) = deg_to_tile(40.7128, -74.0060, 16);
        assert_eq!(x, 19295);
        assert_eq!(y, 24640);
    }

    #[test]
    fn test_zoom_zero_is_single_tile() {
        assert_eq!(deg_to_tile(51.5, -0.12, 0), (0, 0));
        assert_eq!(deg_to_tile(-33.9, 151.2, 0), (0, 0));
    }

    #[test]
    fn test_eastern_edge_stays_on_grid() {
        let (x, _) = deg_to_tile(0.0, 180.0, 3);
        assert_eq!(x, 7);
    }

    #[test]
    fn test_latitude_limits_stay_on_grid() {
        for zoom in [0u8, 1, 5, 12, 20] {
            let max = tiles_per_axis(zoom);
            let (_, top) = deg_to_tile(MAX_LAT, 0.0, zoom);
            let (_, bottom) = deg_to_tile(MIN_LAT, 0.0, zoom);
            assert_eq!(top, 0, "zoom {}", zoom);
            assert_eq!(bottom, max - 1, "zoom {}", zoom);
        }
    }

    #[test]
    fn test_clamp_latitude() {
        assert_eq!(clamp_latitude(89.0), MAX_LAT);
        assert_eq!(clamp_latitude(-89.0), MIN_LAT);
        assert_eq!(clamp_latitude(45.0), 45.0);
    }

    #[test]
    fn test_tile_to_point_origin() {
        let point = tile_to_point(0, 0, 0);
        assert!((point.lon - (-180.0)).abs() < 1e-9);
        assert!((point.lat - MAX_LAT).abs() < 1e-9);
    }

    #[test]
    fn test_tile_to_point_at_equator() {
        // At zoom 10, tile 512,512 is the corner at 0,0
        let point = tile_to_point(512, 512, 10);
        assert!(point.lat.abs() < 1e-9, "Should be on the equator");
        assert!(point.lon.abs() < 1e-9, "Should be on the prime meridian");
    }

    #[test]
    fn test_lon_lat_to_meters_origin() {
        let ground = lon_lat_to_meters(0.0, 0.0);
        assert!(ground.x.abs() < 1e-6);
        assert!(ground.y.abs() < 1e-6);
    }

    #[test]
    fn test_lon_lat_to_meters_world_extent() {
        let half_world = PI * EARTH_RADIUS;
        let corner = lon_lat_to_meters(-180.0, MAX_LAT);
        assert!((corner.x + half_world).abs() < 1e-6);
        assert!((corner.y - half_world).abs() < 1e-3);
    }

    #[test]
    fn test_tms_y() {
        assert_eq!(tms_y(1, 2), 2);
        assert_eq!(tms_y(0, 0), 0);
        assert_eq!(tms_y(0, 3), 7);
    }

    #[test]
    fn test_quadkey_known_value() {
        assert_eq!(quadkey(3, 5, 3), "213");
    }

    #[test]
    fn test_quadkey_zoom_zero_is_empty() {
        assert_eq!(quadkey(0, 0, 0), "");
    }

    #[test]
    fn test_quadkey_first_level() {
        assert_eq!(quadkey(0, 0, 1), "0");
        assert_eq!(quadkey(1, 0, 1), "1");
        assert_eq!(quadkey(0, 1, 1), "2");
        assert_eq!(quadkey(1, 1, 1), "3");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_roundtrip_within_one_tile(
                lat in -85.0..85.0_f64,
                lon in -180.0..179.999_f64,
                zoom in 0u8..=18
            ) {
                let (x, y) = deg_to_tile(lat, lon, zoom);
                let top_left = tile_to_point(x, y, zoom);
                let bottom_right = tile_to_point(x + 1, y + 1, zoom);
                let eps = 1e-9;

                prop_assert!(
                    top_left.lon <= lon + eps && lon <= bottom_right.lon + eps,
                    "lon {} not in [{}, {}] at zoom {}",
                    lon, top_left.lon, bottom_right.lon, zoom
                );
                prop_assert!(
                    bottom_right.lat <= lat + eps && lat <= top_left.lat + eps,
                    "lat {} not in [{}, {}] at zoom {}",
                    lat, bottom_right.lat, top_left.lat, zoom
                );
            }

            #[test]
            fn test_tile_indices_in_bounds(
                lat in -90.0..90.0_f64,
                lon in -180.0..=180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let (x, y) = deg_to_tile(clamp_latitude(lat), lon, zoom);
                let max = tiles_per_axis(zoom);
                prop_assert!(x < max, "x {} >= {} at zoom {}", x, max, zoom);
                prop_assert!(y < max, "y {} >= {} at zoom {}", y, max, zoom);
            }

            #[test]
            fn test_quadkey_length_equals_zoom(
                x_raw in 0u32..1_000_000,
                y_raw in 0u32..1_000_000,
                zoom in 0u8..=20
            ) {
                let max = tiles_per_axis(zoom);
                let key = quadkey(x_raw % max, y_raw % max, zoom);
                prop_assert_eq!(key.len(), zoom as usize);
                prop_assert!(key.chars().all(|c| ('0'..='3').contains(&c)));
            }

            #[test]
            fn test_tms_y_is_an_involution(
                y_raw in 0u32..1_000_000,
                zoom in 0u8..=20
            ) {
                let y = y_raw % tiles_per_axis(zoom);
                prop_assert_eq!(tms_y(tms_y(y, zoom), zoom), y);
            }

            #[test]
            fn test_longitude_monotonic(
                lat in 0.0..1.0_f64,
                lon1 in -180.0..-90.0_f64,
                lon2 in -90.0..0.0_f64,
                zoom in 10u8..=15
            ) {
                let (x1, _) = deg_to_tile(lat, lon1, zoom);
                let (x2, _) = deg_to_tile(lat, lon2, zoom);
                prop_assert!(x1 < x2);
            }
        }
    }
}
