//! Tile sets: a bounding box and zoom range resolved into concrete tiles.
//!
//! A [`TileSet`] is built once from a [`TileSetSpec`] and a [`Provider`] and
//! is immutable afterwards. For every zoom in range it holds the inclusive
//! rectangle of tiles between the tile containing the north-west corner and
//! the tile containing the south-east corner, enumerated column by column
//! (x outer, y inner).
//!
//! Input validation happens in [`BoundingBox::new`] and [`ZoomRange::new`];
//! once those succeed, building the tile set cannot fail.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::config::ConfigError;
use crate::coord::{self, GeoPoint, GroundPoint, MAX_LON, MAX_ZOOM, MIN_LON};
use crate::provider::Provider;
use crate::tile::Tile;

/// Geographic bounding box in degrees.
///
/// Latitudes are clamped to the Web Mercator limit at construction, so tile
/// math downstream never sees a pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, ConfigError> {
        if ![north, south, east, west].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::InvalidBounds(format!(
                "coordinates must be finite (n={}, s={}, e={}, w={})",
                north, south, east, west
            )));
        }
        if north < south {
            return Err(ConfigError::InvalidBounds(format!(
                "north {} is below south {}",
                north, south
            )));
        }
        for lon in [east, west] {
            if !(MIN_LON..=MAX_LON).contains(&lon) {
                return Err(ConfigError::InvalidBounds(format!(
                    "longitude {} outside [-180, 180]",
                    lon
                )));
            }
        }
        if west > east {
            return Err(ConfigError::InvalidBounds(format!(
                "west {} is east of {}",
                west, east
            )));
        }

        Ok(Self {
            north: coord::clamp_latitude(north),
            south: coord::clamp_latitude(south),
            east,
            west,
        })
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    /// Arithmetic mean of the corners.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.west + self.east) / 2.0,
            (self.north + self.south) / 2.0,
        )
    }
}

/// Inclusive zoom range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomRange {
    min: u8,
    max: u8,
}

impl ZoomRange {
    pub fn new(min: u8, max: u8) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidZoomRange {
                min,
                max,
                reason: "minimum exceeds maximum".to_string(),
            });
        }
        if max > MAX_ZOOM {
            return Err(ConfigError::InvalidZoomRange {
                min,
                max,
                reason: format!("maximum zoom is {}", MAX_ZOOM),
            });
        }
        Ok(Self { min, max })
    }

    /// A range holding a single zoom level.
    pub fn single(zoom: u8) -> Result<Self, ConfigError> {
        Self::new(zoom, zoom)
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, zoom: u8) -> bool {
        (self.min..=self.max).contains(&zoom)
    }

    pub fn iter(&self) -> RangeInclusive<u8> {
        self.min..=self.max
    }
}

/// Everything needed to describe a tile set apart from its provider.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSetSpec {
    pub name: String,
    /// Output folder (job name). Defaults to `name`.
    pub folder: String,
    pub version: String,
    pub description: String,
    pub bounds: BoundingBox,
    pub zooms: ZoomRange,
}

impl TileSetSpec {
    pub fn new(name: impl Into<String>, bounds: BoundingBox, zooms: ZoomRange) -> Self {
        let name = name.into();
        Self {
            folder: name.clone(),
            name,
            version: "1.0.0".to_string(),
            description: String::new(),
            bounds,
            zooms,
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A resolved set of tiles for one provider.
#[derive(Debug, Clone)]
pub struct TileSet {
    spec: TileSetSpec,
    provider: Provider,
    tiles: BTreeMap<u8, Vec<Tile>>,
}

impl TileSet {
    pub fn new(spec: TileSetSpec, provider: Provider) -> Self {
        let tiles = spec
            .zooms
            .iter()
            .map(|zoom| (zoom, enumerate(&spec.bounds, zoom)))
            .collect();

        Self {
            spec,
            provider,
            tiles,
        }
    }

    pub fn spec(&self) -> &TileSetSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Output folder, which doubles as the job name.
    pub fn folder(&self) -> &str {
        &self.spec.folder
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.spec.bounds
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.spec.zooms
    }

    /// Zoom levels in ascending order.
    pub fn zooms(&self) -> impl Iterator<Item = u8> + '_ {
        self.tiles.keys().copied()
    }

    /// Tiles for one zoom, in enumeration order. Empty if out of range.
    pub fn tiles(&self, zoom: u8) -> &[Tile] {
        self.tiles.get(&zoom).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every tile, zoom by zoom.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values().flatten()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.values().map(Vec::len).sum()
    }

    /// Tile containing the north-west corner.
    pub fn top_left(&self, zoom: u8) -> Tile {
        let b = &self.spec.bounds;
        let (x, y) = coord::deg_to_tile(b.north, b.west, zoom);
        Tile::new(x, y, zoom)
    }

    /// Tile containing the south-east corner.
    pub fn bottom_right(&self, zoom: u8) -> Tile {
        let b = &self.spec.bounds;
        let (x, y) = coord::deg_to_tile(b.south, b.east, zoom);
        Tile::new(x, y, zoom)
    }

    pub fn cols(&self, zoom: u8) -> u32 {
        self.bottom_right(zoom).x - self.top_left(zoom).x + 1
    }

    pub fn rows(&self, zoom: u8) -> u32 {
        self.bottom_right(zoom).y - self.top_left(zoom).y + 1
    }

    /// Ground extents of the covering tiles at `zoom`, as
    /// (north-west, south-east) corners in meters.
    pub fn extents_meters(&self, zoom: u8) -> (GroundPoint, GroundPoint) {
        (
            self.top_left(zoom).top_left_meters(),
            self.bottom_right(zoom).bottom_right_meters(),
        )
    }

    pub fn center(&self) -> GeoPoint {
        self.spec.bounds.center()
    }

    /// Integer mean of the minimum and maximum zoom.
    pub fn avg_zoom(&self) -> u8 {
        let z = self.spec.zooms;
        ((z.min as u16 + z.max as u16) / 2) as u8
    }
}

fn enumerate(bounds: &BoundingBox, zoom: u8) -> Vec<Tile> {
    let (left, top) = coord::deg_to_tile(bounds.north, bounds.west, zoom);
    let (right, bottom) = coord::deg_to_tile(bounds.south, bounds.east, zoom);

    let mut tiles = Vec::with_capacity(rect_len(left, top, right, bottom));
    for x in left..=right {
        for y in top..=bottom {
            tiles.push(Tile::new(x, y, zoom));
        }
    }
    tiles
}

/// Number of tiles in an inclusive rectangle, or 0 if it does not fit in `usize`.
fn rect_len(left: u32, top: u32, right: u32, bottom: u32) -> usize {
    let cols = (right - left) as usize + 1;
    let rows = (bottom - top) as usize + 1;
    cols.checked_mul(rows).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn provider() -> Provider {
        Provider::new("test", "http://tiles.test/{zoom}/{x}/{y}.png")
    }

    fn tileset(n: f64, s: f64, e: f64, w: f64, zmin: u8, zmax: u8) -> TileSet {
        let spec = TileSetSpec::new(
            "test",
            BoundingBox::new(n, s, e, w).unwrap(),
            ZoomRange::new(zmin, zmax).unwrap(),
        );
        TileSet::new(spec, provider())
    }

    #[test]
    fn test_whole_world_zoom_one() {
        let ts = tileset(90.0, -90.0, 180.0, -180.0, 1, 1);
        assert_eq!(ts.tiles(1).len(), 4);
        assert_eq!(ts.cols(1), 2);
        assert_eq!(ts.rows(1), 2);
    }

    #[test]
    fn test_enumeration_is_column_major() {
        let ts = tileset(90.0, -90.0, 180.0, -180.0, 1, 1);
        assert_eq!(
            ts.tiles(1),
            &[
                Tile::new(0, 0, 1),
                Tile::new(0, 1, 1),
                Tile::new(1, 0, 1),
                Tile::new(1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_count_is_cols_times_rows() {
        let ts = tileset(41.0, 40.5, -73.5, -74.3, 8, 12);
        for z in ts.zooms() {
            assert_eq!(
                ts.tiles(z).len(),
                (ts.cols(z) * ts.rows(z)) as usize,
                "zoom {}",
                z
            );
        }
        let sum: usize = ts.zooms().map(|z| ts.tiles(z).len()).sum();
        assert_eq!(ts.tile_count(), sum);
        assert_eq!(ts.iter().count(), sum);
    }

    #[test]
    fn test_no_duplicates() {
        let ts = tileset(60.0, 30.0, 40.0, -10.0, 0, 6);
        let unique: HashSet<_> = ts.iter().collect();
        assert_eq!(unique.len(), ts.tile_count());
    }

    #[test]
    fn test_tiles_within_corner_tiles() {
        let ts = tileset(47.8, 45.8, 10.5, 5.9, 5, 9);
        for z in ts.zooms() {
            let tl = ts.top_left(z);
            let br = ts.bottom_right(z);
            for t in ts.tiles(z) {
                assert!(t.x >= tl.x && t.x <= br.x);
                assert!(t.y >= tl.y && t.y <= br.y);
                assert_eq!(t.zoom, z);
            }
        }
    }

    #[test]
    fn test_out_of_range_zoom_is_empty() {
        let ts = tileset(10.0, 0.0, 10.0, 0.0, 3, 4);
        assert!(ts.tiles(2).is_empty());
        assert!(ts.tiles(5).is_empty());
        assert_eq!(ts.zooms().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_polar_latitudes_are_clamped() {
        let bbox = BoundingBox::new(90.0, -90.0, 10.0, 0.0).unwrap();
        assert_eq!(bbox.north(), coord::MAX_LAT);
        assert_eq!(bbox.south(), coord::MIN_LAT);

        let ts = tileset(90.0, -90.0, 180.0, -180.0, 3, 3);
        assert_eq!(ts.tiles(3).len(), 64);
    }

    #[test]
    fn test_point_box_yields_one_tile() {
        let ts = tileset(40.7128, 40.7128, -74.0060, -74.0060, 16, 16);
        assert_eq!(ts.tiles(16), &[Tile::new(19295, 24640, 16)]);
    }

    #[test]
    fn test_rect_len_does_not_wrap_u32() {
        assert_eq!(rect_len(3, 5, 3, 5), 1);
        assert_eq!(rect_len(0, 0, 1, 3), 8);

        // Whole world at zoom 16 and 24: 2^32 and 2^48 tiles.
        #[cfg(target_pointer_width = "64")]
        {
            assert_eq!(rect_len(0, 0, (1 << 16) - 1, (1 << 16) - 1), 1usize << 32);
            assert_eq!(rect_len(0, 0, (1 << 24) - 1, (1 << 24) - 1), 1usize << 48);
        }
    }

    #[test]
    fn test_center_and_avg_zoom() {
        let ts = tileset(50.0, 40.0, 20.0, 10.0, 3, 8);
        let c = ts.center();
        assert!((c.lon - 15.0).abs() < 1e-12);
        assert!((c.lat - 45.0).abs() < 1e-12);
        assert_eq!(ts.avg_zoom(), 5);
    }

    #[test]
    fn test_extents_meters_span_the_corner_tiles() {
        let ts = tileset(85.0, -85.0, 179.9, -180.0, 1, 1);
        let (nw, se) = ts.extents_meters(1);
        let expected_nw = Tile::new(0, 0, 1).top_left_meters();
        assert_eq!(nw, expected_nw);
        assert!(se.x > 0.0 && se.y < 0.0);
    }

    #[test]
    fn test_bounds_validation() {
        assert!(matches!(
            BoundingBox::new(10.0, 20.0, 0.0, 0.0),
            Err(ConfigError::InvalidBounds(_))
        ));
        assert!(matches!(
            BoundingBox::new(f64::NAN, 0.0, 0.0, 0.0),
            Err(ConfigError::InvalidBounds(_))
        ));
        assert!(matches!(
            BoundingBox::new(10.0, 0.0, 190.0, 0.0),
            Err(ConfigError::InvalidBounds(_))
        ));
        assert!(matches!(
            BoundingBox::new(10.0, 0.0, 0.0, 10.0),
            Err(ConfigError::InvalidBounds(_))
        ));
    }

    #[test]
    fn test_zoom_range_validation() {
        assert!(ZoomRange::new(5, 3).is_err());
        assert!(ZoomRange::new(0, 25).is_err());
        let z = ZoomRange::new(2, 4).unwrap();
        assert!(z.contains(3));
        assert!(!z.contains(5));
        assert_eq!(z.iter().count(), 3);
        assert_eq!(ZoomRange::single(7).unwrap().iter().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_spec_defaults() {
        let spec = TileSetSpec::new(
            "alps",
            BoundingBox::new(1.0, 0.0, 1.0, 0.0).unwrap(),
            ZoomRange::single(1).unwrap(),
        );
        assert_eq!(spec.folder, "alps");
        assert_eq!(spec.version, "1.0.0");

        let spec = spec.with_folder("alps_v2").with_description("Alps");
        assert_eq!(spec.folder, "alps_v2");
        assert_eq!(spec.description, "Alps");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn bbox_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
            (-85.0f64..85.0, 0.0f64..20.0, -180.0f64..170.0, 0.0f64..10.0)
                .prop_map(|(south, dlat, west, dlon)| {
                    let north = (south + dlat).min(85.0);
                    let east = (west + dlon).min(180.0);
                    (north, south, east, west)
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn every_tile_intersects_the_box(
                (n, s, e, w) in bbox_strategy(),
                zoom in 0u8..=7,
            ) {
                let ts = tileset(n, s, e, w, zoom, zoom);
                let eps = 1e-9;
                for t in ts.tiles(zoom) {
                    let tl = t.top_left();
                    let br = t.bottom_right();
                    prop_assert!(tl.lon <= e + eps);
                    prop_assert!(br.lon >= w - eps);
                    prop_assert!(tl.lat >= s - eps);
                    prop_assert!(br.lat <= n + eps);
                }
            }

            #[test]
            fn count_matches_rectangle(
                (n, s, e, w) in bbox_strategy(),
                zoom in 0u8..=7,
            ) {
                let ts = tileset(n, s, e, w, zoom, zoom);
                prop_assert_eq!(ts.tile_count(), (ts.cols(zoom) * ts.rows(zoom)) as usize);
            }
        }
    }
}
