//! Mosaic stitching.
//!
//! A [`StitchJob`] pastes every tile of one zoom level of a completed fetch
//! into a single RGBA raster and writes a world file next to it, so GIS
//! tools can place the mosaic in spherical Mercator without reprojection.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::{imageops, ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::{debug, info};

use crate::coord::TILE_SIZE;
use crate::fetch::CompletedFetch;
use crate::tile::Tile;
use crate::tileset::TileSet;

/// Errors that can occur while stitching.
#[derive(Debug, Error)]
pub enum StitchError {
    #[error("zoom {zoom} is not part of tile set '{tileset}' (zoom {min}..={max})")]
    ZoomOutOfRange {
        zoom: u8,
        tileset: String,
        min: u8,
        max: u8,
    },

    #[error("mosaic of {cols}x{rows} tiles is too large to allocate")]
    TooLarge { cols: u32, rows: u32 },

    #[error("tile {tile} is missing (expected at {path}); fetch it before stitching")]
    TileMissing { tile: Tile, path: PathBuf },

    #[error("failed to read tile {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to decode tile {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to write mosaic {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Affine transform from pixel to ground coordinates (ESRI world file).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldFile {
    /// Ground width of one pixel.
    pub pixel_x: f64,
    pub rotation_y: f64,
    pub rotation_x: f64,
    /// Ground height of one pixel, negative for north-up images.
    pub pixel_y: f64,
    /// Ground x of the upper-left pixel.
    pub origin_x: f64,
    /// Ground y of the upper-left pixel.
    pub origin_y: f64,
}

impl WorldFile {
    /// Transform for a `width`×`height` mosaic of `tileset` at `zoom`.
    pub fn for_mosaic(tileset: &TileSet, zoom: u8, width: u32, height: u32) -> Self {
        let (top_left, bottom_right) = tileset.extents_meters(zoom);
        Self {
            pixel_x: (top_left.x - bottom_right.x).abs() / width as f64,
            rotation_y: 0.0,
            rotation_x: 0.0,
            pixel_y: -((top_left.y - bottom_right.y) / height as f64).abs(),
            origin_x: top_left.x,
            origin_y: top_left.y,
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), StitchError> {
        fs::write(path, self.to_string()).map_err(|e| StitchError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl fmt::Display for WorldFile {
    /// Six lines, one value each.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in [
            self.pixel_x,
            self.rotation_y,
            self.rotation_x,
            self.pixel_y,
            self.origin_x,
            self.origin_y,
        ] {
            writeln!(f, "{}", v)?;
        }
        Ok(())
    }
}

/// Files produced by a stitch.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchOutput {
    pub mosaic: PathBuf,
    pub world_file: PathBuf,
    pub width: u32,
    pub height: u32,
    pub transform: WorldFile,
}

/// Stitches one zoom level of a completed fetch.
#[derive(Debug)]
pub struct StitchJob<'a> {
    fetch: &'a CompletedFetch,
    zoom: u8,
    width: u32,
    height: u32,
}

impl<'a> StitchJob<'a> {
    pub fn new(fetch: &'a CompletedFetch, zoom: u8) -> Result<Self, StitchError> {
        let tileset = fetch.tileset();
        let range = tileset.zoom_range();
        if !range.contains(zoom) {
            return Err(StitchError::ZoomOutOfRange {
                zoom,
                tileset: tileset.name().to_string(),
                min: range.min(),
                max: range.max(),
            });
        }

        let cols = tileset.cols(zoom);
        let rows = tileset.rows(zoom);
        let too_large = || StitchError::TooLarge { cols, rows };

        let width = cols.checked_mul(TILE_SIZE).ok_or_else(too_large)?;
        let height = rows.checked_mul(TILE_SIZE).ok_or_else(too_large)?;
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(too_large)?;

        Ok(Self {
            fetch,
            zoom,
            width,
            height,
        })
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Mosaic size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn world_file(&self) -> WorldFile {
        WorldFile::for_mosaic(self.fetch.tileset(), self.zoom, self.width, self.height)
    }

    pub fn stitch(&self) -> Result<StitchOutput, StitchError> {
        self.stitch_with_progress(|_, _| {})
    }

    /// Stitch, calling `progress(done, total)` after each tile.
    ///
    /// Every tile file is checked before anything is allocated or written;
    /// a missing tile fails the job with no output.
    pub fn stitch_with_progress<F>(&self, mut progress: F) -> Result<StitchOutput, StitchError>
    where
        F: FnMut(usize, usize),
    {
        let tileset = self.fetch.tileset();
        let paths = self.fetch.paths();
        let tiles = tileset.tiles(self.zoom);

        let located: Vec<(Tile, PathBuf)> = tiles
            .iter()
            .map(|tile| (*tile, paths.tile_path(tile)))
            .collect();
        if let Some((tile, path)) = located.iter().find(|(_, path)| !path.is_file()) {
            return Err(StitchError::TileMissing {
                tile: *tile,
                path: path.clone(),
            });
        }

        info!(
            job = paths.job(),
            zoom = self.zoom,
            width = self.width,
            height = self.height,
            tiles = tiles.len(),
            "Stitching mosaic"
        );

        let origin = tileset.top_left(self.zoom);
        let mut canvas = RgbaImage::new(self.width, self.height);
        let total = located.len();

        for (done, (tile, path)) in located.iter().enumerate() {
            let image = load_tile(path)?;
            let cx = i64::from(TILE_SIZE) * i64::from(tile.x - origin.x);
            let cy = i64::from(TILE_SIZE) * i64::from(tile.y - origin.y);
            imageops::replace(&mut canvas, &image, cx, cy);
            debug!(tile = %tile, "Pasted tile");
            progress(done + 1, total);
        }

        fs::create_dir_all(paths.out_root()).map_err(|e| StitchError::Io {
            path: paths.out_root().to_path_buf(),
            source: e,
        })?;

        let mosaic = paths.mosaic_path();
        canvas
            .save_with_format(&mosaic, ImageFormat::Png)
            .map_err(|e| StitchError::Encode {
                path: mosaic.clone(),
                source: e,
            })?;

        let transform = self.world_file();
        let world_file = paths.world_file_path();
        transform.write(&world_file)?;

        info!(mosaic = %mosaic.display(), "Mosaic written");

        Ok(StitchOutput {
            mosaic,
            world_file,
            width: self.width,
            height: self.height,
            transform,
        })
    }
}

fn load_tile(path: &Path) -> Result<RgbaImage, StitchError> {
    let bytes = fs::read(path).map_err(|e| StitchError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    image::load_from_memory(&bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| StitchError::Decode {
            path: path.to_path_buf(),
            source: e,
        })
}
