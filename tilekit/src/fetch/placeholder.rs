//! Transparent placeholder for tiles the provider does not have.
//!
//! A 404 is written to disk as a fully transparent tile so the job counts
//! as complete and a stitched mosaic has no holes. The PNG is encoded once
//! and cached for the lifetime of the process.

use std::io::Cursor;
use std::sync::OnceLock;

use image::{ImageFormat, RgbaImage};

use crate::coord::TILE_SIZE;

static BLANK_TILE: OnceLock<Vec<u8>> = OnceLock::new();

/// Encode a fully transparent square PNG.
pub fn generate_blank_tile(size: u32) -> Result<Vec<u8>, image::ImageError> {
    let image = RgbaImage::new(size, size);
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// The cached 256×256 blank tile.
pub fn blank_tile() -> Result<&'static [u8], image::ImageError> {
    if let Some(bytes) = BLANK_TILE.get() {
        return Ok(bytes);
    }
    let bytes = generate_blank_tile(TILE_SIZE)?;
    Ok(BLANK_TILE.get_or_init(|| bytes))
}
