//! Export commands - HTML viewer, MBTiles archive and GeoTIFF.

use std::path::Path;

use tilekit::export::{export_geotiff, package_mbtiles, write_viewer, Gdal, MbUtil, ViewerTemplate};

use super::common::{Context, GlobalArgs};
use super::stitch;
use crate::error::CliError;

/// Write `{out}/{job}.html`, optionally from a custom template.
pub fn viewer(global: &GlobalArgs, tileset: &str, template: Option<&Path>) -> Result<(), CliError> {
    let ctx = Context::load(global)?;
    let job = ctx.fetch_job(tileset)?;
    let template = match template {
        Some(path) => ViewerTemplate::from_file(path)?,
        None => ViewerTemplate::default(),
    };

    let path = write_viewer(job.paths(), job.tileset(), &template)?;
    println!("Viewer: {}", path.display());
    Ok(())
}

/// Write metadata.json and package the tile directory with mb-util.
pub fn mbtiles(global: &GlobalArgs, tileset: &str) -> Result<(), CliError> {
    let ctx = Context::load(global)?;
    let job = ctx.fetch_job(tileset)?;
    if !job.to_download().is_empty() {
        tracing::warn!(
            missing = job.to_download().len(),
            "Packaging an incomplete tile set"
        );
    }

    let packager = MbUtil::new();
    packager.check_available()?;
    let path = package_mbtiles(job.paths(), job.tileset(), &packager)?;
    println!("MBTiles: {}", path.display());
    Ok(())
}

/// Stitch, then convert the mosaic to a GeoTIFF with GDAL.
pub fn geotiff(global: &GlobalArgs, tileset: &str, zoom: Option<u8>) -> Result<(), CliError> {
    let ctx = Context::load(global)?;
    let gdal = Gdal::new();
    gdal.check_available()?;

    let completed = ctx.completed(tileset)?;
    let output = stitch::stitch(&completed, zoom)?;
    stitch::print_output(&output);

    let path = export_geotiff(completed.paths(), &output, &gdal)?;
    println!("GeoTIFF:    {}", path.display());
    Ok(())
}
