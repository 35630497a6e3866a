//! Outputs built from a fetched tile directory or a stitched mosaic.
//!
//! - [`MetaData`]: `metadata.json` beside the tiles.
//! - [`ViewerTemplate`]: a Leaflet page for browsing the tiles locally.
//! - [`TilePackager`] / [`MbUtil`]: MBTiles archive via `mb-util`.
//! - [`RasterConverter`] / [`Gdal`]: GeoTIFF via GDAL.
//!
//! The external tools are invoked as subprocesses; a missing tool is
//! reported as [`ExportError::ToolMissing`].

mod error;
mod metadata;
mod tools;
mod viewer;

pub use error::ExportError;
pub use metadata::MetaData;
pub use tools::{tool_available, Gdal, MbUtil, RasterConverter, TilePackager};
pub use viewer::{viewer_values, write_viewer, ViewerTemplate, DEFAULT_TEMPLATE};

use std::path::PathBuf;

use crate::fetch::JobPaths;
use crate::provider::TilingScheme;
use crate::stitch::StitchOutput;
use crate::tileset::TileSet;

/// Spatial reference of every mosaic this crate produces.
pub const MOSAIC_SRS: &str = "EPSG:3857";

/// Write `metadata.json` and package the tile directory as `{out}/{job}.mbtiles`.
///
/// Tiles on disk always use Slippy rows, so the archive is built with the
/// `xyz` scheme whatever the provider's convention.
pub fn package_mbtiles<P: TilePackager + ?Sized>(
    paths: &JobPaths,
    tileset: &TileSet,
    packager: &P,
) -> Result<PathBuf, ExportError> {
    MetaData::from_tileset(tileset).write(&paths.tiles_dir())?;
    let out = paths.mbtiles_path();
    packager.package(&paths.tiles_dir(), &out, TilingScheme::Xyz, "png")?;
    Ok(out)
}

/// Convert a stitched mosaic to `{out}/{job}.tif` in spherical Mercator.
pub fn export_geotiff<C: RasterConverter + ?Sized>(
    paths: &JobPaths,
    mosaic: &StitchOutput,
    converter: &C,
) -> Result<PathBuf, ExportError> {
    let target = paths.geotiff_path();
    converter.convert_and_georeference(&mosaic.mosaic, &target, MOSAIC_SRS)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use crate::stitch::WorldFile;
    use crate::tileset::{BoundingBox, TileSetSpec, ZoomRange};
    use parking_lot::Mutex;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingPackager {
        calls: Mutex<Vec<(PathBuf, PathBuf, TilingScheme, String)>>,
    }

    impl TilePackager for RecordingPackager {
        fn package(
            &self,
            tile_dir: &Path,
            out_file: &Path,
            scheme: TilingScheme,
            format: &str,
        ) -> Result<(), ExportError> {
            self.calls.lock().push((
                tile_dir.to_path_buf(),
                out_file.to_path_buf(),
                scheme,
                format.to_string(),
            ));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingConverter {
        calls: Mutex<Vec<(PathBuf, PathBuf, String)>>,
    }

    impl RasterConverter for RecordingConverter {
        fn convert_and_georeference(
            &self,
            raster: &Path,
            target: &Path,
            srs: &str,
        ) -> Result<(), ExportError> {
            self.calls
                .lock()
                .push((raster.to_path_buf(), target.to_path_buf(), srs.to_string()));
            Ok(())
        }
    }

    fn tms_tileset() -> TileSet {
        let spec = TileSetSpec::new(
            "job",
            BoundingBox::new(1.0, 0.0, 1.0, 0.0).unwrap(),
            ZoomRange::single(3).unwrap(),
        );
        TileSet::new(
            spec,
            Provider::new("tms", "http://t/{zoom}/{x}/{y}.png").with_scheme(TilingScheme::Tms),
        )
    }

    #[test]
    fn test_package_mbtiles_uses_xyz_and_writes_metadata() {
        let temp = TempDir::new().unwrap();
        let paths = JobPaths::new(temp.path(), "job");
        let packager = RecordingPackager::default();

        let out = package_mbtiles(&paths, &tms_tileset(), &packager).unwrap();

        assert_eq!(out, temp.path().join("job.mbtiles"));
        assert!(paths.metadata_path().is_file());
        let calls = packager.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, paths.tiles_dir());
        assert_eq!(calls[0].2, TilingScheme::Xyz);
        assert_eq!(calls[0].3, "png");
    }

    #[test]
    fn test_export_geotiff() {
        let paths = JobPaths::new("/out", "job");
        let converter = RecordingConverter::default();
        let mosaic = StitchOutput {
            mosaic: paths.mosaic_path(),
            world_file: paths.world_file_path(),
            width: 256,
            height: 256,
            transform: WorldFile {
                pixel_x: 1.0,
                rotation_y: 0.0,
                rotation_x: 0.0,
                pixel_y: -1.0,
                origin_x: 0.0,
                origin_y: 0.0,
            },
        };

        let out = export_geotiff(&paths, &mosaic, &converter).unwrap();
        assert_eq!(out, PathBuf::from("/out/job.tif"));
        assert_eq!(
            converter.calls.lock()[0],
            (PathBuf::from("/out/job.png"), out, MOSAIC_SRS.to_string())
        );
    }
}
