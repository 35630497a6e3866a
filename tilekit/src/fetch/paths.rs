//! Output layout for a job.

use std::path::{Path, PathBuf};

use crate::tile::Tile;

/// Filesystem layout of one job under an output root.
///
/// ```text
/// {out}/{job}/{zoom}/{x}/{y}.png   tiles (Slippy rows)
/// {out}/{job}/metadata.json
/// {out}/{job}.png + .pngw          stitched mosaic and world file
/// {out}/{job}.html                 viewer
/// {out}/{job}.mbtiles
/// {out}/{job}.tif
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    out_root: PathBuf,
    job: String,
}

impl JobPaths {
    pub fn new(out_root: impl Into<PathBuf>, job: impl Into<String>) -> Self {
        Self {
            out_root: out_root.into(),
            job: job.into(),
        }
    }

    pub fn out_root(&self) -> &Path {
        &self.out_root
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn tiles_dir(&self) -> PathBuf {
        self.out_root.join(&self.job)
    }

    pub fn tile_path(&self, tile: &Tile) -> PathBuf {
        self.tiles_dir().join(tile.path())
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.tiles_dir().join("metadata.json")
    }

    pub fn mosaic_path(&self) -> PathBuf {
        self.sibling("png")
    }

    pub fn world_file_path(&self) -> PathBuf {
        self.sibling("pngw")
    }

    pub fn viewer_path(&self) -> PathBuf {
        self.sibling("html")
    }

    pub fn mbtiles_path(&self) -> PathBuf {
        self.sibling("mbtiles")
    }

    pub fn geotiff_path(&self) -> PathBuf {
        self.sibling("tif")
    }

    fn sibling(&self, ext: &str) -> PathBuf {
        self.out_root.join(format!("{}.{}", self.job, ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = JobPaths::new("/out", "alps");
        assert_eq!(paths.tiles_dir(), PathBuf::from("/out/alps"));
        assert_eq!(
            paths.tile_path(&Tile::new(3, 5, 4)),
            PathBuf::from("/out/alps/4/3/5.png")
        );
        assert_eq!(paths.metadata_path(), PathBuf::from("/out/alps/metadata.json"));
        assert_eq!(paths.mosaic_path(), PathBuf::from("/out/alps.png"));
        assert_eq!(paths.world_file_path(), PathBuf::from("/out/alps.pngw"));
        assert_eq!(paths.viewer_path(), PathBuf::from("/out/alps.html"));
        assert_eq!(paths.mbtiles_path(), PathBuf::from("/out/alps.mbtiles"));
        assert_eq!(paths.geotiff_path(), PathBuf::from("/out/alps.tif"));
    }

    #[test]
    fn test_dotted_job_name_keeps_full_stem() {
        let paths = JobPaths::new("/out", "nyc.v2");
        assert_eq!(paths.mosaic_path(), PathBuf::from("/out/nyc.v2.png"));
    }
}
