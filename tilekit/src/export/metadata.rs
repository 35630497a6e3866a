//! `metadata.json` for tile archives.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ExportError;
use crate::tileset::TileSet;

/// Archive metadata in the layout mb-util reads from a tile directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    pub name: String,
    #[serde(rename = "type")]
    pub layer_type: String,
    pub version: String,
    pub description: String,
    pub format: String,
    /// `west,south,east,north` in degrees.
    pub bounds: String,
    pub attribution: String,
}

impl MetaData {
    pub fn from_tileset(tileset: &TileSet) -> Self {
        let spec = tileset.spec();
        let b = tileset.bounds();
        Self {
            name: spec.name.clone(),
            layer_type: "baselayer".to_string(),
            version: spec.version.clone(),
            description: spec.description.clone(),
            format: "png".to_string(),
            bounds: format!("{},{},{},{}", b.west(), b.south(), b.east(), b.north()),
            attribution: tileset.provider().attribution().to_string(),
        }
    }

    /// Write `metadata.json` into `dir`, creating it if needed.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir).map_err(|e| ExportError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = dir.join("metadata.json");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| ExportError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use crate::tileset::{BoundingBox, TileSetSpec, ZoomRange};
    use tempfile::TempDir;

    fn tileset() -> TileSet {
        let spec = TileSetSpec::new(
            "alps",
            BoundingBox::new(47.5, 45.5, 10.5, 6.0).unwrap(),
            ZoomRange::new(6, 9).unwrap(),
        )
        .with_version("2.1.0")
        .with_description("Western Alps");
        let provider = Provider::new("otm", "http://t/{zoom}/{x}/{y}.png").with_attribution("© OTM");
        TileSet::new(spec, provider)
    }

    #[test]
    fn test_fields() {
        let meta = MetaData::from_tileset(&tileset());
        assert_eq!(meta.name, "alps");
        assert_eq!(meta.layer_type, "baselayer");
        assert_eq!(meta.version, "2.1.0");
        assert_eq!(meta.format, "png");
        assert_eq!(meta.bounds, "6,45.5,10.5,47.5");
        assert_eq!(meta.attribution, "© OTM");
    }

    #[test]
    fn test_write_json() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("alps");
        let path = MetaData::from_tileset(&tileset()).write(&dir).unwrap();

        assert_eq!(path, dir.join("metadata.json"));
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["type"], "baselayer");
        assert_eq!(value["description"], "Western Alps");
        assert!(value.get("layer_type").is_none());
    }
}
