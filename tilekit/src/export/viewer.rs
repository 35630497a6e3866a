//! HTML viewer for a downloaded tile directory.
//!
//! Templates use `@name` (or `@{name}`) placeholders; `@@` is a literal `@`.
//! An `@` not followed by a name is left as is.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::ExportError;
use crate::fetch::JobPaths;
use crate::tileset::TileSet;

/// Leaflet page shipped with the crate.
pub const DEFAULT_TEMPLATE: &str = include_str!("viewer.html");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerTemplate {
    source: String,
}

impl Default for ViewerTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl ViewerTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ExportError> {
        fs::read_to_string(path)
            .map(Self::new)
            .map_err(|e| ExportError::Io {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Substitute every placeholder. Unknown names are an error.
    pub fn render(&self, values: &BTreeMap<&str, String>) -> Result<String, ExportError> {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(pos) = rest.find('@') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(stripped) = after.strip_prefix('@') {
                out.push('@');
                rest = stripped;
                continue;
            }

            let (name, consumed) = match after.strip_prefix('{') {
                Some(inner) => match inner.find('}') {
                    Some(end) => (&inner[..end], end + 2),
                    None => ("", 0),
                },
                None => {
                    let len = after
                        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                        .unwrap_or(after.len());
                    (&after[..len], len)
                }
            };

            if !is_identifier(name) {
                out.push('@');
                rest = after;
                continue;
            }

            let value = values
                .get(name)
                .ok_or_else(|| ExportError::UnknownPlaceholder(name.to_string()))?;
            out.push_str(value);
            rest = &after[consumed..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Placeholder values for a job's viewer.
///
/// Tiles are always stored with Slippy rows, so `useTMS` is `false`
/// regardless of the provider's scheme.
pub fn viewer_values(paths: &JobPaths, tileset: &TileSet) -> BTreeMap<&'static str, String> {
    let center = tileset.center();
    let attribution = serde_json::Value::String(tileset.provider().attribution().to_string());

    BTreeMap::from([
        ("tilesDir", paths.job().to_string()),
        ("tilesExt", "png".to_string()),
        ("jobName", paths.job().to_string()),
        ("useTMS", "false".to_string()),
        ("centerLon", center.lon.to_string()),
        ("centerLat", center.lat.to_string()),
        ("avgZoom", tileset.avg_zoom().to_string()),
        ("maxZoom", tileset.zoom_range().max().to_string()),
        ("attribution", attribution.to_string()),
    ])
}

/// Render `template` for the job and write `{out}/{job}.html`.
pub fn write_viewer(
    paths: &JobPaths,
    tileset: &TileSet,
    template: &ViewerTemplate,
) -> Result<PathBuf, ExportError> {
    let html = template.render(&viewer_values(paths, tileset))?;
    let path = paths.viewer_path();

    fs::create_dir_all(paths.out_root()).map_err(|e| ExportError::Io {
        path: paths.out_root().to_path_buf(),
        source: e,
    })?;
    fs::write(&path, html).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use crate::tileset::{BoundingBox, TileSetSpec, ZoomRange};
    use tempfile::TempDir;

    fn values(pairs: &[(&'static str, &str)]) -> BTreeMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    fn tileset() -> TileSet {
        let spec = TileSetSpec::new(
            "nyc",
            BoundingBox::new(41.0, 40.0, -73.0, -75.0).unwrap(),
            ZoomRange::new(4, 12).unwrap(),
        );
        TileSet::new(
            spec,
            Provider::new("osm", "http://t/{zoom}/{x}/{y}.png").with_attribution("it's © OSM"),
        )
    }

    #[test]
    fn test_simple_substitution() {
        let t = ViewerTemplate::new("zoom=@zoom; name=@{name}x");
        let out = t.render(&values(&[("zoom", "5"), ("name", "abc")])).unwrap();
        assert_eq!(out, "zoom=5; name=abcx");
    }

    #[test]
    fn test_escapes_and_stray_at() {
        let t = ViewerTemplate::new("a@@b user @ host @1x");
        assert_eq!(t.render(&BTreeMap::new()).unwrap(), "a@b user @ host @1x");
    }

    #[test]
    fn test_unknown_placeholder() {
        let t = ViewerTemplate::new("@missing");
        assert!(matches!(
            t.render(&BTreeMap::new()),
            Err(ExportError::UnknownPlaceholder(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_builtin_template_fully_rendered() {
        let ts = tileset();
        let paths = JobPaths::new("/out", "nyc");
        let html = ViewerTemplate::default()
            .render(&viewer_values(&paths, &ts))
            .unwrap();

        assert!(html.contains("<title>nyc</title>"));
        assert!(html.contains("setView([40.5, -74], 8)"));
        assert!(html.contains("'nyc/{z}/{x}/{y}.png'"));
        assert!(html.contains("tms: false"));
        assert!(html.contains("maxZoom: 12"));
        assert!(html.contains("attribution: \"it's © OSM\""));
        assert!(html.contains("leaflet@1.9.4"));
        assert!(!html.contains("@tiles"));
    }

    #[test]
    fn test_write_viewer() {
        let temp = TempDir::new().unwrap();
        let paths = JobPaths::new(temp.path(), "nyc");
        let path = write_viewer(&paths, &tileset(), &ViewerTemplate::default()).unwrap();

        assert_eq!(path, temp.path().join("nyc.html"));
        assert!(fs::read_to_string(path).unwrap().contains("L.tileLayer"));
    }
}
