//! External command-line tools: tile packaging and raster conversion.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::error::ExportError;
use crate::provider::TilingScheme;

/// Packs a tile directory into a single archive.
pub trait TilePackager {
    fn package(
        &self,
        tile_dir: &Path,
        out_file: &Path,
        scheme: TilingScheme,
        format: &str,
    ) -> Result<(), ExportError>;
}

/// Converts a raster and stamps it with a spatial reference.
pub trait RasterConverter {
    fn convert_and_georeference(
        &self,
        raster: &Path,
        target: &Path,
        srs: &str,
    ) -> Result<(), ExportError>;
}

/// `mb-util`, the MBTiles import/export tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbUtil {
    program: PathBuf,
}

impl Default for MbUtil {
    fn default() -> Self {
        Self::with_program("mb-util")
    }
}

impl MbUtil {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Fail early with [`ExportError::ToolMissing`] if `mb-util` cannot be started.
    pub fn check_available(&self) -> Result<(), ExportError> {
        require(&self.program)
    }

    pub fn args(tile_dir: &Path, out_file: &Path, scheme: TilingScheme, format: &str) -> Vec<OsString> {
        vec![
            tile_dir.into(),
            out_file.into(),
            "--scheme".into(),
            scheme.as_str().into(),
            "--image_format".into(),
            format.into(),
        ]
    }
}

impl TilePackager for MbUtil {
    fn package(
        &self,
        tile_dir: &Path,
        out_file: &Path,
        scheme: TilingScheme,
        format: &str,
    ) -> Result<(), ExportError> {
        if !tile_dir.is_dir() {
            return Err(ExportError::MissingInput(tile_dir.to_path_buf()));
        }
        info!(dir = %tile_dir.display(), out = %out_file.display(), "Packaging tiles");
        run_tool(&self.program, &Self::args(tile_dir, out_file, scheme, format))
    }
}

/// GDAL: `gdal_translate` to a JPEG-compressed GeoTIFF, then `gdal_edit.py`
/// to assign the spatial reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gdal {
    translate: PathBuf,
    edit: PathBuf,
}

impl Default for Gdal {
    fn default() -> Self {
        Self::with_programs("gdal_translate", "gdal_edit.py")
    }
}

impl Gdal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_programs(translate: impl Into<PathBuf>, edit: impl Into<PathBuf>) -> Self {
        Self {
            translate: translate.into(),
            edit: edit.into(),
        }
    }

    /// Fail early if either GDAL program cannot be started.
    pub fn check_available(&self) -> Result<(), ExportError> {
        require(&self.translate)?;
        require(&self.edit)
    }

    pub fn translate_args(raster: &Path, target: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "COMPRESS=JPEG",
            "PHOTOMETRIC=RGB",
            "BIGTIFF=YES",
            "ALPHA=YES",
            "INTERLEAVE=BAND",
            "JPEG_QUALITY=75",
            "TFW=NO",
        ]
        .iter()
        .flat_map(|opt| [OsString::from("-co"), OsString::from(opt)])
        .collect();
        args.push(raster.into());
        args.push(target.into());
        args
    }

    pub fn edit_args(target: &Path, srs: &str) -> Vec<OsString> {
        vec!["-a_srs".into(), srs.into(), target.into()]
    }
}

impl RasterConverter for Gdal {
    fn convert_and_georeference(
        &self,
        raster: &Path,
        target: &Path,
        srs: &str,
    ) -> Result<(), ExportError> {
        if !raster.is_file() {
            return Err(ExportError::MissingInput(raster.to_path_buf()));
        }
        info!(raster = %raster.display(), target = %target.display(), srs, "Converting raster");
        run_tool(&self.translate, &Self::translate_args(raster, target))?;
        run_tool(&self.edit, &Self::edit_args(target, srs))
    }
}

fn run_tool(program: &Path, args: &[OsString]) -> Result<(), ExportError> {
    let tool = program.display().to_string();
    debug!(tool = %tool, args = ?args, "Running external tool");

    let output = Command::new(program)
        .args(args.iter().map(OsString::as_os_str))
        .output()
        .map_err(|e| tool_error(&tool, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExportError::ToolFailed {
            tool,
            detail: format!("{} {}", output.status, stderr.trim()),
        });
    }
    Ok(())
}

fn tool_error(tool: &str, e: io::Error) -> ExportError {
    if e.kind() == io::ErrorKind::NotFound {
        ExportError::ToolMissing {
            tool: tool.to_string(),
            detail: e.to_string(),
        }
    } else {
        ExportError::ToolFailed {
            tool: tool.to_string(),
            detail: e.to_string(),
        }
    }
}

fn require(program: &Path) -> Result<(), ExportError> {
    if tool_available(program) {
        Ok(())
    } else {
        Err(ExportError::ToolMissing {
            tool: program.display().to_string(),
            detail: "not found on PATH".to_string(),
        })
    }
}

/// Whether `program` can be started at all.
pub fn tool_available(program: impl AsRef<OsStr>) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .is_ok()
}
