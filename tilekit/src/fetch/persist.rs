//! Writing fetched tiles to disk.

use std::io;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use thiserror::Error;

/// Errors writing a tile.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to decode tile payload for {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to move {path} into place: {source}")]
    Rename { path: PathBuf, source: io::Error },

    #[error("tile write task failed: {0}")]
    Task(String),
}

/// Create a directory and its parents; an existing directory is fine.
pub async fn ensure_dir(path: &Path) -> Result<(), PersistError> {
    match tokio::fs::create_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(PersistError::CreateDir {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Decode `payload` and write it as PNG at `path`.
///
/// Decoding and encoding run on the blocking pool. The image is written to
/// a sibling `.part` file and renamed, so a tile path only ever holds a
/// complete image.
pub async fn save_tile(payload: Vec<u8>, path: PathBuf) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    tokio::task::spawn_blocking(move || write_png(&payload, &path))
        .await
        .map_err(|e| PersistError::Task(e.to_string()))?
}

fn write_png(payload: &[u8], path: &Path) -> Result<(), PersistError> {
    let image = image::load_from_memory(payload).map_err(|e| PersistError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    image
        .save_with_format(&partial, ImageFormat::Png)
        .map_err(|e| PersistError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

    std::fs::rename(&partial, path).map_err(|e| PersistError::Rename {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn jpeg_payload() -> Vec<u8> {
        let image = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 200, 30]));
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn test_ensure_dir_tolerates_existing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a/b/c");
        ensure_dir(&dir).await.unwrap();
        ensure_dir(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_save_reencodes_as_png() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("3/1/2.png");

        save_tile(jpeg_payload(), path.clone()).await.unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        assert!(!temp.path().join("3/1/2.png.part").exists());
    }

    #[tokio::test]
    async fn test_save_preserves_alpha() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("t.png");

        let image = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 77]));
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();

        save_tile(buf, path.clone()).await.unwrap();
        let read = image::open(&path).unwrap().to_rgba8();
        assert_eq!(read.get_pixel(2, 2), &Rgba([1, 2, 3, 77]));
    }

    #[tokio::test]
    async fn test_garbage_payload_is_a_decode_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.png");

        let err = save_tile(b"<html>rate limited</html>".to_vec(), path.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, PersistError::Decode { .. }));
        assert!(!path.exists());
    }
}
