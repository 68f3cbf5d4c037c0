use std::path::Path;

use image::ImageReader;

use crate::ImageDimensions;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    #[error("could not open {path}: {message}")]
    Io { path: String, message: String },
    #[error("could not decode image: {0}")]
    Decode(String),
}

/// Reads the pixel dimensions of an image without decoding its pixels.
///
/// Blocking; the engine calls it from `spawn_blocking`.
pub fn read_dimensions(path: &Path) -> Result<ImageDimensions, PreviewError> {
    let io_error = |err: std::io::Error| PreviewError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    };
    let reader = ImageReader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|err| PreviewError::Decode(err.to_string()))?;
    Ok(ImageDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_png_dimensions() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbImage::new(7, 3).save(&path).unwrap();

        assert_eq!(
            read_dimensions(&path).unwrap(),
            ImageDimensions {
                width: 7,
                height: 3
            }
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_dimensions(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, PreviewError::Io { .. }));
    }

    #[test]
    fn garbage_is_decode_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = read_dimensions(&path).unwrap_err();
        assert!(matches!(err, PreviewError::Decode(_)));
    }
}
