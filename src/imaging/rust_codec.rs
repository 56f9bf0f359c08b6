//! Pure Rust codec on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality from [`SaveFormat::Jpeg`]) |
//! | Encode → PNG / BMP | `DynamicImage::write_to` |
//!
//! Encoding goes to memory first and is written in one `fs::write`, so a
//! failed encode never leaves a truncated file behind.

use super::codec::{Codec, CodecError};
use super::params::SaveFormat;
use crate::buffer::ImageBuffer;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Production codec.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: ImageError) -> CodecError {
    match err {
        ImageError::IoError(io) => CodecError::Io(io),
        ImageError::Unsupported(e) => {
            CodecError::UnsupportedFormat(format!("{}: {}", path.display(), e))
        }
        other => CodecError::Decode(format!("Failed to decode {}: {}", path.display(), other)),
    }
}

/// Encode into an in-memory buffer.
fn encode_to_vec(image: &DynamicImage, format: SaveFormat) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Cursor::new(Vec::new());
    let result = match format {
        SaveFormat::Jpeg(quality) => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut bytes,
                quality.value() as u8,
            );
            rgb.write_with_encoder(encoder)
        }
        SaveFormat::Png => image.write_to(&mut bytes, ImageFormat::Png),
        SaveFormat::Bmp => image.write_to(&mut bytes, ImageFormat::Bmp),
    };
    result.map_err(|e| CodecError::Encode(format!("{} encode failed: {}", format.extension(), e)))?;
    Ok(bytes.into_inner())
}

impl Codec for RustCodec {
    fn decode(&self, path: &Path) -> Result<ImageBuffer, CodecError> {
        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| decode_error(path, e))?;
        Ok(ImageBuffer::new(image))
    }

    fn encode(
        &self,
        buffer: &ImageBuffer,
        path: &Path,
        format: SaveFormat,
    ) -> Result<(), CodecError> {
        let bytes = encode_to_vec(buffer.as_image(), format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::{create_test_jpeg, create_test_png};
    use image::{Rgba, RgbaImage};

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("photo.jpg");
        create_test_jpeg(&path, 200, 100);

        let buffer = RustCodec::new().decode(&path).unwrap();
        assert_eq!(buffer.dimensions(), (200, 100));
        assert_eq!(buffer.channels(), 3);
    }

    #[test]
    fn decode_sniffs_content_not_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually-a-png.jpg");
        create_test_png(&path, 16, 8);

        let buffer = RustCodec::new().decode(&path).unwrap();
        assert_eq!(buffer.dimensions(), (16, 8));
    }

    #[test]
    fn decode_nonexistent_file_is_io_error() {
        let result = RustCodec::new().decode(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(CodecError::Io(_))));
    }

    #[test]
    fn decode_garbage_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("corrupt.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nthis is not a png").unwrap();

        let result = RustCodec::new().decode(&path);
        assert!(result.is_err());
    }

    #[test]
    fn decode_unknown_content_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "just text").unwrap();

        let result = RustCodec::new().decode(&path);
        assert!(matches!(
            result,
            Err(CodecError::UnsupportedFormat(_)) | Err(CodecError::Decode(_))
        ));
    }

    #[test]
    fn png_encode_is_lossless() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        create_test_png(&source, 32, 24);

        let codec = RustCodec::new();
        let original = codec.decode(&source).unwrap();
        let output = tmp.path().join("copy.png");
        codec.encode(&original, &output, SaveFormat::Png).unwrap();

        assert_eq!(codec.decode(&output).unwrap(), original);
    }

    #[test]
    fn bmp_encode_is_lossless() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        create_test_png(&source, 10, 10);

        let codec = RustCodec::new();
        let original = codec.decode(&source).unwrap();
        let output = tmp.path().join("copy.bmp");
        codec.encode(&original, &output, SaveFormat::Bmp).unwrap();

        assert_eq!(codec.decode(&output).unwrap(), original);
    }

    #[test]
    fn jpeg_encode_drops_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let buffer = ImageBuffer::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            40,
            30,
            Rgba([200, 100, 50, 128]),
        )));
        let output = tmp.path().join("out.jpg");

        let codec = RustCodec::new();
        codec
            .encode(&buffer, &output, SaveFormat::Jpeg(Quality::new(90)))
            .unwrap();

        let decoded = codec.decode(&output).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
        assert_eq!(decoded.channels(), 3);
    }

    #[test]
    fn encode_into_missing_directory_is_io_error() {
        let buffer = crate::imaging::codec::tests::gradient(4, 4);
        let result = RustCodec::new().encode(
            &buffer,
            Path::new("/nonexistent/dir/out.png"),
            SaveFormat::Png,
        );
        assert!(matches!(result, Err(CodecError::Io(_))));
    }
}
