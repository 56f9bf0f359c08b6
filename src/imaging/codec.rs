//! Codec trait and shared error type.
//!
//! The [`Codec`] trait is the store's only route to the filesystem: it turns
//! a path into an [`ImageBuffer`] and an [`ImageBuffer`] back into a file.
//! The production implementation is [`RustCodec`](super::rust_codec::RustCodec);
//! tests use the in-memory `MockCodec` below so history logic can be
//! exercised without touching disk.

use super::params::SaveFormat;
use crate::buffer::ImageBuffer;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Decode/encode images at the store's boundary.
///
/// Failures are always reported, never swallowed: a decode error must not
/// produce an empty buffer and an encode error must not leave a partial file.
pub trait Codec {
    /// Decode the file at `path`.
    fn decode(&self, path: &Path) -> Result<ImageBuffer, CodecError>;

    /// Encode `buffer` to `path` in `format`.
    fn encode(&self, buffer: &ImageBuffer, path: &Path, format: SaveFormat)
    -> Result<(), CodecError>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn decode(&self, path: &Path) -> Result<ImageBuffer, CodecError> {
        (**self).decode(path)
    }

    fn encode(
        &self,
        buffer: &ImageBuffer,
        path: &Path,
        format: SaveFormat,
    ) -> Result<(), CodecError> {
        (**self).encode(buffer, path, format)
    }
}
