//! The pixel buffer value that flows through the store, the filters and the codec.
//!
//! An [`ImageBuffer`] is immutable once built. Cloning shares the underlying
//! pixels (an `Arc`), so pushing a snapshot onto the undo history costs a
//! pointer copy, not a pixel copy. Every filter produces a fresh buffer.
//!
//! ## Sample layout
//!
//! Buffers are normalized on construction to 8-bit samples:
//!
//! | Source | Stored as |
//! |---|---|
//! | any layout with alpha | RGBA8 (4 channels) |
//! | any layout without alpha | RGB8 (3 channels) |
//!
//! Filters can therefore assume one of two layouts and never have to deal
//! with 16-bit or float images.

use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

/// Immutable, cheaply clonable 8-bit raster.
#[derive(Clone)]
pub struct ImageBuffer {
    pixels: Arc<DynamicImage>,
}

impl ImageBuffer {
    /// Wrap a decoded or filtered image, normalizing its sample layout.
    pub fn new(image: DynamicImage) -> Self {
        let normalized = match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        Self {
            pixels: Arc::new(normalized),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Samples per pixel: 3 (RGB) or 4 (RGBA).
    pub fn channels(&self) -> u8 {
        self.pixels.color().channel_count()
    }

    pub fn has_alpha(&self) -> bool {
        self.pixels.color().has_alpha()
    }

    /// Read-only view of the pixels for filters, encoders and renderers.
    pub fn as_image(&self) -> &DynamicImage {
        &self.pixels
    }

    /// Raw interleaved samples, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    /// Whether two buffers share the same pixel allocation.
    pub fn shares_pixels_with(&self, other: &ImageBuffer) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl From<DynamicImage> for ImageBuffer {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl PartialEq for ImageBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.shares_pixels_with(other) || *self.pixels == *other.pixels
    }
}

impl Eq for ImageBuffer {}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("channels", &self.channels())
            .finish()
    }
}
