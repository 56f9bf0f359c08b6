//! Shared test utilities for the image-studio test suite.
//!
//! Provides synthetic image files on disk and ready-loaded stores so tests
//! can start from a known session instead of repeating setup.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = tmp.path().join("photo.jpg");
//! create_test_jpeg(&path, 200, 100);
//!
//! let store = loaded_mock_store(200, 100);
//! assert_history_depths(&store, 0, 0);
//! ```

use crate::imaging::codec::tests::{MockCodec, gradient};
use crate::imaging::{Codec, Operation};
use crate::store::ImageStore;
use image::{ImageEncoder, RgbImage};
use std::path::Path;

/// Path the mock store's image is registered under.
pub const MOCK_PHOTO: &str = "/photos/photo.jpg";

// =========================================================================
// Files on disk
// =========================================================================

fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient_rgb(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a small valid PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient_rgb(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

// =========================================================================
// Stores
// =========================================================================

/// A store over a [`MockCodec`] with a `width`x`height` gradient already loaded.
pub fn loaded_mock_store(width: u32, height: u32) -> ImageStore<MockCodec> {
    let codec = MockCodec::new().with_file(MOCK_PHOTO, gradient(width, height));
    let mut store = ImageStore::new(codec);
    store.load(Path::new(MOCK_PHOTO)).unwrap();
    store
}

/// Apply each operation, panicking with the operation name on failure.
pub fn apply_all<C: Codec>(store: &mut ImageStore<C>, ops: &[Operation]) {
    for op in ops {
        store
            .apply_operation(op)
            .unwrap_or_else(|e| panic!("applying {op} failed: {e}"));
    }
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert undo and redo stack depths together, with a readable message.
pub fn assert_history_depths<C: Codec>(store: &ImageStore<C>, undo: usize, redo: usize) {
    assert_eq!(
        (store.undo_depth(), store.redo_depth()),
        (undo, redo),
        "(undo, redo) depths mismatch"
    );
}
