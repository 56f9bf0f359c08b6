//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image::ImageReader`, `JpegEncoder`, `write_to` |
//! | **Blur / brightness / rotate / flip** | `image::DynamicImage` methods |
//! | **Edge detection** | `imageproc::edges::canny` |
//! | **Resize** | `resize_exact` (Triangle) for edits, Lanczos3 for previews |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for kernel and dimension math (unit testable)
//! - **Parameters**: Validated values an operation carries
//! - **Codec**: [`Codec`] trait + [`RustCodec`]
//! - **Operations**: [`Operation`] requests and the [`Filter`]s they validate into
//! - **Filters**: The pixel transforms themselves

pub mod calculations;
pub mod codec;
pub mod filters;
pub mod operations;
mod params;
pub mod rust_codec;

pub use codec::{Codec, CodecError};
pub use operations::{Filter, Operation, ParseOperationError};
pub use params::{
    BlurIntensity, Brightness, ContrastFactor, Dimensions, FlipAxis, InvalidParam, Quality,
    Rotation, SUPPORTED_EXTENSIONS, SaveFormat,
};
pub use rust_codec::RustCodec;
