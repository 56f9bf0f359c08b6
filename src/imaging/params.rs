//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how*. Each one can only be built
//! through a validating constructor, so a value that exists is a value the
//! [`filters`](super::filters) can apply without further checks. Validation
//! failures carry a human-readable reason that ends up in
//! [`OperationError::InvalidParams`](crate::store::OperationError::InvalidParams).
//!
//! ## Types
//!
//! - [`BlurIntensity`]: 1–50, mapped to an odd Gaussian kernel.
//! - [`Brightness`]: additive delta, -100–100.
//! - [`ContrastFactor`]: multiplicative gain, 0.5–3.0.
//! - [`Rotation`]: quarter turns: 90, 180, 270 degrees clockwise.
//! - [`FlipAxis`]: horizontal (mirror left/right) or vertical (top/bottom).
//! - [`Dimensions`]: strictly positive width and height.
//! - [`Quality`]: lossy encoding quality (1–100). Clamped on construction.
//! - [`SaveFormat`]: output codec, inferred from a file extension.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Reason a parameter was rejected.
pub type InvalidParam = String;

/// Gaussian blur strength (1–50).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurIntensity(u32);

impl BlurIntensity {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 50;

    pub fn new(value: i64) -> Result<Self, InvalidParam> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(format!(
                "blur intensity must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            ));
        }
        Ok(Self(value as u32))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Additive brightness delta (-100–100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness(i32);

impl Brightness {
    pub const MIN: i64 = -100;
    pub const MAX: i64 = 100;

    pub fn new(delta: i64) -> Result<Self, InvalidParam> {
        if !(Self::MIN..=Self::MAX).contains(&delta) {
            return Err(format!(
                "brightness must be between {} and {}, got {delta}",
                Self::MIN,
                Self::MAX
            ));
        }
        Ok(Self(delta as i32))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

/// Multiplicative contrast gain (0.5–3.0, 1.0 = unchanged).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastFactor(f32);

impl ContrastFactor {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 3.0;

    pub fn new(factor: f64) -> Result<Self, InvalidParam> {
        // `contains` is false for NaN, so NaN is rejected here too
        if !(Self::MIN..=Self::MAX).contains(&factor) {
            return Err(format!(
                "contrast must be between {} and {}, got {factor}",
                Self::MIN,
                Self::MAX
            ));
        }
        Ok(Self(factor as f32))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

/// Clockwise quarter-turn rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    pub fn from_degrees(degrees: i64) -> Result<Self, InvalidParam> {
        match degrees {
            90 => Ok(Self::Cw90),
            180 => Ok(Self::Cw180),
            270 => Ok(Self::Cw270),
            other => Err(format!("rotation must be 90, 180 or 270, got {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

impl FlipAxis {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl FromStr for FlipAxis {
    type Err = InvalidParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            other => Err(format!(
                "flip axis must be horizontal or vertical, got {other:?}"
            )),
        }
    }
}

impl fmt::Display for FlipAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strictly positive pixel dimensions, small enough to allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Longest accepted edge.
    pub const MAX_EDGE: i64 = 65_535;
    /// Largest accepted area (256 megapixels).
    pub const MAX_PIXELS: i64 = 1 << 28;

    pub fn new(width: i64, height: i64) -> Result<Self, InvalidParam> {
        if width <= 0 || height <= 0 {
            return Err(format!(
                "resize dimensions must be positive, got {width}x{height}"
            ));
        }
        if width > Self::MAX_EDGE || height > Self::MAX_EDGE {
            return Err(format!(
                "resize dimensions must be at most {} per edge, got {width}x{height}",
                Self::MAX_EDGE
            ));
        }
        // Both edges are <= 65535 here, so the product fits in i64
        if width * height > Self::MAX_PIXELS {
            return Err(format!(
                "resize target {width}x{height} exceeds {} pixels",
                Self::MAX_PIXELS
            ));
        }
        Ok(Self {
            width: width as u32,
            height: height as u32,
        })
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Output codec for [`Codec::encode`](super::Codec::encode).
///
/// JPEG is the lossy format; PNG and BMP are lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Jpeg(Quality),
    Png,
    Bmp,
}

impl SaveFormat {
    /// Pick a format from a path's extension, case-insensitively.
    ///
    /// Returns `None` for a missing or unrecognised extension.
    pub fn from_path(path: &Path, quality: Quality) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::from_extension(&ext, quality)
    }

    pub fn from_extension(ext: &str, quality: Quality) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg(quality)),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg(_) => "jpg",
            Self::Png => "png",
            Self::Bmp => "bmp",
        }
    }
}

/// File extensions a save target may have. Decoding sniffs content instead.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];
