//! The filter library: pure pixel transforms.
//!
//! Every function borrows its input and returns a new image; nothing here
//! mutates in place, which is what lets the store keep earlier buffers as
//! undo snapshots. Inputs are RGB8 or RGBA8 (see [`crate::buffer`]).
//!
//! | Filter | Crate / function |
//! |---|---|
//! | Grayscale | `DynamicImage::grayscale`, re-expanded to the input layout |
//! | Blur | `DynamicImage::blur` (Gaussian, kernel-derived sigma) |
//! | Edges | `imageproc::edges::canny` (thresholds 100 / 200) |
//! | Brightness | `DynamicImage::brighten` (saturating, alpha untouched) |
//! | Contrast | per-channel gain, saturating, alpha untouched |
//! | Rotate | `rotate90` / `rotate180` / `rotate270` |
//! | Flip | `fliph` / `flipv` |
//! | Resize | `resize_exact` with the `Triangle` (bilinear) filter |

use super::calculations::blur_sigma;
use super::params::{BlurIntensity, Brightness, ContrastFactor, Dimensions, FlipAxis, Rotation};
use image::imageops::FilterType;
use image::{DynamicImage, Pixel};

/// Canny hysteresis thresholds.
const CANNY_LOW: f32 = 100.0;
const CANNY_HIGH: f32 = 200.0;

/// Luminance, kept in the input's channel layout.
pub fn grayscale(image: &DynamicImage) -> DynamicImage {
    let gray = image.grayscale();
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(gray.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(gray.to_rgb8())
    }
}

pub fn blur(image: &DynamicImage, intensity: BlurIntensity) -> DynamicImage {
    image.blur(blur_sigma(intensity.value()))
}

/// Canny edge map as a white-on-black RGB image.
pub fn edge_detect(image: &DynamicImage) -> DynamicImage {
    let edges = imageproc::edges::canny(&image.to_luma8(), CANNY_LOW, CANNY_HIGH);
    DynamicImage::ImageRgb8(DynamicImage::ImageLuma8(edges).to_rgb8())
}

pub fn brightness(image: &DynamicImage, delta: Brightness) -> DynamicImage {
    image.brighten(delta.value())
}

/// Scale every color channel by `factor` around zero, saturating at 255.
pub fn contrast(image: &DynamicImage, factor: ContrastFactor) -> DynamicImage {
    let gain = factor.value();
    let scale = |v: u8| (v as f32 * gain).round().clamp(0.0, 255.0) as u8;

    match image {
        DynamicImage::ImageRgba8(rgba) => {
            let mut out = rgba.clone();
            for px in out.pixels_mut() {
                px.apply_without_alpha(scale);
            }
            DynamicImage::ImageRgba8(out)
        }
        other => {
            let mut out = other.to_rgb8();
            for px in out.pixels_mut() {
                px.apply(scale);
            }
            DynamicImage::ImageRgb8(out)
        }
    }
}

pub fn rotate(image: &DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::Cw90 => image.rotate90(),
        Rotation::Cw180 => image.rotate180(),
        Rotation::Cw270 => image.rotate270(),
    }
}

pub fn flip(image: &DynamicImage, axis: FlipAxis) -> DynamicImage {
    match axis {
        FlipAxis::Horizontal => image.fliph(),
        FlipAxis::Vertical => image.flipv(),
    }
}

/// Resize to exactly `size`, ignoring the source aspect ratio.
pub fn resize(image: &DynamicImage, size: Dimensions) -> DynamicImage {
    image.resize_exact(size.width, size.height, FilterType::Triangle)
}
