//! Pure calculation functions for filters and display.
//!
//! All functions here are pure and testable without any I/O or images.

/// Odd Gaussian kernel size for a blur intensity.
///
/// Even intensities round up to the next odd size; anything below 1 is
/// treated as 1.
///
/// # Examples
/// ```
/// # use image_studio::imaging::calculations::blur_kernel_size;
/// assert_eq!(blur_kernel_size(5), 5);
/// assert_eq!(blur_kernel_size(6), 7);
/// ```
pub fn blur_kernel_size(intensity: u32) -> u32 {
    intensity.max(1) | 1
}

/// Standard deviation of the Gaussian for a given odd kernel size.
///
/// Uses the usual kernel-derived sigma `0.3 * ((k - 1) / 2 - 1) + 0.8`, so a
/// 3x3 kernel gives 0.8 and the smallest kernel (1) gives 0.5.
pub fn kernel_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Gaussian sigma for a blur intensity (kernel size first, then sigma).
pub fn blur_sigma(intensity: u32) -> f32 {
    kernel_sigma(blur_kernel_size(intensity))
}

/// Scale `source` down to fit inside `viewport`, preserving aspect ratio.
///
/// Images that already fit are returned unchanged (never upscaled). Each
/// edge is at least 1 pixel, so extreme aspect ratios never collapse.
///
/// # Arguments
/// * `source` - Image dimensions (width, height)
/// * `viewport` - Bounding box (width, height)
///
/// # Returns
/// * `(width, height)` - Largest dimensions with the source aspect that fit
pub fn fit_within(source: (u32, u32), viewport: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = viewport;

    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // blur kernel tests
    // =========================================================================

    #[test]
    fn kernel_is_always_odd() {
        for intensity in 1..=50 {
            assert_eq!(blur_kernel_size(intensity) % 2, 1, "intensity {intensity}");
        }
    }

    #[test]
    fn kernel_rounds_even_up() {
        assert_eq!(blur_kernel_size(1), 1);
        assert_eq!(blur_kernel_size(2), 3);
        assert_eq!(blur_kernel_size(50), 51);
    }

    #[test]
    fn kernel_floor_is_one() {
        assert_eq!(blur_kernel_size(0), 1);
    }

    #[test]
    fn sigma_for_small_kernels() {
        assert!((kernel_sigma(1) - 0.5).abs() < 1e-6);
        assert!((kernel_sigma(3) - 0.8).abs() < 1e-6);
        assert!((kernel_sigma(5) - 1.1).abs() < 1e-6);
    }

    #[test]
    fn sigma_grows_with_intensity() {
        assert!(blur_sigma(25) > blur_sigma(5));
        assert!(blur_sigma(50) > blur_sigma(25));
    }

    // =========================================================================
    // fit_within tests
    // =========================================================================

    #[test]
    fn fit_leaves_small_images_alone() {
        assert_eq!(fit_within((200, 100), (900, 700)), (200, 100));
    }

    #[test]
    fn fit_landscape_limited_by_width() {
        // 1800x900 into 900x700 → scale 0.5
        assert_eq!(fit_within((1800, 900), (900, 700)), (900, 450));
    }

    #[test]
    fn fit_portrait_limited_by_height() {
        // 1000x2000 into 900x700 → scale 0.35
        assert_eq!(fit_within((1000, 2000), (900, 700)), (350, 700));
    }

    #[test]
    fn fit_keeps_at_least_one_pixel() {
        assert_eq!(fit_within((10000, 1), (100, 100)), (100, 1));
    }
}
