//! Display adapter.
//!
//! The store never draws anything. Whoever owns a store and wants the user to
//! see the current image hands it to a [`Display`] after each change. The
//! display scales the image to fit its viewport and presents it however it
//! can; it never reports back, so a broken display cannot fail an edit.
//!
//! [`PreviewRenderer`] is the display the CLI uses: it writes the fitted
//! image to a PNG file that an external viewer can keep open.

use crate::buffer::ImageBuffer;
use crate::imaging::calculations::fit_within;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Something that can show an image to the user.
pub trait Display {
    /// Present `buffer`. Failures are handled (logged) by the display itself.
    fn render(&mut self, buffer: &ImageBuffer);
}

/// Scale `image` down to fit `viewport`, keeping its aspect ratio.
///
/// Images that already fit are returned unscaled.
pub fn fit_image(image: &DynamicImage, viewport: (u32, u32)) -> DynamicImage {
    let source = (image.width(), image.height());
    let (width, height) = fit_within(source, viewport);
    if (width, height) == source {
        image.clone()
    } else {
        image.resize_exact(width, height, FilterType::Lanczos3)
    }
}

/// Writes a viewport-sized PNG preview of every rendered image.
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    path: PathBuf,
    viewport: (u32, u32),
    last_rendered: Option<(u32, u32)>,
}

impl PreviewRenderer {
    pub fn new(path: impl Into<PathBuf>, viewport: (u32, u32)) -> Self {
        Self {
            path: path.into(),
            viewport,
            last_rendered: None,
        }
    }

    /// Size of the last preview successfully written.
    pub fn last_rendered(&self) -> Option<(u32, u32)> {
        self.last_rendered
    }

    /// Write the preview for `buffer` to `path`, returning the preview size.
    ///
    /// Unlike [`Display::render`], errors are returned to the caller. Used
    /// for explicit one-off previews.
    pub fn write_to(
        &self,
        buffer: &ImageBuffer,
        path: &Path,
    ) -> Result<(u32, u32), image::ImageError> {
        let fitted = fit_image(buffer.as_image(), self.viewport);
        fitted.save_with_format(path, ImageFormat::Png)?;
        Ok((fitted.width(), fitted.height()))
    }
}

impl Display for PreviewRenderer {
    fn render(&mut self, buffer: &ImageBuffer) {
        match self.write_to(buffer, &self.path) {
            Ok(size) => {
                debug!(path = %self.path.display(), width = size.0, height = size.1, "preview written");
                self.last_rendered = Some(size);
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "preview failed");
            }
        }
    }
}
