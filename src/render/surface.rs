use image::RgbImage;

use crate::foundation::core::{ImageSize, Rgb8};
use crate::foundation::math::blend_rgb;

/// Mutable RGB8 buffer that mesh and skeleton are composited into.
///
/// Each pipeline invocation allocates its own surface from the source frame and consumes it into
/// the output image; surfaces are never shared between frames.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSurface {
    image: RgbImage,
}

impl RenderSurface {
    /// Copy the source frame into a new surface. The frame itself is never written.
    pub fn from_frame(frame: &RgbImage) -> Self {
        Self {
            image: frame.clone(),
        }
    }

    /// A surface filled with one color.
    pub fn filled(size: ImageSize, color: Rgb8) -> Self {
        Self {
            image: RgbImage::from_pixel(size.width, size.height, image::Rgb(color.to_array())),
        }
    }

    /// Surface dimensions.
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.image.width(), self.image.height())
    }

    /// Read one pixel. Panics when out of bounds, like [`RgbImage::get_pixel`].
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Overwrite one pixel; coordinates outside the surface are ignored.
    pub fn put_clipped(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if !self.size().contains(x, y) {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, image::Rgb(color));
    }

    /// Alpha-composite `color` onto one pixel; coordinates outside the surface are ignored.
    pub fn blend_clipped(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f64) {
        if !self.size().contains(x, y) {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        px.0 = blend_rgb(color, px.0, alpha);
    }

    /// Borrow the pixels.
    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Consume the surface into the final image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Tightly packed, row-major RGB8 bytes.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
