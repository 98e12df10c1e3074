//! Raster image wrapper for screenshot data
//!
//! This module provides an `ImageBuffer` wrapper around `image::RgbImage`:
//! 24-bit RGB, row-major, top-down. Any alpha channel is composited against
//! opaque black when a buffer is built, so everything downstream of the
//! capturer can assume three channels.
//!
//! # Examples
//!
//! ```
//! use classroom_screenshot::capture::ImageBuffer;
//!
//! let img = ImageBuffer::from_test_pattern(1920, 1080);
//!
//! // Area-average down to 50%
//! let scaled = img.scale(0.5).unwrap();
//! assert_eq!(scaled.dimensions(), (960, 540));
//! ```

use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

use crate::{error::CaptureResult, util::scale::area_average};

/// Wrapper around `image::RgbImage` with the transformations the pipeline
/// needs
///
/// All transformation methods return new `ImageBuffer` instances, leaving
/// the source buffer unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    inner: RgbImage,
}

impl ImageBuffer {
    /// Creates a new ImageBuffer from an RGB image
    pub fn new(image: RgbImage) -> Self {
        Self { inner: image }
    }

    /// Creates an ImageBuffer from any decoded image
    ///
    /// Images with an alpha channel are composited against opaque black.
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{DynamicImage, Rgba, RgbaImage};
    /// use classroom_screenshot::capture::ImageBuffer;
    ///
    /// let half_white = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 128]));
    /// let img = ImageBuffer::from_dynamic(DynamicImage::ImageRgba8(half_white));
    /// assert_eq!(img.pixel(0, 0), [128, 128, 128]);
    /// ```
    pub fn from_dynamic(image: DynamicImage) -> Self {
        if image.color().has_alpha() {
            Self::from_rgba(&image.to_rgba8())
        } else {
            Self::new(image.to_rgb8())
        }
    }

    /// Composites an RGBA image against opaque black
    pub fn from_rgba(rgba: &RgbaImage) -> Self {
        let img = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            Rgb([over_black(r, a), over_black(g, a), over_black(b, a)])
        });
        Self::new(img)
    }

    /// Creates a single-colour raster
    ///
    /// ```
    /// use classroom_screenshot::capture::ImageBuffer;
    ///
    /// let red = ImageBuffer::solid(100, 80, [255, 0, 0]);
    /// assert_eq!(red.dimensions(), (100, 80));
    /// assert_eq!(red.pixel(99, 79), [255, 0, 0]);
    /// ```
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::new(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    /// Creates a test pattern image with the specified dimensions
    ///
    /// The pattern is a vertical gradient from blue (top) to cyan (bottom),
    /// handy wherever a real capture backend is not available.
    pub fn from_test_pattern(width: u32, height: u32) -> Self {
        let img = RgbImage::from_fn(width, height, |_x, y| {
            let ratio = y as f32 / height.max(1) as f32;
            Rgb([0, (255.0 * ratio) as u8, 255])
        });
        Self::new(img)
    }

    /// Scales the image by the given factor using area averaging
    ///
    /// A factor of exactly 1.0 returns an identical copy. See
    /// [`area_average`] for the error cases.
    pub fn scale(&self, factor: f64) -> CaptureResult<Self> {
        area_average(self, factor)
    }

    /// Returns the dimensions of the image as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Returns the image width in pixels
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Returns the image height in pixels
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Returns the RGB value at `(x, y)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.inner.get_pixel(x, y).0
    }

    /// Returns the raw RGB bytes, three per pixel
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_raw()
    }

    /// Returns a reference to the inner RgbImage
    pub fn inner(&self) -> &RgbImage {
        &self.inner
    }

    /// Consumes self and returns the inner RgbImage
    pub fn into_inner(self) -> RgbImage {
        self.inner
    }
}

/// `c` over black with coverage `a`, rounded
fn over_black(c: u8, a: u8) -> u8 {
    ((c as u16 * a as u16 + 127) / 255) as u8
}
