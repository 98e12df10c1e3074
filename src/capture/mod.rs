//! Display capture abstractions
//!
//! This module provides:
//!
//! - `ImageBuffer`: a 24-bit RGB raster with area-averaging scaling
//! - `Capturer`: the display-provider seam the pipeline grabs rasters from
//! - `DisplayCapturer`: the platform default, backed by xcap
//! - `MockCapturer`: a deterministic stand-in for tests

use std::sync::Arc;

use crate::error::CaptureResult;

pub mod display;
pub mod image_buffer;
pub mod mock;

pub use display::DisplayCapturer;
pub use image_buffer::ImageBuffer;
pub use mock::MockCapturer;

/// Source of full-screen rasters
///
/// A grab is a single blocking call that returns the primary display at its
/// native resolution. Implementations must be thread-safe (`Send + Sync`) so
/// one capturer can be shared between façades through an `Arc`.
///
/// Any `Fn() -> CaptureResult<ImageBuffer>` closure is a `Capturer`, which
/// keeps ad-hoc stubs short:
///
/// ```
/// use classroom_screenshot::{
///     capture::{Capturer, ImageBuffer},
///     error::CaptureResult,
/// };
///
/// let stub = || -> CaptureResult<ImageBuffer> { Ok(ImageBuffer::solid(100, 80, [255, 0, 0])) };
/// assert_eq!(stub.grab().unwrap().dimensions(), (100, 80));
/// ```
///
/// # Errors
///
/// [`CaptureError::CaptureUnavailable`](crate::error::CaptureError::CaptureUnavailable)
/// when the platform denies screen access or no display is present.
pub trait Capturer: Send + Sync {
    /// Grabs the primary display
    fn grab(&self) -> CaptureResult<ImageBuffer>;

    /// Short name used in log lines
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Capturer for F
where
    F: Fn() -> CaptureResult<ImageBuffer> + Send + Sync,
{
    fn grab(&self) -> CaptureResult<ImageBuffer> {
        self()
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Creates the platform default capturer
pub fn default_capturer() -> Arc<dyn Capturer> {
    Arc::new(DisplayCapturer::new())
}
