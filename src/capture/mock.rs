//! Mock capturer for testing
//!
//! `MockCapturer` stands in for the display provider wherever a real screen
//! is not available or not wanted: it returns a fixed raster on every grab,
//! can be told to fail, and counts how often it was asked.
//!
//! # Examples
//!
//! ```
//! use classroom_screenshot::capture::{Capturer, MockCapturer};
//!
//! let capturer = MockCapturer::solid(100, 80, [255, 0, 0]);
//! let img = capturer.grab().unwrap();
//! assert_eq!(img.dimensions(), (100, 80));
//! assert_eq!(capturer.grab_count(), 1);
//! ```
//!
//! ## With Error Injection
//!
//! ```
//! use classroom_screenshot::{
//!     capture::{Capturer, MockCapturer},
//!     error::CaptureError,
//! };
//!
//! let capturer = MockCapturer::new().with_error("screen locked");
//! let err = capturer.grab().unwrap_err();
//! assert!(matches!(err, CaptureError::CaptureUnavailable { .. }));
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Capturer, ImageBuffer};
use crate::error::{CaptureError, CaptureResult};

/// Deterministic capturer returning a fixed raster
#[derive(Debug)]
pub struct MockCapturer {
    /// Raster handed out on every grab
    image:           ImageBuffer,
    /// Reason for an injected `CaptureUnavailable`
    error_injection: Option<String>,
    /// Number of grab calls so far, failed ones included
    grabs:           AtomicUsize,
}

impl MockCapturer {
    /// Creates a mock returning a 2560x1440 test pattern
    pub fn new() -> Self {
        Self::with_image(ImageBuffer::from_test_pattern(2560, 1440))
    }

    /// Creates a mock returning a single-colour raster
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::with_image(ImageBuffer::solid(width, height, rgb))
    }

    /// Creates a mock returning `image`
    pub fn with_image(image: ImageBuffer) -> Self {
        Self {
            image,
            error_injection: None,
            grabs: AtomicUsize::new(0),
        }
    }

    /// Makes every grab fail with `CaptureUnavailable { reason }`
    pub fn with_error(mut self, reason: impl Into<String>) -> Self {
        self.error_injection = Some(reason.into());
        self
    }

    /// Number of times `grab` has been called
    pub fn grab_count(&self) -> usize {
        self.grabs.load(Ordering::SeqCst)
    }
}

impl Default for MockCapturer {
    fn default() -> Self {
        Self::new()
    }
}

impl Capturer for MockCapturer {
    fn grab(&self) -> CaptureResult<ImageBuffer> {
        self.grabs.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = &self.error_injection {
            return Err(CaptureError::CaptureUnavailable {
                reason: reason.clone(),
            });
        }

        Ok(self.image.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
