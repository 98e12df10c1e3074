//! Primary display capture using xcap
//!
//! xcap talks to X11/Wayland on Linux, GDI/DXGI on Windows and
//! CoreGraphics on macOS. Frames arrive as RGBA and are composited against
//! black before they leave this module.
//!
//! Without the `display` feature the capturer still exists but every grab
//! fails with [`CaptureError::CaptureUnavailable`].

use super::{Capturer, ImageBuffer};
use crate::error::{CaptureError, CaptureResult};

/// Grabs the primary monitor at native resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayCapturer;

impl DisplayCapturer {
    /// Creates a new display capturer
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "display")]
impl Capturer for DisplayCapturer {
    fn grab(&self) -> CaptureResult<ImageBuffer> {
        let monitors = xcap::Monitor::all().map_err(|e| {
            tracing::error!("xcap failed to enumerate monitors: {}", e);
            map_xcap_error(e)
        })?;

        // Fall back to the first monitor when none reports as primary
        let index = monitors
            .iter()
            .position(|m| m.is_primary().unwrap_or(false))
            .unwrap_or(0);
        let monitor = monitors.get(index).ok_or_else(|| {
            tracing::error!("No monitors available for capture");
            CaptureError::CaptureUnavailable {
                reason: "no display available".to_string(),
            }
        })?;

        let frame = monitor.capture_image().map_err(|e| {
            tracing::error!("xcap monitor capture failed: {}", e);
            map_xcap_error(e)
        })?;
        let (width, height) = (frame.width(), frame.height());
        tracing::debug!("Captured primary display: {}x{}", width, height);

        let rgba = image::RgbaImage::from_raw(width, height, frame.into_raw()).ok_or_else(|| {
            CaptureError::CaptureUnavailable {
                reason: format!("display returned a truncated {width}x{height} frame"),
            }
        })?;

        Ok(ImageBuffer::from_rgba(&rgba))
    }

    fn name(&self) -> &str {
        "display"
    }
}

#[cfg(not(feature = "display"))]
impl Capturer for DisplayCapturer {
    fn grab(&self) -> CaptureResult<ImageBuffer> {
        Err(CaptureError::CaptureUnavailable {
            reason: "built without the 'display' feature".to_string(),
        })
    }

    fn name(&self) -> &str {
        "display"
    }
}

/// Maps xcap errors to `CaptureUnavailable`, keeping the xcap message
#[cfg(feature = "display")]
fn map_xcap_error(e: impl std::fmt::Display) -> CaptureError {
    let reason = e.to_string();
    let lower = reason.to_lowercase();

    if lower.contains("permission denied") || lower.contains("access denied") {
        tracing::warn!("Screen capture permission denied");
    } else if lower.contains("display") || lower.contains("connection") {
        tracing::warn!("Failed to connect to the display server - verify DISPLAY is set");
    }

    CaptureError::CaptureUnavailable { reason }
}
