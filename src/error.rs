//! Error types for screenshot capture operations
//!
//! This module defines the error taxonomy of the capture pipeline together
//! with short remediation hints. Capture-time errors are normally swallowed at
//! the [`ScreenShot::capture`](crate::screenshot::ScreenShot::capture)
//! boundary and logged, so the hint is what ends up in the log line.

use crate::model::ImageFormat;

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Error type for the capture → scale → encode pipeline
///
/// Each variant provides a remediation hint through the
/// `remediation_hint()` method.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The platform refused the screen grab or no display is available
    #[error("Screen capture unavailable: {reason}")]
    CaptureUnavailable {
        /// Why the display provider could not produce a raster
        reason: String,
    },

    /// Scale factor is not usable
    #[error("Invalid scale {scale}: {reason}")]
    InvalidScale {
        /// The rejected scale factor
        scale:  f64,
        /// Reason why it's invalid
        reason: String,
    },

    /// JPEG quality outside `[0.0, 1.0]`
    #[error("Invalid quality {quality}: must be within 0.0..=1.0")]
    InvalidQuality {
        /// The rejected quality value
        quality: f32,
    },

    /// No codec compiled in for the requested format
    #[error("No encoder available for {format}")]
    EncoderUnavailable {
        /// Format without a codec
        format: ImageFormat,
    },

    /// Image encoding failed
    #[error("Failed to encode image as {format}: {reason}")]
    EncodingFailed {
        /// Image format that failed
        format: ImageFormat,
        /// Reason for encoding failure
        reason: String,
    },

    /// Textual format name does not match any [`ImageFormat`]
    #[error("Unknown image format '{name}'")]
    UnknownFormat {
        /// The name that failed to parse
        name: String,
    },

    /// File name extension is not a supported format
    #[error("Suffix '{suffix}' is not a supported image format")]
    BadSuffix {
        /// The offending extension (without the dot)
        suffix: String,
    },

    /// Configuration could not be parsed
    #[error("Invalid capture configuration: {0}")]
    InvalidConfig(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CaptureError {
    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use classroom_screenshot::error::CaptureError;
    ///
    /// let error = CaptureError::BadSuffix {
    ///     suffix: "bmp".to_string(),
    /// };
    /// assert!(error.remediation_hint().contains(".jpg"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::CaptureUnavailable { .. } => {
                "Ensure a graphical session is running (DISPLAY or WAYLAND_DISPLAY set) and that \
                 the process has screen recording permission."
            }
            CaptureError::InvalidScale { .. } => {
                "Scale must be a finite number > 0 that keeps both dimensions at least 1 pixel."
            }
            CaptureError::InvalidQuality { .. } => "Quality must be between 0.0 and 1.0.",
            CaptureError::EncoderUnavailable { format } => match format {
                ImageFormat::Jpg => "Rebuild with the 'jpeg' feature enabled or use PNG.",
                ImageFormat::Png => "Rebuild with the 'png' feature enabled or use JPEG.",
            },
            CaptureError::EncodingFailed { format, .. } => match format {
                ImageFormat::Jpg => {
                    "JPEG encoding failed. Try a lower scale or switch to PNG format."
                }
                ImageFormat::Png => "PNG encoding failed. Try a lower scale or switch to JPEG.",
            },
            CaptureError::UnknownFormat { .. } => "Supported formats are 'jpg' and 'png'.",
            CaptureError::BadSuffix { .. } => {
                "Use a file name ending in .jpg or .png (case-insensitive)."
            }
            CaptureError::InvalidConfig(_) => {
                "Check the configuration JSON: fields are format (\"jpg\"|\"png\"), quality and \
                 scale."
            }
            CaptureError::IoError(_) => {
                "An I/O error occurred. Check file permissions, disk space, and system resources."
            }
        }
    }
}
