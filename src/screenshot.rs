//! Screenshot façade
//!
//! [`ScreenShot`] binds a [`CaptureConfig`] to a display provider and a file
//! writer and runs the pipeline capture → scale → encode.
//!
//! Two error postures live side by side:
//!
//! - `try_capture*` return a typed [`CaptureResult`].
//! - `capture*` are best-effort: failures are logged and turned into `None`,
//!   so a dropped frame never takes down a long-running monitor loop.
//!
//! Configuration errors on the other hand are loud: `set_format_str` returns
//! [`CaptureError::UnknownFormat`] to the caller.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use classroom_screenshot::{
//!     capture::MockCapturer,
//!     model::ImageFormat,
//!     screenshot::ScreenShot,
//! };
//!
//! let mut shot =
//!     ScreenShot::new().with_capturer(Arc::new(MockCapturer::solid(100, 80, [255, 0, 0])));
//! shot.set_format(ImageFormat::Png);
//! shot.set_scale(0.5);
//!
//! let bytes = shot.capture().unwrap();
//! assert!(bytes.starts_with(ImageFormat::Png.magic()));
//! ```

use std::{fmt, path::Path, sync::Arc};

use chrono::Utc;

use crate::{
    capture::{Capturer, default_capturer},
    error::{CaptureError, CaptureResult},
    model::{CaptureConfig, EncodedImage, ImageFormat},
    util::{
        encode::encode_image,
        file_writer::{FileWriter, FsFileWriter},
    },
};

/// One-shot screen capture with per-instance defaults
///
/// Each instance owns its configuration; there is no shared global state.
/// `capture` takes `&self` and works on a copy of the configuration taken
/// when it starts, while setters need `&mut self`.
pub struct ScreenShot {
    config:   CaptureConfig,
    capturer: Arc<dyn Capturer>,
    writer:   Arc<dyn FileWriter>,
}

impl ScreenShot {
    /// Creates a façade with default settings (JPEG, 0.8, 1.0), the platform
    /// display capturer and the filesystem writer
    pub fn new() -> Self {
        Self::from_config(CaptureConfig::default())
    }

    /// Creates a façade with the given settings
    pub fn from_config(config: CaptureConfig) -> Self {
        Self {
            config,
            capturer: default_capturer(),
            writer: Arc::new(FsFileWriter::new()),
        }
    }

    /// Replaces the default display provider
    pub fn with_capturer(mut self, capturer: Arc<dyn Capturer>) -> Self {
        self.capturer = capturer;
        self
    }

    /// Replaces the default file writer
    pub fn with_file_writer(mut self, writer: Arc<dyn FileWriter>) -> Self {
        self.writer = writer;
        self
    }

    // ========== Accessors ==========

    /// Current settings
    pub fn config(&self) -> CaptureConfig {
        self.config
    }

    /// Output format
    pub fn format(&self) -> ImageFormat {
        self.config.format
    }

    /// JPEG quality
    pub fn quality(&self) -> f32 {
        self.config.quality
    }

    /// Scale factor
    pub fn scale(&self) -> f64 {
        self.config.scale
    }

    /// Sets the output format
    pub fn set_format(&mut self, format: ImageFormat) {
        self.config.format = format;
    }

    /// Sets the output format from its name, ignoring case
    ///
    /// # Errors
    ///
    /// [`CaptureError::UnknownFormat`] if `name` is not `jpg` or `png`. The
    /// current format is left unchanged.
    pub fn set_format_str(&mut self, name: &str) -> CaptureResult<()> {
        self.config.format = name.parse()?;
        Ok(())
    }

    /// Stores the JPEG quality verbatim; range checks happen at capture time
    pub fn set_quality(&mut self, quality: f32) {
        self.config.quality = quality;
    }

    /// Stores the scale factor verbatim; range checks happen at capture time
    pub fn set_scale(&mut self, scale: f64) {
        self.config.scale = scale;
    }

    /// Replaces all settings at once
    pub fn set_config(&mut self, config: CaptureConfig) {
        self.config = config;
    }

    // ========== Capture ==========

    /// Captures with the configured settings, returning `None` on failure
    pub fn capture(&self) -> Option<Vec<u8>> {
        let config = self.config;
        self.capture_with(None, config.format, config.quality, config.scale)
    }

    /// Captures with explicit settings, returning `None` on failure
    ///
    /// `capturer` overrides the instance's display provider for this call.
    /// The failure reason is logged at warn level.
    pub fn capture_with(
        &self,
        capturer: Option<&dyn Capturer>,
        format: ImageFormat,
        quality: f32,
        scale: f64,
    ) -> Option<Vec<u8>> {
        match self.try_capture_with(capturer, format, quality, scale) {
            Ok(encoded) => Some(encoded.into_bytes()),
            Err(e) => {
                tracing::warn!("Failed to make a screenshot: {} ({})", e, e.remediation_hint());
                None
            }
        }
    }

    /// Captures with the configured settings
    pub fn try_capture(&self) -> CaptureResult<EncodedImage> {
        let config = self.config;
        self.try_capture_with(None, config.format, config.quality, config.scale)
    }

    /// Runs capture → scale → encode with explicit settings
    ///
    /// # Errors
    ///
    /// - [`CaptureError::CaptureUnavailable`] - the display provider failed
    /// - [`CaptureError::InvalidScale`] - unusable scale for this raster
    /// - [`CaptureError::InvalidQuality`] - JPEG quality outside `[0, 1]`
    /// - [`CaptureError::EncoderUnavailable`] /
    ///   [`CaptureError::EncodingFailed`] - codec problems
    pub fn try_capture_with(
        &self,
        capturer: Option<&dyn Capturer>,
        format: ImageFormat,
        quality: f32,
        scale: f64,
    ) -> CaptureResult<EncodedImage> {
        let capturer = capturer.unwrap_or(&*self.capturer);
        tracing::debug!(
            "Capturing via {} capturer (format={}, quality={}, scale={})",
            capturer.name(),
            format,
            quality,
            scale
        );

        let raster = capturer.grab()?;
        let scaled = raster.scale(scale)?;
        let encoded = encode_image(&scaled, format, quality)?;

        tracing::info!(
            "Captured {}x{} screenshot as {} ({} bytes)",
            encoded.width,
            encoded.height,
            encoded.format,
            encoded.len()
        );
        Ok(encoded)
    }

    // ========== Persistence ==========

    /// Writes `bytes` to `path` if its suffix names a supported format
    ///
    /// Returns `true` only when the suffix is valid and the writer succeeds.
    /// No write is attempted for a bad suffix. The bytes are not inspected.
    pub fn save(&self, bytes: &[u8], path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_save(bytes, path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save screenshot to {:?}: {}", path, e);
                false
            }
        }
    }

    /// Typed variant of [`save`](Self::save)
    pub fn try_save(&self, bytes: &[u8], path: impl AsRef<Path>) -> CaptureResult<()> {
        let path = path.as_ref();
        Self::check_suffix(&path.to_string_lossy())?;
        self.writer.write(bytes, path)?;
        tracing::info!("Saved screenshot ({} bytes) to {:?}", bytes.len(), path);
        Ok(())
    }

    /// True if the last non-empty `.`-separated segment of `file_name` is a
    /// format name, ignoring case
    ///
    /// ```
    /// use classroom_screenshot::screenshot::ScreenShot;
    ///
    /// assert!(ScreenShot::valid_suffix("shots/pupil-07.JPG"));
    /// assert!(!ScreenShot::valid_suffix("shot.bmp"));
    /// ```
    pub fn valid_suffix(file_name: &str) -> bool {
        Self::check_suffix(file_name).is_ok()
    }

    /// Returns the format named by the suffix of `file_name`
    ///
    /// # Errors
    ///
    /// [`CaptureError::BadSuffix`] if the suffix is not a format name.
    pub fn check_suffix(file_name: &str) -> CaptureResult<ImageFormat> {
        // Trailing dots do not form an empty suffix
        let trimmed = file_name.trim_end_matches('.');
        let suffix = trimmed.rsplit('.').next().unwrap_or(trimmed);
        suffix
            .to_uppercase()
            .parse()
            .map_err(|_| CaptureError::BadSuffix {
                suffix: suffix.to_string(),
            })
    }

    /// Builds `{prefix}-{timestamp}.{ext}` for the configured format
    ///
    /// The timestamp is UTC RFC 3339 with `:`, `+` and `.` replaced so the
    /// only dot left is the one before the extension.
    pub fn file_name(&self, prefix: &str) -> String {
        let timestamp: String = Utc::now()
            .to_rfc3339()
            .chars()
            .map(|c| match c {
                ':' => '-',
                '+' | '.' => '_',
                _ => c,
            })
            .collect();

        format!("{}-{}.{}", prefix, timestamp, self.config.format.extension())
    }
}

impl Default for ScreenShot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScreenShot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenShot")
            .field("config", &self.config)
            .field("capturer", &self.capturer.name())
            .finish_non_exhaustive()
    }
}
