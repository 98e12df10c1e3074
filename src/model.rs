//! Data models and type definitions for classroom-screenshot
//!
//! This module defines the core types used throughout the pipeline:
//! - [`ImageFormat`]: the closed set of output formats
//! - [`CaptureConfig`]: format, quality and scale of a capture
//! - [`EncodedImage`]: the byte buffer handed back to the caller

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};

/// Output image format
///
/// The textual rendering is the canonical lowercase name, which doubles as
/// the file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Baseline JPEG, lossy
    Jpg,
    /// PNG, lossless
    Png,
}

impl ImageFormat {
    /// Every supported format, in declaration order
    pub const ALL: [ImageFormat; 2] = [ImageFormat::Jpg, ImageFormat::Png];

    /// Returns the format as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    /// File extension (without the dot) for this format
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Whether the `quality` setting affects the encoded output
    pub fn is_lossy(&self) -> bool {
        matches!(self, ImageFormat::Jpg)
    }

    /// Leading bytes every file of this format starts with
    pub fn magic(&self) -> &'static [u8] {
        match self {
            ImageFormat::Jpg => &[0xff, 0xd8, 0xff],
            ImageFormat::Png => &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = CaptureError;

    /// Parses a canonical format name, ignoring ASCII case
    ///
    /// ```
    /// use classroom_screenshot::model::ImageFormat;
    ///
    /// assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
    /// assert!("gif".parse::<ImageFormat>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CaptureError::UnknownFormat {
                name: s.to_string(),
            })
    }
}

/// Default output format
pub const DEFAULT_FORMAT: ImageFormat = ImageFormat::Jpg;
/// Default JPEG quality
pub const DEFAULT_QUALITY: f32 = 0.8;
/// Default linear scale factor
pub const DEFAULT_SCALE: f64 = 1.0;

/// Settings for a single capture
///
/// Values are stored verbatim; range checks happen when a capture runs, so a
/// config can be built up field by field without intermediate errors.
///
/// # Examples
///
/// ```
/// use classroom_screenshot::model::{CaptureConfig, ImageFormat};
///
/// let config = CaptureConfig::builder()
///     .format(ImageFormat::Png)
///     .scale(0.5)
///     .build();
/// assert_eq!(config.format, ImageFormat::Png);
/// assert_eq!(config.quality, 0.8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Output format
    pub format:  ImageFormat,
    /// JPEG quality in `[0.0, 1.0]`; 1.0 is best
    pub quality: f32,
    /// Linear scale factor, > 0
    pub scale:   f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            format:  DEFAULT_FORMAT,
            quality: DEFAULT_QUALITY,
            scale:   DEFAULT_SCALE,
        }
    }
}

impl CaptureConfig {
    /// Starts a builder seeded with the defaults
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::default()
    }

    /// Parses a JSON object; missing fields take their defaults
    ///
    /// ```
    /// use classroom_screenshot::model::{CaptureConfig, ImageFormat};
    ///
    /// let config = CaptureConfig::from_json_str(r#"{"format":"png","scale":0.25}"#).unwrap();
    /// assert_eq!(config.format, ImageFormat::Png);
    /// assert_eq!(config.scale, 0.25);
    /// assert_eq!(config.quality, 0.8);
    /// ```
    pub fn from_json_str(json: &str) -> CaptureResult<Self> {
        serde_json::from_str(json).map_err(|e| CaptureError::InvalidConfig(e.to_string()))
    }

    /// Reads and parses a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> CaptureResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!("Loaded capture config from {:?}: {:?}", path.as_ref(), config);
        Ok(config)
    }

    /// Checks quality and scale without touching a raster
    ///
    /// Quality is only checked for lossy formats. Dimension-dependent scale
    /// checks still happen in the scaler.
    pub fn validate(&self) -> CaptureResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(CaptureError::InvalidScale {
                scale:  self.scale,
                reason: "scale must be a finite number > 0".to_string(),
            });
        }
        if self.format.is_lossy() && !(0.0..=1.0).contains(&self.quality) {
            return Err(CaptureError::InvalidQuality {
                quality: self.quality,
            });
        }
        Ok(())
    }
}

/// Builder for [`CaptureConfig`]
#[derive(Debug, Clone, Default)]
pub struct CaptureConfigBuilder {
    config: CaptureConfig,
}

impl CaptureConfigBuilder {
    /// Sets the output format
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Sets the JPEG quality
    pub fn quality(mut self, quality: f32) -> Self {
        self.config.quality = quality;
        self
    }

    /// Sets the scale factor
    pub fn scale(mut self, scale: f64) -> Self {
        self.config.scale = scale;
        self
    }

    /// Finishes the builder
    pub fn build(self) -> CaptureConfig {
        self.config
    }
}

/// A complete encoded image file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// File bytes, magic number included
    pub bytes:  Vec<u8>,
    /// Format the bytes are encoded in
    pub format: ImageFormat,
    /// Width of the encoded raster
    pub width:  u32,
    /// Height of the encoded raster
    pub height: u32,
}

impl EncodedImage {
    /// Number of encoded bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when no bytes were produced
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consumes self and returns the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_as_str_and_display() {
        assert_eq!(ImageFormat::Jpg.as_str(), "jpg");
        assert_eq!(ImageFormat::Png.as_str(), "png");
        assert_eq!(format!("{}", ImageFormat::Jpg), "jpg");
        assert_eq!(ImageFormat::Png.extension(), "png");
    }

    #[test]
    fn test_format_parse_case_insensitive() {
        for name in ["jpg", "JPG", "Jpg"] {
            assert_eq!(name.parse::<ImageFormat>().unwrap(), ImageFormat::Jpg);
        }
        for name in ["png", "PNG", "pNg"] {
            assert_eq!(name.parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        }
    }

    #[test]
    fn test_format_parse_rejects_others() {
        for name in ["gif", "jpeg", "bmp", "", " png", "png "] {
            let err = name.parse::<ImageFormat>().unwrap_err();
            assert!(matches!(err, CaptureError::UnknownFormat { .. }), "{name}");
        }
    }

    #[test]
    fn test_format_display_round_trip() {
        for format in ImageFormat::ALL {
            assert_eq!(format.to_string().parse::<ImageFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_format_serialization() {
        assert_eq!(serde_json::to_string(&ImageFormat::Jpg).unwrap(), r#""jpg""#);
        assert_eq!(serde_json::from_str::<ImageFormat>(r#""png""#).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_lossy_flag() {
        assert!(ImageFormat::Jpg.is_lossy());
        assert!(!ImageFormat::Png.is_lossy());
    }

    #[test]
    fn test_config_defaults() {
        let config = CaptureConfig::default();
        assert_eq!(config.format, ImageFormat::Jpg);
        assert_eq!(config.quality, 0.8);
        assert_eq!(config.scale, 1.0);
    }

    #[test]
    fn test_config_builder() {
        let config = CaptureConfig::builder()
            .format(ImageFormat::Png)
            .quality(0.3)
            .scale(2.0)
            .build();

        assert_eq!(config.format, ImageFormat::Png);
        assert_eq!(config.quality, 0.3);
        assert_eq!(config.scale, 2.0);
    }

    #[test]
    fn test_config_from_json_defaults_missing_fields() {
        let config = CaptureConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CaptureConfig::default());
    }

    #[test]
    fn test_config_from_json_rejects_unknown_fields() {
        let err = CaptureConfig::from_json_str(r#"{"fromat":"png"}"#).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_from_json_rejects_unknown_format() {
        let err = CaptureConfig::from_json_str(r#"{"format":"gif"}"#).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = CaptureConfig::builder().format(ImageFormat::Png).scale(0.5).build();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CaptureConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_config_validate() {
        assert!(CaptureConfig::default().validate().is_ok());

        let bad_scale = CaptureConfig::builder().scale(0.0).build();
        assert!(matches!(bad_scale.validate(), Err(CaptureError::InvalidScale { .. })));

        let nan_scale = CaptureConfig::builder().scale(f64::NAN).build();
        assert!(matches!(nan_scale.validate(), Err(CaptureError::InvalidScale { .. })));

        let bad_quality = CaptureConfig::builder().quality(1.2).build();
        assert!(matches!(bad_quality.validate(), Err(CaptureError::InvalidQuality { .. })));

        // PNG ignores quality entirely
        let png = CaptureConfig::builder().format(ImageFormat::Png).quality(7.0).build();
        assert!(png.validate().is_ok());
    }

    #[test]
    fn test_encoded_image_accessors() {
        let encoded = EncodedImage {
            bytes:  vec![1, 2, 3],
            format: ImageFormat::Png,
            width:  1,
            height: 1,
        };
        assert_eq!(encoded.len(), 3);
        assert!(!encoded.is_empty());
        assert_eq!(encoded.into_bytes(), vec![1, 2, 3]);
    }
}
