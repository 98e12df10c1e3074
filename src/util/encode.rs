//! Image encoding utilities for screenshot capture
//!
//! This module serializes an [`ImageBuffer`] into a complete PNG or JPEG
//! file held in memory. Nothing here touches the filesystem: the caller gets
//! the bytes and decides whether to send, hash or persist them.
//!
//! # Format Support
//!
//! - **PNG**: Lossless, default compression, adaptive filtering. Quality is
//!   ignored.
//! - **JPEG**: Baseline, lossy. Quality is a fraction in `[0.0, 1.0]` mapped
//!   onto the codec's 1-100 scale.
//!
//! Each codec sits behind a cargo feature of the same name (`png`, `jpeg`).
//! Requesting a format whose feature is off yields
//! [`CaptureError::EncoderUnavailable`].
//!
//! # Examples
//!
//! ```
//! use classroom_screenshot::{
//!     capture::ImageBuffer,
//!     model::ImageFormat,
//!     util::encode::encode_image,
//! };
//!
//! let img = ImageBuffer::from_test_pattern(320, 200);
//! let encoded = encode_image(&img, ImageFormat::Png, 0.8).unwrap();
//! assert!(encoded.bytes.starts_with(ImageFormat::Png.magic()));
//! ```

#[cfg(any(feature = "png", feature = "jpeg"))]
use std::io::Cursor;

#[cfg(any(feature = "png", feature = "jpeg"))]
use image::ImageEncoder;
#[cfg(feature = "jpeg")]
use image::codecs::jpeg::JpegEncoder;
#[cfg(feature = "png")]
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::{
    capture::ImageBuffer,
    error::{CaptureError, CaptureResult},
    model::{EncodedImage, ImageFormat},
};

/// Maps a quality fraction onto the JPEG codec's 1-100 scale
///
/// 1.0 maps to 100 (best), 0.0 to 1 (smallest file).
///
/// # Errors
///
/// [`CaptureError::InvalidQuality`] if `quality` is NaN or outside
/// `[0.0, 1.0]`. Out-of-range values are never clamped.
///
/// # Examples
///
/// ```
/// use classroom_screenshot::util::encode::jpeg_quality_from_fraction;
///
/// assert_eq!(jpeg_quality_from_fraction(0.8).unwrap(), 80);
/// assert_eq!(jpeg_quality_from_fraction(0.0).unwrap(), 1);
/// assert!(jpeg_quality_from_fraction(1.5).is_err());
/// ```
pub fn jpeg_quality_from_fraction(quality: f32) -> CaptureResult<u8> {
    if !(0.0..=1.0).contains(&quality) {
        return Err(CaptureError::InvalidQuality { quality });
    }
    Ok(((quality * 100.0).round() as u8).max(1))
}

fn check_dimensions(buffer: &ImageBuffer, format: ImageFormat) -> CaptureResult<()> {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Err(CaptureError::EncodingFailed {
            format,
            reason: format!("image dimensions must be > 0, got {width}x{height}"),
        });
    }
    Ok(())
}

/// Encodes an image as PNG with default compression
///
/// # Examples
///
/// ```
/// use classroom_screenshot::{capture::ImageBuffer, util::encode::encode_png};
///
/// let img = ImageBuffer::from_test_pattern(100, 100);
/// let png_bytes = encode_png(&img).unwrap();
/// assert_eq!(&png_bytes[0..4], &[0x89, b'P', b'N', b'G']);
/// ```
#[cfg(feature = "png")]
pub fn encode_png(buffer: &ImageBuffer) -> CaptureResult<Vec<u8>> {
    check_dimensions(buffer, ImageFormat::Png)?;

    let mut output = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        Cursor::new(&mut output),
        CompressionType::Default,
        FilterType::Adaptive,
    );

    let (width, height) = buffer.dimensions();
    encoder
        .write_image(buffer.as_bytes(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| CaptureError::EncodingFailed {
            format: ImageFormat::Png,
            reason: e.to_string(),
        })?;

    Ok(output)
}

/// PNG support is compiled out
#[cfg(not(feature = "png"))]
pub fn encode_png(_buffer: &ImageBuffer) -> CaptureResult<Vec<u8>> {
    Err(CaptureError::EncoderUnavailable {
        format: ImageFormat::Png,
    })
}

/// Encodes an image as baseline JPEG
///
/// # Arguments
///
/// * `buffer` - The image to encode
/// * `quality` - Fraction in `[0.0, 1.0]`; 1.0 is highest quality
///
/// # Examples
///
/// ```
/// use classroom_screenshot::{capture::ImageBuffer, util::encode::encode_jpeg};
///
/// let img = ImageBuffer::from_test_pattern(100, 100);
/// let jpeg = encode_jpeg(&img, 0.8).unwrap();
/// assert_eq!(&jpeg[0..3], &[0xff, 0xd8, 0xff]);
/// ```
#[cfg(feature = "jpeg")]
pub fn encode_jpeg(buffer: &ImageBuffer, quality: f32) -> CaptureResult<Vec<u8>> {
    let codec_quality = jpeg_quality_from_fraction(quality)?;
    check_dimensions(buffer, ImageFormat::Jpg)?;

    let mut output = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut output), codec_quality);

    let (width, height) = buffer.dimensions();
    encoder
        .write_image(buffer.as_bytes(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| CaptureError::EncodingFailed {
            format: ImageFormat::Jpg,
            reason: e.to_string(),
        })?;

    Ok(output)
}

/// JPEG support is compiled out
#[cfg(not(feature = "jpeg"))]
pub fn encode_jpeg(_buffer: &ImageBuffer, _quality: f32) -> CaptureResult<Vec<u8>> {
    Err(CaptureError::EncoderUnavailable {
        format: ImageFormat::Jpg,
    })
}

/// Encodes an image in the requested format
///
/// `quality` is only consulted for JPEG; PNG ignores it, including its
/// range.
pub fn encode_image(
    buffer: &ImageBuffer,
    format: ImageFormat,
    quality: f32,
) -> CaptureResult<EncodedImage> {
    let bytes = match format {
        ImageFormat::Png => encode_png(buffer)?,
        ImageFormat::Jpg => encode_jpeg(buffer, quality)?,
    };

    let (width, height) = buffer.dimensions();
    tracing::debug!("Encoded {}x{} as {} ({} bytes)", width, height, format, bytes.len());

    Ok(EncodedImage {
        bytes,
        format,
        width,
        height,
    })
}
