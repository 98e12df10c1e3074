//! Area-averaging resampler
//!
//! Each output pixel is the mean of the source pixels covered by its
//! footprint, weighted by the covered area. The whole source maps onto the
//! whole target, so the effective ratio per axis is `src / dst`, not the raw
//! scale factor. Downscaling acts as a box filter; upscaling degenerates to
//! pixel replication with a two-pixel blend at footprint borders.
//!
//! The filter is separable: area weights are products of per-axis overlaps,
//! so a horizontal pass followed by a vertical pass gives the same result as
//! the 2D sum.
//!
//! # Examples
//!
//! ```
//! use classroom_screenshot::{capture::ImageBuffer, util::scale::area_average};
//!
//! let img = ImageBuffer::solid(100, 80, [255, 0, 0]);
//! let half = area_average(&img, 0.5).unwrap();
//! assert_eq!(half.dimensions(), (50, 40));
//! assert_eq!(half.pixel(0, 0), [255, 0, 0]);
//! ```

use image::RgbImage;

use crate::{
    capture::ImageBuffer,
    error::{CaptureError, CaptureResult},
};

/// Contributions of source indices to one output index
type Taps = Vec<(usize, f64)>;

/// Largest target raster the scaler will allocate, in pixels (16384 x 16384)
pub const MAX_SCALED_PIXELS: u64 = 1 << 28;

/// Computes the floor-scaled target size for `(width, height)`
///
/// # Errors
///
/// [`CaptureError::InvalidScale`] if `scale` is not a finite number > 0, if
/// either dimension ends up outside `1..=u32::MAX`, or if the target holds
/// more than [`MAX_SCALED_PIXELS`] pixels.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> CaptureResult<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CaptureError::InvalidScale {
            scale,
            reason: "scale must be a finite number > 0".to_string(),
        });
    }

    let scaled = |len: u32| -> CaptureResult<u32> {
        let target = (len as f64 * scale).floor();
        if target < 1.0 {
            return Err(CaptureError::InvalidScale {
                scale,
                reason: format!("{len}px scales to zero pixels"),
            });
        }
        if target > u32::MAX as f64 {
            return Err(CaptureError::InvalidScale {
                scale,
                reason: format!("{len}px scales beyond {} pixels", u32::MAX),
            });
        }
        Ok(target as u32)
    };

    let (dst_w, dst_h) = (scaled(width)?, scaled(height)?);

    let too_large = (dst_w as u64)
        .checked_mul(dst_h as u64)
        .is_none_or(|pixels| pixels > MAX_SCALED_PIXELS);
    if too_large {
        return Err(CaptureError::InvalidScale {
            scale,
            reason: format!(
                "{width}x{height} scales to {dst_w}x{dst_h}, above the {MAX_SCALED_PIXELS} pixel limit"
            ),
        });
    }

    Ok((dst_w, dst_h))
}

/// Resamples `img` by `scale` using area averaging
///
/// A scale of exactly 1.0 returns an unchanged copy of the input.
///
/// # Errors
///
/// [`CaptureError::InvalidScale`], see [`scaled_dimensions`].
pub fn area_average(img: &ImageBuffer, scale: f64) -> CaptureResult<ImageBuffer> {
    if scale == 1.0 {
        return Ok(img.clone());
    }

    let (src_w, src_h) = img.dimensions();
    let (dst_w, dst_h) = scaled_dimensions(src_w, src_h, scale)?;
    tracing::debug!("Area-averaging {}x{} -> {}x{} (scale {})", src_w, src_h, dst_w, dst_h, scale);

    Ok(ImageBuffer::new(resample(img.inner(), dst_w, dst_h)))
}

/// Resamples `src` to exactly `dst_w` x `dst_h`
fn resample(src: &RgbImage, dst_w: u32, dst_h: u32) -> RgbImage {
    let (src_w, src_h) = src.dimensions();
    let (sw, sh) = (src_w as usize, src_h as usize);
    let (dw, dh) = (dst_w as usize, dst_h as usize);
    let x_taps = axis_taps(sw, dw);
    let y_taps = axis_taps(sh, dh);
    let raw = src.as_raw();

    // Horizontal pass: src_h rows of dst_w pixels
    let mut rows = vec![0f32; dw * sh * 3];
    for y in 0..sh {
        let src_row = &raw[y * sw * 3..(y + 1) * sw * 3];
        let out_row = &mut rows[y * dw * 3..(y + 1) * dw * 3];
        for (x, taps) in x_taps.iter().enumerate() {
            let mut acc = [0f64; 3];
            for &(sx, w) in taps {
                for c in 0..3 {
                    acc[c] += src_row[sx * 3 + c] as f64 * w;
                }
            }
            for c in 0..3 {
                out_row[x * 3 + c] = acc[c] as f32;
            }
        }
    }

    // Vertical pass
    let mut out = RgbImage::new(dst_w, dst_h);
    let out_raw: &mut [u8] = &mut out;
    for (y, taps) in y_taps.iter().enumerate() {
        let out_row = &mut out_raw[y * dw * 3..(y + 1) * dw * 3];
        for x in 0..dw {
            let mut acc = [0f64; 3];
            for &(sy, w) in taps {
                let px = &rows[(sy * dw + x) * 3..(sy * dw + x) * 3 + 3];
                for c in 0..3 {
                    acc[c] += px[c] as f64 * w;
                }
            }
            for c in 0..3 {
                out_row[x * 3 + c] = quantize(acc[c]);
            }
        }
    }

    out
}

/// Per-output-index source contributions along one axis
///
/// Output index `d` covers `[d * src / dst, (d + 1) * src / dst)` in source
/// coordinates. Weights are normalised to sum to 1.
fn axis_taps(src: usize, dst: usize) -> Vec<Taps> {
    let ratio = src as f64 / dst as f64;
    (0..dst)
        .map(|d| {
            let start = d as f64 * ratio;
            let end = ((d + 1) as f64 * ratio).min(src as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src);

            let mut taps: Taps = (first..last)
                .filter_map(|s| {
                    let overlap = end.min((s + 1) as f64) - start.max(s as f64);
                    (overlap > 0.0).then_some((s, overlap))
                })
                .collect();

            // Float rounding can leave a footprint with no overlap at the edge
            if taps.is_empty() {
                taps.push((first.min(src - 1), 1.0));
            }

            let total: f64 = taps.iter().map(|&(_, w)| w).sum();
            for tap in &mut taps {
                tap.1 /= total;
            }
            taps
        })
        .collect()
}

fn quantize(v: f64) -> u8 {
    (v + 0.5).floor().clamp(0.0, 255.0) as u8
}
