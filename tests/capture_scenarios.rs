//! End-to-end capture scenarios driven by stub display providers
//!
//! Every test injects a `MockCapturer` (or a closure) so no display is
//! needed. File writes go to a recording writer or a temp directory.

#![cfg(all(feature = "png", feature = "jpeg"))]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use classroom_screenshot::{
    ScreenShot,
    capture::{Capturer, ImageBuffer, MockCapturer},
    error::{CaptureError, CaptureResult},
    model::{CaptureConfig, ImageFormat},
    util::file_writer::{FileWriter, FsFileWriter},
};
use image::{Rgb, RgbImage};

/// Records every write instead of touching the disk
#[derive(Default)]
struct RecordingWriter {
    writes: Mutex<Vec<PathBuf>>,
}

impl RecordingWriter {
    fn count(&self) -> usize {
        self.writes.lock().map(|w| w.len()).unwrap_or(0)
    }
}

impl FileWriter for RecordingWriter {
    fn write(&self, _bytes: &[u8], path: &Path) -> CaptureResult<()> {
        self.writes
            .lock()
            .map_err(|_| std::io::Error::other("poisoned"))?
            .push(path.to_path_buf());
        Ok(())
    }
}

fn red_capturer() -> Arc<MockCapturer> {
    Arc::new(MockCapturer::solid(100, 80, [255, 0, 0]))
}

fn red_shot() -> ScreenShot {
    ScreenShot::new().with_capturer(red_capturer())
}

/// High-frequency content, where JPEG quality changes the size the most
fn busy_capturer() -> Arc<MockCapturer> {
    Arc::new(MockCapturer::with_image(ImageBuffer::new(RgbImage::from_fn(100, 80, |x, y| {
        Rgb([((x * 37) ^ (y * 91)) as u8, (x * y) as u8, ((x + y) * 13) as u8])
    }))))
}

// ========== Scenarios ==========

#[test]
fn defaults_produce_jpeg_at_native_size() {
    let bytes = red_shot().capture().expect("capture should succeed");

    assert_eq!(&bytes[0..3], &[0xff, 0xd8, 0xff]);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 80));
}

#[test]
fn png_is_lossless() {
    let mut shot = red_shot();
    shot.set_format(ImageFormat::Png);
    shot.set_scale(1.0);

    let bytes = shot.capture().unwrap();
    assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4e, 0x47]);

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(&decoded, ImageBuffer::solid(100, 80, [255, 0, 0]).inner());
}

#[test]
fn downscale_halves_dimensions() {
    let mut shot = red_shot();
    shot.set_format(ImageFormat::Png);
    shot.set_scale(0.5);

    let bytes = shot.capture().unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (50, 40));
}

#[test]
fn low_quality_jpeg_is_smaller() {
    let shot = red_shot();

    let low = shot.capture_with(None, ImageFormat::Jpg, 0.05, 1.0).unwrap();
    let high = shot.capture_with(None, ImageFormat::Jpg, 0.95, 1.0).unwrap();
    assert!(low.len() < high.len(), "{} >= {}", low.len(), high.len());
}

#[test]
fn low_quality_jpeg_is_smaller_on_busy_content() {
    let shot = ScreenShot::new().with_capturer(busy_capturer());

    let low = shot.capture_with(None, ImageFormat::Jpg, 0.05, 1.0).unwrap();
    let high = shot.capture_with(None, ImageFormat::Jpg, 0.95, 1.0).unwrap();
    assert!(low.len() < high.len(), "{} >= {}", low.len(), high.len());
}

#[test]
fn bad_suffix_is_rejected_without_writing() {
    let writer = Arc::new(RecordingWriter::default());
    let shot = red_shot().with_file_writer(writer.clone());
    let bytes = shot.capture().unwrap();

    assert!(!shot.save(&bytes, "shot.bmp"));
    assert_eq!(writer.count(), 0);
}

#[test]
fn unknown_format_string_is_rejected() {
    let mut shot = red_shot();
    let before = shot.format();

    let err = shot.set_format_str("GIF").unwrap_err();
    assert!(matches!(err, CaptureError::UnknownFormat { .. }));
    assert_eq!(shot.format(), before);
}

// ========== Properties ==========

#[test]
fn unit_scale_keeps_stub_dimensions() {
    for format in ImageFormat::ALL {
        let encoded = red_shot().try_capture_with(None, format, 0.8, 1.0).unwrap();
        assert_eq!((encoded.width, encoded.height), (100, 80));
    }
}

#[test]
fn scaled_dimensions_are_floored() {
    let shot = red_shot();
    for scale in [0.1, 0.25, 0.33, 0.5, 0.77, 1.5, 2.0, 3.7, 10.0] {
        let encoded = shot.try_capture_with(None, ImageFormat::Png, 0.8, scale).unwrap();
        assert_eq!(encoded.width, (100.0 * scale).floor() as u32, "scale {scale}");
        assert_eq!(encoded.height, (80.0 * scale).floor() as u32, "scale {scale}");
    }
}

#[test]
fn png_round_trip_matches_scaler_output() {
    let raster = busy_capturer().grab().unwrap();
    let shot = ScreenShot::new().with_capturer(busy_capturer());

    for scale in [0.5, 0.8, 1.0, 1.25] {
        let expected = raster.scale(scale).unwrap();
        let encoded = shot.try_capture_with(None, ImageFormat::Png, 0.8, scale).unwrap();
        let decoded = image::load_from_memory(&encoded.bytes).unwrap().to_rgb8();
        assert_eq!(&decoded, expected.inner(), "scale {scale}");
    }
}

#[test]
fn best_quality_jpeg_stays_close() {
    let encoded = red_shot()
        .try_capture_with(None, ImageFormat::Jpg, 1.0, 1.0)
        .unwrap();
    let decoded = image::load_from_memory(&encoded.bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (100, 80));

    let total: u64 = decoded
        .as_raw()
        .iter()
        .zip(ImageBuffer::solid(100, 80, [255, 0, 0]).as_bytes())
        .map(|(&a, &b)| (a as i16 - b as i16).unsigned_abs() as u64)
        .sum();
    let mae = total as f64 / decoded.as_raw().len() as f64;
    assert!(mae <= 3.0, "mean absolute error {mae}");
}

#[test]
fn valid_suffix_accepts_only_format_names() {
    for name in ["shot.jpg", "shot.JPG", "shot.png", "shot.PNG", "shot.png.", "shot.jpg.."] {
        assert!(ScreenShot::valid_suffix(name), "{name}");
    }
    for name in ["shot.jpeg", "shot.gif", "shot.bmp", "shot.tiff", "shot", "shot.", "..."] {
        assert!(!ScreenShot::valid_suffix(name), "{name}");
    }
}

#[test]
fn format_names_round_trip_through_setter() {
    let mut shot = red_shot();
    for format in ImageFormat::ALL {
        shot.set_format_str(&format.to_string()).unwrap();
        assert_eq!(shot.format(), format);
    }
}

// ========== Failure handling ==========

#[test]
fn capture_failure_is_none_but_reason_is_typed() {
    let shot = ScreenShot::new()
        .with_capturer(Arc::new(MockCapturer::new().with_error("no display available")));

    assert!(shot.capture().is_none());
    let err = shot.try_capture().unwrap_err();
    assert!(matches!(err, CaptureError::CaptureUnavailable { ref reason } if reason.contains("no display")));
}

#[test]
fn zero_dimension_scale_is_invalid() {
    let shot = red_shot();
    let err = shot
        .try_capture_with(None, ImageFormat::Png, 0.8, 0.001)
        .unwrap_err();
    assert!(matches!(err, CaptureError::InvalidScale { .. }));
    assert!(shot.capture_with(None, ImageFormat::Png, 0.8, 0.001).is_none());
}

#[test]
fn huge_scale_is_rejected_before_allocating() {
    let shot = red_shot();

    assert!(shot.capture_with(None, ImageFormat::Png, 0.8, 4.0e7).is_none());
    let err = shot
        .try_capture_with(None, ImageFormat::Png, 0.8, 4.0e7)
        .unwrap_err();
    assert!(matches!(err, CaptureError::InvalidScale { scale, .. } if scale == 4.0e7));
}

#[test]
fn injected_closure_is_used_for_one_call() {
    let shot = red_shot();
    let stub = || -> CaptureResult<ImageBuffer> { Ok(ImageBuffer::solid(12, 10, [0, 255, 0])) };

    let encoded = shot
        .try_capture_with(Some(&stub), ImageFormat::Png, 0.8, 1.0)
        .unwrap();
    assert_eq!((encoded.width, encoded.height), (12, 10));

    // The instance capturer is untouched
    assert_eq!(shot.try_capture().unwrap().width, 100);
}

#[test]
fn each_capture_grabs_once() {
    let capturer = red_capturer();
    let shot = ScreenShot::new().with_capturer(capturer.clone());

    for _ in 0..3 {
        shot.capture().unwrap();
    }
    assert_eq!(capturer.grab_count(), 3);
}

// ========== Persistence and configuration ==========

#[test]
fn capture_and_save_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut shot = red_shot().with_file_writer(Arc::new(FsFileWriter::new()));
    shot.set_format(ImageFormat::Png);

    let bytes = shot.capture().unwrap();
    let path = dir.path().join("nested").join(shot.file_name("pupil"));
    assert!(shot.save(&bytes, &path));

    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(on_disk, bytes);
}

#[test]
fn config_file_drives_capture() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.json");
    std::fs::write(&path, r#"{"format":"png","scale":0.25}"#).unwrap();

    let config = CaptureConfig::from_json_file(&path).unwrap();
    let shot = ScreenShot::from_config(config).with_capturer(red_capturer());

    let encoded = shot.try_capture().unwrap();
    assert_eq!(encoded.format, ImageFormat::Png);
    assert_eq!((encoded.width, encoded.height), (25, 20));
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CaptureConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CaptureError::IoError(_)));
}

#[test]
fn facade_is_shareable_across_threads() {
    let shot = Arc::new(red_shot());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shot = Arc::clone(&shot);
            std::thread::spawn(move || shot.capture().map(|b| b.len()))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_some());
    }
}
