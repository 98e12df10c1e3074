//! File persistence for encoded screenshots
//!
//! The capture core never opens files itself; persistence goes through the
//! [`FileWriter`] seam so callers can redirect writes (or record them in
//! tests). [`FsFileWriter`] is the plain filesystem implementation.
//!
//! # Examples
//!
//! ```
//! use classroom_screenshot::util::file_writer::{FileWriter, FsFileWriter};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("shots/example.png");
//!
//! FsFileWriter::new().write(&[1, 2, 3], &path).unwrap();
//! assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
//! ```

use std::{fs, path::Path};

use crate::error::CaptureResult;

/// Destination for encoded image bytes
pub trait FileWriter: Send + Sync {
    /// Writes `bytes` to `path`, replacing any existing file
    fn write(&self, bytes: &[u8], path: &Path) -> CaptureResult<()>;
}

/// Writes to the local filesystem, creating parent directories as needed
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileWriter;

impl FsFileWriter {
    /// Creates a new filesystem writer
    pub fn new() -> Self {
        Self
    }
}

impl FileWriter for FsFileWriter {
    fn write(&self, bytes: &[u8], path: &Path) -> CaptureResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, bytes)?;
        tracing::debug!("Wrote {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }
}
