use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::display::DisplaySink;
use crate::frame::Frame;

/// Snapshot "display": keeps the latest presented frame on disk as a JPEG.
///
/// Writes go to a sibling temp file first and land with an atomic rename,
/// so a reader never sees a half-written image.
pub struct SnapshotSink {
    path: PathBuf,
}

impl SnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DisplaySink for SnapshotSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        // JPEG wants RGB; the pipeline buffer is BGR.
        let mut rgb = Vec::with_capacity(frame.as_bytes().len());
        for bgr in frame.as_bytes().chunks_exact(3) {
            rgb.extend_from_slice(&[bgr[2], bgr[1], bgr[0]]);
        }

        let mut encoded = Vec::new();
        JpegEncoder::new(&mut encoded)
            .encode(&rgb, frame.width(), frame.height(), ExtendedColorType::Rgb8)
            .context("failed to encode snapshot JPEG")?;

        let tmp = self.path.with_extension("jpg.tmp");
        fs::write(&tmp, &encoded)
            .with_context(|| format!("failed to write snapshot {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to move snapshot into {}", self.path.display()))?;
        Ok(())
    }
}
