//! Display sinks.
//!
//! The pipeline's only GUI obligation is "accept an annotated BGR buffer
//! and present it". Presentation here is headless: a console sink that logs
//! what it was handed, and a snapshot sink that keeps the latest annotated
//! frame on disk as a JPEG. The frame loop flips the buffer vertically
//! before handoff; sinks receive display-oriented rows.

mod console;
mod snapshot;

pub use console::ConsoleSink;
pub use snapshot::SnapshotSink;

use anyhow::Result;

use crate::frame::Frame;

/// Anything that can present an annotated frame.
pub trait DisplaySink {
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

impl DisplaySink for Box<dyn DisplaySink> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        (**self).present(frame)
    }
}
