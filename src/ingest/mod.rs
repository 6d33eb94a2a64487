//! Frame sources.
//!
//! A source hands the frame loop at most one `Frame` per read. "Nothing
//! ready yet" is a normal outcome (`Ok(None)`), not an error: sources pace
//! themselves to their configured rate and the loop simply skips the tick.
//!
//! Built-in backends: a paced synthetic generator (`stub://` devices) and a
//! local still-image source for development against a real picture.

mod camera;

pub use camera::{Camera, CameraConfig, CameraStats};

use anyhow::Result;

use crate::frame::Frame;

/// Anything the frame loop can pull frames from.
pub trait FrameSource {
    /// Next frame, or `None` when the source has nothing ready.
    /// Transient unavailability is expected and non-fatal.
    fn read_frame(&mut self) -> Result<Option<Frame>>;
}
