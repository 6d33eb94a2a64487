use anyhow::Result;

use crate::detect::output::OutputLayer;
use crate::frame::Frame;

/// Detector backend trait.
///
/// A backend wraps one loaded network and exposes a single forward-pass
/// call. Backends own no pipeline state beyond the network itself: they
/// must not retain frames, and every call derives its output from the frame
/// it was given.
///
/// `infer` takes `&mut self` because inference engines are not guaranteed
/// safe for concurrent forward passes; the frame loop serializes ticks, so
/// no locking is needed on top.
pub trait DetectorBackend: Send {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Fixed square network input size in pixels.
    fn input_size(&self) -> u32;

    /// Run a forward pass, returning one raw batch per output layer.
    fn infer(&mut self, frame: &Frame) -> Result<Vec<OutputLayer>>;
}
