//! overlay-kernel
//!
//! Real-time video annotation kernel. On a fixed cadence, `overlayd` pulls
//! a frame from a camera source, runs a detection network over it, decodes
//! the raw output into pixel-space candidates, suppresses duplicates with
//! greedy NMS, draws the survivors with per-class colors and labels, flips
//! the buffer into display orientation, and hands it to a display sink.
//!
//! # Module structure
//!
//! - `frame`: the BGR frame buffer
//! - `detect`: model loading and detector backends
//! - `decode` / `suppress`: the algorithmic core (raw output to candidates,
//!   candidates to kept detections)
//! - `annotate`: box and label drawing, deterministic class palette
//! - `ingest` / `display`: camera sources and presentation sinks
//! - `pipeline`: the per-frame transform chain and the tick loop
//!
//! The model is loaded once per process and dropped once at shutdown; after
//! startup succeeds, no pipeline error terminates the process - the loop
//! favors availability over correctness on every single frame.

pub mod annotate;
pub mod config;
pub mod decode;
pub mod detect;
pub mod display;
pub mod error;
pub mod frame;
pub mod ingest;
pub mod pipeline;
pub mod suppress;

pub use annotate::{annotate, class_palette};
pub use config::OverlaydConfig;
pub use decode::{decode, BoundingBox, Candidate};
pub use detect::{DetectorBackend, Model, ModelPaths, OutputLayer, RawDetection, StubBackend};
pub use display::{ConsoleSink, DisplaySink, SnapshotSink};
pub use error::PipelineError;
pub use frame::{Bgr, Frame};
pub use ingest::{Camera, CameraConfig, FrameSource};
pub use pipeline::{FrameLoop, LoopStats, Pipeline, Thresholds, Tick};
pub use suppress::{iou, suppress, Detection};
