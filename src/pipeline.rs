//! Per-frame pipeline and the tick-driven frame loop.
//!
//! One tick: read a frame, infer, decode, suppress, annotate, flip, present.
//! The loop is single-threaded and cooperative: a tick never starts before
//! the previous one finished, so the model sees no concurrent forward
//! passes and no locking is needed. Per-tick failures are logged and the
//! next tick proceeds from scratch; only startup failures are fatal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::decode::{decode, DEFAULT_DETECTION_THRESHOLD};
use crate::detect::Model;
use crate::display::DisplaySink;
use crate::error::PipelineError;
use crate::frame::Frame;
use crate::ingest::FrameSource;
use crate::suppress::{
    suppress, Detection, DEFAULT_OVERLAP_THRESHOLD, DEFAULT_SCORE_THRESHOLD,
};

const HEALTH_LOG_EVERY: Duration = Duration::from_secs(10);

/// Pipeline thresholds.
#[derive(Clone, Copy, Debug)]
pub struct Thresholds {
    /// Minimum per-cell confidence during decode.
    pub detection: f32,
    /// Minimum confidence to enter NMS.
    pub score: f32,
    /// IoU at or above which a box is suppressed.
    pub overlap: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            detection: DEFAULT_DETECTION_THRESHOLD,
            score: DEFAULT_SCORE_THRESHOLD,
            overlap: DEFAULT_OVERLAP_THRESHOLD,
        }
    }
}

/// The per-frame transform chain around one long-lived `Model`.
pub struct Pipeline {
    model: Model,
    thresholds: Thresholds,
}

impl Pipeline {
    pub fn new(model: Model, thresholds: Thresholds) -> Self {
        Self { model, thresholds }
    }

    /// Detect, suppress, and annotate one frame in place. Returns the kept
    /// detections. Geometry always derives from this frame's dimensions.
    pub fn process(&mut self, frame: &mut Frame) -> Result<Vec<Detection>, PipelineError> {
        let layers = self.model.infer(frame)?;
        let candidates = decode(
            &layers,
            frame.width(),
            frame.height(),
            self.thresholds.detection,
        );
        let detections = suppress(candidates, self.thresholds.score, self.thresholds.overlap);
        crate::annotate::annotate(
            frame,
            &detections,
            self.model.classes(),
            self.model.palette(),
        );
        Ok(detections)
    }
}

/// Outcome of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Camera had nothing ready; nothing was presented.
    Skipped,
    /// A frame went through the full pipeline; carries the detection count.
    Presented(usize),
}

/// Loop counters, reported in the periodic health line.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoopStats {
    pub ticks: u64,
    pub presented: u64,
    pub skipped: u64,
    pub failed: u64,
    pub detections: u64,
}

/// Fixed-cadence frame loop: camera in, display sink out.
pub struct FrameLoop<S: FrameSource, D: DisplaySink> {
    source: S,
    sink: D,
    pipeline: Pipeline,
    interval: Duration,
    stats: LoopStats,
}

impl<S: FrameSource, D: DisplaySink> FrameLoop<S, D> {
    pub fn new(source: S, sink: D, pipeline: Pipeline, fps: u32) -> Self {
        Self {
            source,
            sink,
            pipeline,
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            stats: LoopStats::default(),
        }
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Run exactly one tick. Errors are returned so `run` can log and keep
    /// going; no state carries over into the next tick either way.
    pub fn run_once(&mut self) -> anyhow::Result<Tick> {
        self.stats.ticks += 1;

        let Some(mut frame) = self.source.read_frame()? else {
            self.stats.skipped += 1;
            log::trace!("no frame ready, skipping tick");
            return Ok(Tick::Skipped);
        };

        let detections = self.pipeline.process(&mut frame)?;

        // Capture rows are inverted relative to the display texture.
        frame.flip_vertical();
        self.sink.present(&frame)?;

        self.stats.presented += 1;
        self.stats.detections += detections.len() as u64;
        Ok(Tick::Presented(detections.len()))
    }

    /// Tick at the fixed cadence until `shutdown` is set. Per-tick errors
    /// are logged at warn and never stop the loop.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        let mut last_health = Instant::now();
        while !shutdown.load(Ordering::SeqCst) {
            let tick_started = Instant::now();

            if let Err(e) = self.run_once() {
                self.stats.failed += 1;
                log::warn!("tick failed: {e:#}");
            }

            if last_health.elapsed() >= HEALTH_LOG_EVERY {
                let s = self.stats;
                log::info!(
                    "loop health: ticks={} presented={} skipped={} failed={} detections={}",
                    s.ticks,
                    s.presented,
                    s.skipped,
                    s.failed,
                    s.detections
                );
                last_health = Instant::now();
            }

            if let Some(remaining) = self.interval.checked_sub(tick_started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
        log::info!(
            "loop stopped after {} ticks ({} presented)",
            self.stats.ticks,
            self.stats.presented
        );
    }
}
