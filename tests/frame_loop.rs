use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use overlay_kernel::{
    DisplaySink, Frame, FrameLoop, FrameSource, Model, Pipeline, RawDetection, StubBackend,
    Thresholds, Tick,
};

/// Camera fake: replays a fixed sequence of reads, then stays not-ready.
struct ScriptedSource {
    reads: Vec<Option<Frame>>,
    cursor: usize,
}

impl ScriptedSource {
    fn new(reads: Vec<Option<Frame>>) -> Self {
        Self { reads, cursor: 0 }
    }
}

impl FrameSource for ScriptedSource {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let read = self.reads.get(self.cursor).cloned().flatten();
        self.cursor += 1;
        Ok(read)
    }
}

/// Display fake: records every presented frame.
#[derive(Clone, Default)]
struct CaptureSink {
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl DisplaySink for CaptureSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.frames.borrow_mut().push(frame.clone());
        Ok(())
    }
}

fn cell(cx: f32, cy: f32, w: f32, h: f32, score: f32) -> RawDetection {
    RawDetection {
        cx,
        cy,
        w,
        h,
        scores: vec![score],
    }
}

fn pipeline_with(batches: Vec<Vec<Vec<RawDetection>>>) -> Pipeline {
    let model = Model::with_backend(
        Box::new(StubBackend::scripted(batches)),
        vec!["person".to_string()],
    );
    Pipeline::new(model, Thresholds::default())
}

#[test]
fn not_ready_camera_skips_the_tick_and_the_next_one_proceeds() {
    let frame = Frame::filled(100, 100, [0, 0, 0]);
    let source = ScriptedSource::new(vec![None, Some(frame)]);
    let sink = CaptureSink::default();
    let frames = sink.frames.clone();
    let pipeline = pipeline_with(vec![vec![], vec![]]);
    let mut frame_loop = FrameLoop::new(source, sink, pipeline, 30);

    assert_eq!(frame_loop.run_once().unwrap(), Tick::Skipped);
    assert!(frames.borrow().is_empty());

    assert_eq!(frame_loop.run_once().unwrap(), Tick::Presented(0));
    assert_eq!(frames.borrow().len(), 1);

    let stats = frame_loop.stats();
    assert_eq!(stats.ticks, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.presented, 1);
}

#[test]
fn presented_frame_is_vertically_flipped() {
    // Distinctive top row so the flip is observable.
    let mut frame = Frame::filled(4, 3, [0, 0, 0]);
    for x in 0..4 {
        frame.put_pixel(x, 0, [9, 9, 9]);
    }
    let source = ScriptedSource::new(vec![Some(frame)]);
    let sink = CaptureSink::default();
    let frames = sink.frames.clone();
    // No detections: presented bytes are exactly the flipped input.
    let pipeline = pipeline_with(vec![vec![]]);
    let mut frame_loop = FrameLoop::new(source, sink, pipeline, 30);

    assert_eq!(frame_loop.run_once().unwrap(), Tick::Presented(0));
    let presented = &frames.borrow()[0];
    assert_eq!(presented.pixel(0, 2), Some([9, 9, 9]));
    assert_eq!(presented.pixel(0, 0), Some([0, 0, 0]));
}

#[test]
fn overlapping_candidates_present_one_detection() {
    let frame = Frame::filled(100, 100, [0, 0, 0]);
    // Two cells for the same region: (10,10,20,20)@0.9 and (11,11,20,20)@0.7.
    let batch = vec![vec![
        cell(0.20, 0.20, 0.2, 0.2, 0.9),
        cell(0.21, 0.21, 0.2, 0.2, 0.7),
    ]];
    let source = ScriptedSource::new(vec![Some(frame)]);
    let sink = CaptureSink::default();
    let frames = sink.frames.clone();
    let pipeline = pipeline_with(vec![batch]);
    let mut frame_loop = FrameLoop::new(source, sink, pipeline, 30);

    assert_eq!(frame_loop.run_once().unwrap(), Tick::Presented(1));
    // The survivor's box was drawn: the frame is no longer all-black.
    let presented = &frames.borrow()[0];
    assert!(presented.as_bytes().iter().any(|&b| b != 0));
}

#[test]
fn inference_failure_skips_the_tick_without_presenting() {
    let model = Model::with_backend(Box::new(StubBackend::failing()), vec!["person".to_string()]);
    let pipeline = Pipeline::new(model, Thresholds::default());
    let frame = Frame::filled(32, 32, [0, 0, 0]);
    let source = ScriptedSource::new(vec![Some(frame.clone()), Some(frame)]);
    let sink = CaptureSink::default();
    let frames = sink.frames.clone();
    let mut frame_loop = FrameLoop::new(source, sink, pipeline, 30);

    assert!(frame_loop.run_once().is_err());
    assert!(frames.borrow().is_empty());
    // The loop boundary logs and continues: the next tick runs from scratch.
    assert!(frame_loop.run_once().is_err());
    assert_eq!(frame_loop.stats().ticks, 2);
}

#[test]
fn exhausted_source_keeps_skipping_without_errors() {
    let source = ScriptedSource::new(vec![]);
    let sink = CaptureSink::default();
    let pipeline = pipeline_with(vec![]);
    let mut frame_loop = FrameLoop::new(source, sink, pipeline, 30);
    for _ in 0..5 {
        assert_eq!(frame_loop.run_once().unwrap(), Tick::Skipped);
    }
    assert_eq!(frame_loop.stats().skipped, 5);
}
