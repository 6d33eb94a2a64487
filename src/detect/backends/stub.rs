use anyhow::{anyhow, Result};

use crate::detect::backend::DetectorBackend;
use crate::detect::output::{OutputLayer, RawDetection};
use crate::frame::Frame;

const STUB_INPUT_SIZE: u32 = 320;

/// Stub backend for tests and `stub://` demo runs.
///
/// In sweep mode it emits one high-confidence box that drifts across the
/// frame from call to call, cycling through the class list, so a demo run
/// shows a moving annotated box without any model files. Scripted mode
/// replays canned output batches; failing mode errors on every call.
pub struct StubBackend {
    mode: Mode,
    calls: u64,
    num_classes: usize,
}

enum Mode {
    Sweep,
    Scripted(Vec<Vec<OutputLayer>>),
    Failing,
}

impl StubBackend {
    /// Deterministic moving-box generator.
    pub fn new(num_classes: usize) -> Self {
        Self {
            mode: Mode::Sweep,
            calls: 0,
            num_classes: num_classes.max(1),
        }
    }

    /// Replay one canned output batch per call, then empty batches.
    pub fn scripted(batches: Vec<Vec<OutputLayer>>) -> Self {
        Self {
            mode: Mode::Scripted(batches),
            calls: 0,
            num_classes: 1,
        }
    }

    /// Fail every forward pass. Exercises the skip-tick path.
    pub fn failing() -> Self {
        Self {
            mode: Mode::Failing,
            calls: 0,
            num_classes: 1,
        }
    }

    fn sweep_cell(&self) -> RawDetection {
        // Box center walks the diagonal in 1% steps, wrapping.
        let step = (self.calls % 100) as f32 / 100.0;
        let class_id = (self.calls as usize) % self.num_classes;
        let mut scores = vec![0.0; self.num_classes];
        scores[class_id] = 0.9;
        RawDetection {
            cx: 0.1 + 0.8 * step,
            cy: 0.1 + 0.8 * step,
            w: 0.2,
            h: 0.2,
            scores,
        }
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn input_size(&self) -> u32 {
        STUB_INPUT_SIZE
    }

    fn infer(&mut self, _frame: &Frame) -> Result<Vec<OutputLayer>> {
        let call = self.calls;
        self.calls += 1;
        match &self.mode {
            Mode::Sweep => Ok(vec![vec![self.sweep_cell()]]),
            Mode::Scripted(batches) => Ok(batches
                .get(call as usize)
                .cloned()
                .unwrap_or_default()),
            Mode::Failing => Err(anyhow!("stub backend configured to fail")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_is_deterministic_across_instances() {
        let frame = Frame::filled(8, 8, [0, 0, 0]);
        let mut a = StubBackend::new(3);
        let mut b = StubBackend::new(3);
        for _ in 0..5 {
            let la = a.infer(&frame).unwrap();
            let lb = b.infer(&frame).unwrap();
            assert_eq!(la.len(), lb.len());
            assert_eq!(la[0][0].cx, lb[0][0].cx);
            assert_eq!(la[0][0].scores, lb[0][0].scores);
        }
    }

    #[test]
    fn scripted_replays_then_goes_quiet() {
        let cell = RawDetection {
            cx: 0.5,
            cy: 0.5,
            w: 0.1,
            h: 0.1,
            scores: vec![0.8],
        };
        let mut backend = StubBackend::scripted(vec![vec![vec![cell]]]);
        let frame = Frame::filled(8, 8, [0, 0, 0]);
        assert_eq!(backend.infer(&frame).unwrap().len(), 1);
        assert!(backend.infer(&frame).unwrap().is_empty());
    }

    #[test]
    fn failing_backend_errors() {
        let frame = Frame::filled(8, 8, [0, 0, 0]);
        assert!(StubBackend::failing().infer(&frame).is_err());
    }
}
