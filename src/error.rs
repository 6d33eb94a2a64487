//! Pipeline error taxonomy.
//!
//! Two failure classes exist after the split into startup and steady state:
//!
//! - `ModelLoad`: the model files are missing or malformed. Fatal; `overlayd`
//!   reports it and exits. Never retried.
//! - `Inference`: a forward pass failed on one frame. Recoverable; the frame
//!   loop logs it and skips the current tick.
//!
//! A camera with no frame ready is not an error at all: `Camera::read_frame`
//! returns `Ok(None)` and the tick is skipped silently.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Model weights, network config, or class-names file could not be
    /// loaded. Raised once, at startup.
    #[error("failed to load model from {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    /// Forward pass failed on the current frame.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl PipelineError {
    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_load_message_names_the_path() {
        let err = PipelineError::model_load("/models/net.weights", "no such file");
        assert_eq!(
            err.to_string(),
            "failed to load model from /models/net.weights: no such file"
        );
        assert!(matches!(err, PipelineError::ModelLoad { .. }));
    }

    #[test]
    fn inference_message_carries_the_cause() {
        let err = PipelineError::Inference("tensor shape mismatch".to_string());
        assert_eq!(err.to_string(), "inference failed: tensor shape mismatch");
    }
}
