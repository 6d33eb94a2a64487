#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::detect::backend::DetectorBackend;
use crate::detect::output::{OutputLayer, RawDetection};
use crate::frame::Frame;

const INPUT_SIZE: u32 = 320;

/// Tract-based backend for ONNX detection models.
///
/// Input handling is fixed and deterministic: the frame is resized straight
/// to 320x320 (nearest neighbor, no letterbox), channel order stays BGR,
/// pixel values are scaled by 1/255 with zero mean subtraction.
///
/// Output tensors are read as rows of `4 + 1 + num_classes` floats: box
/// geometry (cx, cy, w, h, normalized), an objectness column that decode
/// ignores, then the per-class score vector.
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>>,
    num_classes: usize,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P, num_classes: usize) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
                ),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self { model, num_classes })
    }

    fn build_input(&self, frame: &Frame) -> Result<Tensor> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(anyhow!("cannot infer on an empty frame"));
        }
        let side = INPUT_SIZE as usize;
        let src_w = frame.width() as i64;
        let src_h = frame.height() as i64;
        let input =
            tract_ndarray::Array4::from_shape_fn((1, 3, side, side), |(_, channel, y, x)| {
                let src_x = (x as i64 * src_w) / side as i64;
                let src_y = (y as i64 * src_h) / side as i64;
                // pixel() cannot miss here; src coordinates stay in range.
                let bgr = frame.pixel(src_x, src_y).unwrap_or_default();
                bgr[channel] as f32 / 255.0
            });
        Ok(input.into_tensor())
    }

    fn parse_layer(&self, tensor: &Tensor) -> Result<OutputLayer> {
        let values = tensor
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        let row_len = 5 + self.num_classes;
        let flat: Vec<f32> = values.iter().copied().collect();
        if !flat.len().is_multiple_of(row_len) {
            return Err(anyhow!(
                "output length {} is not a multiple of row length {}",
                flat.len(),
                row_len
            ));
        }
        let mut layer = Vec::with_capacity(flat.len() / row_len);
        for row in flat.chunks_exact(row_len) {
            layer.push(RawDetection {
                cx: row[0],
                cy: row[1],
                w: row[2],
                h: row[3],
                scores: row[5..].to_vec(),
            });
        }
        Ok(layer)
    }
}

impl DetectorBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn input_size(&self) -> u32 {
        INPUT_SIZE
    }

    fn infer(&mut self, frame: &Frame) -> Result<Vec<OutputLayer>> {
        let input = self.build_input(frame)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        outputs
            .iter()
            .map(|tensor| self.parse_layer(tensor))
            .collect()
    }
}
