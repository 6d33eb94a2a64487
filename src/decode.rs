//! Raw-output decoding.
//!
//! Turns the network's per-cell output into pixel-space candidates for the
//! current frame. Pure: geometry always comes from the dimensions passed in
//! on this call, never from a previous frame.

use crate::detect::{OutputLayer, RawDetection};

/// Detection threshold applied during decode. Matches the network's
/// per-cell confidence cutoff.
pub const DEFAULT_DETECTION_THRESHOLD: f32 = 0.3;

/// Axis-aligned box in pixel coordinates, top-left origin.
/// `x`/`y` can go negative when a box center sits near the frame edge;
/// drawing clips later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// A decoded, unfiltered detection.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_id: usize,
}

/// Decode raw output layers into candidates for a frame of the given size.
///
/// Per cell: the arg-max class of the score vector wins and its score is
/// the confidence; cells at or below `threshold` are dropped. Geometry is
/// denormalized against the frame dimensions and truncated toward zero,
/// with the top-left corner at center - size/2.
pub fn decode(
    layers: &[OutputLayer],
    frame_width: u32,
    frame_height: u32,
    threshold: f32,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for layer in layers {
        for cell in layer {
            if let Some(candidate) = decode_cell(cell, frame_width, frame_height, threshold) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

fn decode_cell(
    cell: &RawDetection,
    frame_width: u32,
    frame_height: u32,
    threshold: f32,
) -> Option<Candidate> {
    let (class_id, confidence) = arg_max(&cell.scores)?;
    if confidence <= threshold {
        return None;
    }
    let center_x = (cell.cx * frame_width as f32) as i32;
    let center_y = (cell.cy * frame_height as f32) as i32;
    let w = (cell.w * frame_width as f32) as i32;
    let h = (cell.h * frame_height as f32) as i32;
    Some(Candidate {
        bbox: BoundingBox {
            x: center_x - w / 2,
            y: center_y - h / 2,
            w,
            h,
        },
        confidence,
        class_id,
    })
}

/// Index and value of the strictly greatest score. Earlier index wins ties,
/// keeping candidate generation deterministic. Empty vectors yield `None`.
fn arg_max(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        match best {
            Some((_, value)) if score <= value => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}
