//! Confidence filtering and greedy non-maximum suppression.
//!
//! Suppression runs over the flat candidate list with no per-class
//! partitioning: two overlapping boxes suppress each other even when their
//! classes differ. Boxes and scores reach NMS as one flat list with no
//! class attached. A per-class variant would change observable output and
//! is deliberately not used.

use crate::decode::{BoundingBox, Candidate};

/// Minimum confidence for a candidate to enter suppression.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;
/// IoU at or above which the lower-confidence box is suppressed.
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.4;

/// A candidate that survived thresholding and NMS.
#[derive(Clone, Debug)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_id: usize,
}

impl From<Candidate> for Detection {
    fn from(candidate: Candidate) -> Self {
        Self {
            bbox: candidate.bbox,
            confidence: candidate.confidence,
            class_id: candidate.class_id,
        }
    }
}

/// Intersection-over-Union of two axis-aligned boxes.
///
/// Symmetric; identical boxes give 1.0; an empty union gives 0.0.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let ix = overlap(a.x, a.w, b.x, b.w);
    let iy = overlap(a.y, a.h, b.y, b.h);
    let intersection = ix as f32 * iy as f32;
    let area_a = a.w.max(0) as f32 * a.h.max(0) as f32;
    let area_b = b.w.max(0) as f32 * b.h.max(0) as f32;
    let union = area_a + area_b - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}

fn overlap(start_a: i32, len_a: i32, start_b: i32, len_b: i32) -> i32 {
    let lo = start_a.max(start_b);
    let hi = (start_a + len_a.max(0)).min(start_b + len_b.max(0));
    (hi - lo).max(0)
}

/// Greedy NMS over all candidates, regardless of class.
///
/// Candidates below `score_threshold` are dropped, the rest are
/// stable-sorted by confidence descending (ties keep input order, so the
/// result is deterministic for a fixed candidate order), then the best
/// remaining box is kept and everything overlapping it at
/// `overlap_threshold` or more is removed, until none remain.
pub fn suppress(
    candidates: Vec<Candidate>,
    score_threshold: f32,
    overlap_threshold: f32,
) -> Vec<Detection> {
    let mut scored: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| c.confidence >= score_threshold)
        .collect();
    scored.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    'candidates: for candidate in scored {
        for survivor in &kept {
            if iou(&candidate.bbox, &survivor.bbox) >= overlap_threshold {
                continue 'candidates;
            }
        }
        kept.push(candidate.into());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: i32, y: i32, w: i32, h: i32) -> BoundingBox {
        BoundingBox { x, y, w, h }
    }

    fn candidate(x: i32, y: i32, w: i32, h: i32, confidence: f32, class_id: usize) -> Candidate {
        Candidate {
            bbox: bbox(x, y, w, h),
            confidence,
            class_id,
        }
    }

    #[test]
    fn iou_identical_boxes_is_one() {
        let a = bbox(10, 10, 20, 20);
        assert_eq!(iou(&a, &a), 1.0);
    }

    #[test]
    fn iou_is_symmetric() {
        let a = bbox(10, 10, 20, 20);
        let b = bbox(15, 18, 30, 10);
        assert_eq!(iou(&a, &b), iou(&b, &a));
        assert!(iou(&a, &b) > 0.0);
    }

    #[test]
    fn iou_disjoint_boxes_is_zero() {
        let a = bbox(0, 0, 10, 10);
        let b = bbox(100, 100, 10, 10);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn iou_half_overlap() {
        // 10x10 boxes sharing a 5x10 strip: 50 / (100 + 100 - 50).
        let a = bbox(0, 0, 10, 10);
        let b = bbox(5, 0, 10, 10);
        assert!((iou(&a, &b) - 50.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn iou_degenerate_boxes_is_zero() {
        let a = bbox(0, 0, 0, 0);
        let b = bbox(0, 0, -5, 10);
        assert_eq!(iou(&a, &a), 0.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(suppress(vec![], 0.5, 0.4).is_empty());
    }

    #[test]
    fn single_candidate_above_threshold_is_kept() {
        let kept = suppress(vec![candidate(10, 10, 20, 20, 0.9, 0)], 0.5, 0.4);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bbox, bbox(10, 10, 20, 20));
        assert_eq!(kept[0].confidence, 0.9);
        assert_eq!(kept[0].class_id, 0);
    }

    #[test]
    fn below_score_threshold_is_dropped() {
        assert!(suppress(vec![candidate(10, 10, 20, 20, 0.49, 0)], 0.5, 0.4).is_empty());
        // At the threshold is kept.
        assert_eq!(
            suppress(vec![candidate(10, 10, 20, 20, 0.5, 0)], 0.5, 0.4).len(),
            1
        );
    }

    #[test]
    fn overlapping_pair_keeps_only_the_stronger() {
        let kept = suppress(
            vec![
                candidate(10, 10, 20, 20, 0.9, 0),
                candidate(11, 11, 20, 20, 0.7, 0),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn input_order_does_not_change_the_winner() {
        let kept = suppress(
            vec![
                candidate(11, 11, 20, 20, 0.7, 0),
                candidate(10, 10, 20, 20, 0.9, 0),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn suppression_ignores_class_identity() {
        // Same region, different classes: still only one survivor.
        let kept = suppress(
            vec![
                candidate(10, 10, 20, 20, 0.9, 0),
                candidate(11, 11, 20, 20, 0.8, 5),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].class_id, 0);
    }

    #[test]
    fn distant_boxes_all_survive() {
        let kept = suppress(
            vec![
                candidate(0, 0, 10, 10, 0.9, 0),
                candidate(50, 50, 10, 10, 0.8, 1),
                candidate(200, 200, 10, 10, 0.6, 0),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 3);
        // Output stays sorted by confidence descending.
        assert_eq!(kept[0].confidence, 0.9);
        assert_eq!(kept[2].confidence, 0.6);
    }

    #[test]
    fn survivors_never_overlap_at_threshold() {
        let candidates: Vec<Candidate> = (0..20)
            .map(|i| candidate(i * 4, i * 3, 30, 30, 0.5 + (i as f32) * 0.02, i as usize % 3))
            .collect();
        let count = candidates.len();
        let kept = suppress(candidates, 0.5, 0.4);
        assert!(kept.len() <= count);
        for (i, a) in kept.iter().enumerate() {
            for b in kept.iter().skip(i + 1) {
                assert!(iou(&a.bbox, &b.bbox) < 0.4);
            }
        }
    }

    #[test]
    fn equal_confidence_ties_keep_input_order() {
        let kept = suppress(
            vec![
                candidate(10, 10, 20, 20, 0.8, 1),
                candidate(11, 11, 20, 20, 0.8, 2),
            ],
            0.5,
            0.4,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].class_id, 1);
    }
}
