//! Frame annotation.
//!
//! Draws surviving detections onto the frame in place: a rectangle outline
//! per box and the uppercased class name above its top-left corner, both in
//! the class's color. Detections are drawn in suppressor output order, so a
//! later (lower-confidence) box that overlaps an earlier one paints over
//! it. Nothing outside the outlines and label glyphs is touched.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::frame::{Bgr, Frame};
use crate::suppress::Detection;

/// Outline thickness in pixels, drawn inward from the box bounds.
const LINE_WIDTH: i64 = 2;
/// Gap between the box's top edge and the label baseline.
const LABEL_OFFSET: i64 = 5;

const GLYPH_WIDTH: i64 = 8;
const GLYPH_HEIGHT: i64 = 12;

/// Deterministic per-class display colors.
///
/// Each class index seeds its own RNG, so the palette for a given class
/// list is identical across runs and independent of draw order or any
/// global RNG state.
pub fn class_palette(count: usize) -> Vec<Bgr> {
    (0..count)
        .map(|class_id| {
            let mut rng = StdRng::seed_from_u64(class_id as u64);
            [rng.gen_range(0..=255), rng.gen_range(0..=255), rng.gen_range(0..=255)]
        })
        .collect()
}

/// Draw all detections onto the frame in place.
pub fn annotate(frame: &mut Frame, detections: &[Detection], classes: &[String], palette: &[Bgr]) {
    for detection in detections {
        let color = palette
            .get(detection.class_id)
            .copied()
            .unwrap_or([255, 255, 255]);
        draw_rect_outline(frame, detection, color);

        let name = classes
            .get(detection.class_id)
            .map(String::as_str)
            .unwrap_or("unknown");
        let label = name.to_uppercase();
        let x = detection.bbox.x as i64;
        let baseline = detection.bbox.y as i64 - LABEL_OFFSET;
        draw_text(frame, &label, x, baseline, color);
    }
}

fn draw_rect_outline(frame: &mut Frame, detection: &Detection, color: Bgr) {
    let x0 = detection.bbox.x as i64;
    let y0 = detection.bbox.y as i64;
    let x1 = x0 + detection.bbox.w as i64 - 1;
    let y1 = y0 + detection.bbox.h as i64 - 1;
    if x1 < x0 || y1 < y0 {
        return;
    }

    for t in 0..LINE_WIDTH {
        for x in x0..=x1 {
            frame.put_pixel(x, (y0 + t).min(y1), color);
            frame.put_pixel(x, (y1 - t).max(y0), color);
        }
        for y in y0..=y1 {
            frame.put_pixel((x0 + t).min(x1), y, color);
            frame.put_pixel((x1 - t).max(x0), y, color);
        }
    }
}

/// Draw `text` with its baseline at (`x`, `baseline`). Glyphs falling
/// outside the frame are clipped pixel by pixel.
fn draw_text(frame: &mut Frame, text: &str, x: i64, baseline: i64, color: Bgr) {
    let top = baseline - GLYPH_HEIGHT;
    let mut pen_x = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if (bits >> (7 - col)) & 1 == 1 {
                        frame.put_pixel(pen_x + col, top + row as i64, color);
                    }
                }
            }
        }
        pen_x += GLYPH_WIDTH;
    }
}

/// 8x12 bitmap glyphs for uppercase labels: A-Z, digits, space, hyphen.
/// One byte per row, most significant bit leftmost.
fn glyph(ch: char) -> Option<[u8; 12]> {
    let rows = match ch {
        'A' => [0x00, 0x18, 0x24, 0x42, 0x42, 0x7E, 0x42, 0x42, 0x42, 0x42, 0x00, 0x00],
        'B' => [0x00, 0x7C, 0x42, 0x42, 0x7C, 0x42, 0x42, 0x42, 0x42, 0x7C, 0x00, 0x00],
        'C' => [0x00, 0x3C, 0x42, 0x40, 0x40, 0x40, 0x40, 0x40, 0x42, 0x3C, 0x00, 0x00],
        'D' => [0x00, 0x78, 0x44, 0x42, 0x42, 0x42, 0x42, 0x42, 0x44, 0x78, 0x00, 0x00],
        'E' => [0x00, 0x7E, 0x40, 0x40, 0x40, 0x7C, 0x40, 0x40, 0x40, 0x7E, 0x00, 0x00],
        'F' => [0x00, 0x7E, 0x40, 0x40, 0x40, 0x7C, 0x40, 0x40, 0x40, 0x40, 0x00, 0x00],
        'G' => [0x00, 0x3C, 0x42, 0x40, 0x40, 0x4E, 0x42, 0x42, 0x46, 0x3A, 0x00, 0x00],
        'H' => [0x00, 0x42, 0x42, 0x42, 0x42, 0x7E, 0x42, 0x42, 0x42, 0x42, 0x00, 0x00],
        'I' => [0x00, 0x3E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x3E, 0x00, 0x00],
        'J' => [0x00, 0x1E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x44, 0x44, 0x38, 0x00, 0x00],
        'K' => [0x00, 0x42, 0x44, 0x48, 0x50, 0x60, 0x50, 0x48, 0x44, 0x42, 0x00, 0x00],
        'L' => [0x00, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x7E, 0x00, 0x00],
        'M' => [0x00, 0x42, 0x66, 0x5A, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x00, 0x00],
        'N' => [0x00, 0x42, 0x62, 0x52, 0x4A, 0x46, 0x42, 0x42, 0x42, 0x42, 0x00, 0x00],
        'O' => [0x00, 0x3C, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00, 0x00],
        'P' => [0x00, 0x7C, 0x42, 0x42, 0x42, 0x7C, 0x40, 0x40, 0x40, 0x40, 0x00, 0x00],
        'Q' => [0x00, 0x3C, 0x42, 0x42, 0x42, 0x42, 0x42, 0x4A, 0x44, 0x3A, 0x00, 0x00],
        'R' => [0x00, 0x7C, 0x42, 0x42, 0x42, 0x7C, 0x48, 0x44, 0x42, 0x42, 0x00, 0x00],
        'S' => [0x00, 0x3C, 0x42, 0x40, 0x30, 0x0C, 0x02, 0x42, 0x42, 0x3C, 0x00, 0x00],
        'T' => [0x00, 0x7F, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x00],
        'U' => [0x00, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00, 0x00],
        'V' => [0x00, 0x41, 0x41, 0x41, 0x22, 0x22, 0x14, 0x14, 0x08, 0x08, 0x00, 0x00],
        'W' => [0x00, 0x41, 0x41, 0x41, 0x41, 0x49, 0x49, 0x55, 0x63, 0x41, 0x00, 0x00],
        'X' => [0x00, 0x42, 0x42, 0x24, 0x18, 0x18, 0x24, 0x42, 0x42, 0x42, 0x00, 0x00],
        'Y' => [0x00, 0x41, 0x22, 0x14, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x00],
        'Z' => [0x00, 0x7E, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x40, 0x7E, 0x00, 0x00],
        '0' => [0x00, 0x3C, 0x42, 0x46, 0x4A, 0x52, 0x62, 0x42, 0x42, 0x3C, 0x00, 0x00],
        '1' => [0x00, 0x08, 0x18, 0x28, 0x08, 0x08, 0x08, 0x08, 0x08, 0x3E, 0x00, 0x00],
        '2' => [0x00, 0x3C, 0x42, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x7E, 0x00, 0x00],
        '3' => [0x00, 0x3C, 0x42, 0x02, 0x1C, 0x02, 0x02, 0x02, 0x42, 0x3C, 0x00, 0x00],
        '4' => [0x00, 0x04, 0x0C, 0x14, 0x24, 0x44, 0x7E, 0x04, 0x04, 0x04, 0x00, 0x00],
        '5' => [0x00, 0x7E, 0x40, 0x40, 0x7C, 0x02, 0x02, 0x02, 0x42, 0x3C, 0x00, 0x00],
        '6' => [0x00, 0x3C, 0x42, 0x40, 0x7C, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00, 0x00],
        '7' => [0x00, 0x7E, 0x02, 0x04, 0x08, 0x10, 0x10, 0x10, 0x10, 0x10, 0x00, 0x00],
        '8' => [0x00, 0x3C, 0x42, 0x42, 0x3C, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00, 0x00],
        '9' => [0x00, 0x3C, 0x42, 0x42, 0x42, 0x3E, 0x02, 0x02, 0x42, 0x3C, 0x00, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        ' ' => return Some([0; 12]),
        _ => return None,
    };
    Some(rows)
}
