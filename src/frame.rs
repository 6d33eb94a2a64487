//! BGR frame buffer.
//!
//! A `Frame` is one camera read: width x height x 3 bytes, row-major,
//! blue-green-red channel order, top row first. It lives for exactly one
//! pass through the pipeline and is either dropped or handed to a display
//! sink. Nothing in the pipeline retains it across ticks.

use anyhow::{anyhow, Result};

/// A BGR color triple, in channel order (b, g, r).
pub type Bgr = [u8; 3];

/// Dense width x height x 3 pixel buffer, row-major, BGR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Wrap raw BGR bytes. Fails when the byte count does not match the
    /// dimensions.
    pub fn from_bgr(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if data.len() != expected {
            return Err(anyhow!(
                "expected {} BGR bytes for {}x{}, received {}",
                expected,
                width,
                height,
                data.len()
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Solid-color frame.
    pub fn filled(width: u32, height: u32, color: Bgr) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&color);
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw BGR bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Write one pixel. Coordinates outside the frame are ignored, so
    /// drawing code clips by construction.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Bgr) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.data[idx..idx + 3].copy_from_slice(&color);
    }

    /// Read one pixel, or `None` outside the frame.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Bgr> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Reverse the row order in place.
    ///
    /// The capture buffer's vertical axis is inverted relative to the
    /// display texture's coordinate convention; the frame loop applies this
    /// once before handing the frame to the sink.
    pub fn flip_vertical(&mut self) {
        let row_len = self.width as usize * 3;
        let height = self.height as usize;
        for top in 0..height / 2 {
            let bottom = height - 1 - top;
            let (upper, lower) = self.data.split_at_mut(bottom * row_len);
            upper[top * row_len..(top + 1) * row_len].swap_with_slice(&mut lower[..row_len]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bgr_validates_length() {
        assert!(Frame::from_bgr(vec![0u8; 4 * 4 * 3], 4, 4).is_ok());
        assert!(Frame::from_bgr(vec![0u8; 10], 4, 4).is_err());
    }

    #[test]
    fn put_pixel_clips_out_of_bounds() {
        let mut frame = Frame::filled(4, 4, [0, 0, 0]);
        let before = frame.clone();
        frame.put_pixel(-1, 0, [255, 255, 255]);
        frame.put_pixel(0, -1, [255, 255, 255]);
        frame.put_pixel(4, 0, [255, 255, 255]);
        frame.put_pixel(0, 4, [255, 255, 255]);
        assert_eq!(frame, before);

        frame.put_pixel(2, 3, [1, 2, 3]);
        assert_eq!(frame.pixel(2, 3), Some([1, 2, 3]));
    }

    #[test]
    fn flip_vertical_swaps_first_and_last_rows() {
        let mut data = vec![0u8; 2 * 3 * 3];
        // Row 0 red, row 2 blue (BGR order).
        data[0..6].copy_from_slice(&[0, 0, 255, 0, 0, 255]);
        data[12..18].copy_from_slice(&[255, 0, 0, 255, 0, 0]);
        let mut frame = Frame::from_bgr(data, 2, 3).unwrap();
        frame.flip_vertical();
        assert_eq!(frame.pixel(0, 0), Some([255, 0, 0]));
        assert_eq!(frame.pixel(0, 2), Some([0, 0, 255]));
        assert_eq!(frame.pixel(0, 1), Some([0, 0, 0]));
    }

    #[test]
    fn flip_vertical_twice_is_identity() {
        let data: Vec<u8> = (0..5 * 4 * 3).map(|i| (i % 251) as u8).collect();
        let mut frame = Frame::from_bgr(data, 5, 4).unwrap();
        let original = frame.clone();
        frame.flip_vertical();
        assert_ne!(frame, original);
        frame.flip_vertical();
        assert_eq!(frame, original);
    }
}
