use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::display::DisplaySink;
use crate::frame::Frame;

/// Console "display": logs each presented frame's dimensions and content
/// digest, and whether the content changed since the last present. Useful
/// headless stand-in for a texture surface.
#[derive(Default)]
pub struct ConsoleSink {
    last_digest: Option<[u8; 32]>,
    presents: u64,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for ConsoleSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let digest: [u8; 32] = Sha256::digest(frame.as_bytes()).into();
        let changed = self.last_digest != Some(digest);
        self.last_digest = Some(digest);
        self.presents += 1;
        log::debug!(
            "present #{}: {}x{} digest={:02x}{:02x}{:02x}{:02x} changed={}",
            self.presents,
            frame.width(),
            frame.height(),
            digest[0],
            digest[1],
            digest[2],
            digest[3],
            changed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_accepts_frames() {
        let mut sink = ConsoleSink::new();
        let frame = Frame::filled(8, 8, [1, 2, 3]);
        sink.present(&frame).unwrap();
        sink.present(&frame).unwrap();
        assert_eq!(sink.presents, 2);
    }
}
