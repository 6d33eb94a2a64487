use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};

use crate::frame::Frame;
use crate::ingest::FrameSource;

/// Camera configuration.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Device identifier: `stub://name` for the synthetic generator, or a
    /// local still-image path (JPEG).
    pub device: String,
    /// Frame rate the source paces itself to.
    pub target_fps: u32,
    /// Frame width for synthetic frames.
    pub width: u32,
    /// Frame height for synthetic frames.
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "stub://camera0".to_string(),
            target_fps: 30,
            width: 640,
            height: 480,
        }
    }
}

/// Camera handle. One open per process; reads are paced to `target_fps`,
/// and a read arriving before the next frame period yields `Ok(None)`.
pub struct Camera {
    backend: CameraBackend,
    pacer: Pacer,
    device: String,
    frames_read: u64,
}

enum CameraBackend {
    Synthetic(SyntheticCamera),
    Still(StillImageCamera),
}

impl Camera {
    pub fn open(config: &CameraConfig) -> Result<Self> {
        if config.target_fps == 0 {
            return Err(anyhow!("camera target_fps must be greater than zero"));
        }
        let backend = if config.device.starts_with("stub://") {
            CameraBackend::Synthetic(SyntheticCamera::new(config.width, config.height))
        } else {
            if config.device.contains("://") {
                return Err(anyhow!(
                    "camera device must be stub:// or a local image path (no URL schemes)"
                ));
            }
            CameraBackend::Still(StillImageCamera::open(Path::new(&config.device))?)
        };
        log::info!(
            "camera opened: {} @ {} fps",
            config.device,
            config.target_fps
        );
        Ok(Self {
            backend,
            pacer: Pacer::new(config.target_fps),
            device: config.device.clone(),
            frames_read: 0,
        })
    }

    pub fn stats(&self) -> CameraStats {
        CameraStats {
            frames_read: self.frames_read,
            device: self.device.clone(),
        }
    }
}

impl FrameSource for Camera {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if !self.pacer.ready() {
            return Ok(None);
        }
        let frame = match &mut self.backend {
            CameraBackend::Synthetic(camera) => camera.next_frame(),
            CameraBackend::Still(camera) => camera.next_frame(),
        };
        self.frames_read += 1;
        Ok(Some(frame))
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        log::info!(
            "camera released: {} ({} frames read)",
            self.device,
            self.frames_read
        );
    }
}

/// Read statistics.
#[derive(Clone, Debug)]
pub struct CameraStats {
    pub frames_read: u64,
    pub device: String,
}

/// Rate limiter: at most one frame per period, first read always ready.
struct Pacer {
    period: Duration,
    last_emit: Option<Instant>,
}

impl Pacer {
    fn new(target_fps: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / target_fps as f64),
            last_emit: None,
        }
    }

    fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.period => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Synthetic camera (stub://)
// ----------------------------------------------------------------------------

struct SyntheticCamera {
    width: u32,
    height: u32,
    frame_count: u64,
}

impl SyntheticCamera {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_count: 0,
        }
    }

    /// Gradient background with a bright band that moves one row per frame,
    /// so successive frames differ deterministically.
    fn next_frame(&mut self) -> Frame {
        self.frame_count += 1;
        let band = (self.frame_count % self.height.max(1) as u64) as u32;
        let mut data = Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                if y == band {
                    data.extend_from_slice(&[255, 255, 255]);
                } else {
                    data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 64]);
                }
            }
        }
        Frame::from_bgr(data, self.width, self.height).expect("synthetic frame size")
    }
}

// ----------------------------------------------------------------------------
// Still-image camera (local JPEG served at the configured rate)
// ----------------------------------------------------------------------------

struct StillImageCamera {
    frame: Frame,
}

impl StillImageCamera {
    fn open(path: &Path) -> Result<Self> {
        let rgb = image::open(path)
            .with_context(|| format!("failed to decode image {}", path.display()))?
            .to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for pixel in rgb.pixels() {
            // Pipeline contract is BGR.
            data.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
        }
        Ok(Self {
            frame: Frame::from_bgr(data, width, height)?,
        })
    }

    fn next_frame(&mut self) -> Frame {
        self.frame.clone()
    }
}
