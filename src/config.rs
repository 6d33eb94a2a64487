use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::detect::ModelPaths;
use crate::ingest::CameraConfig;
use crate::pipeline::Thresholds;

const DEFAULT_WEIGHTS: &str = "yolov3-tiny.weights";
const DEFAULT_NET_CONFIG: &str = "yolov3-tiny.cfg";
const DEFAULT_CLASS_NAMES: &str = "coco.names";
const DEFAULT_CAMERA: &str = "stub://camera0";
const DEFAULT_FPS: u32 = 30;
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;

#[derive(Debug, Deserialize, Default)]
struct OverlaydConfigFile {
    model: Option<ModelConfigFile>,
    camera: Option<CameraConfigFile>,
    thresholds: Option<ThresholdsConfigFile>,
    snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelConfigFile {
    weights: Option<PathBuf>,
    network_config: Option<PathBuf>,
    class_names: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct ThresholdsConfigFile {
    detection: Option<f32>,
    score: Option<f32>,
    overlap: Option<f32>,
}

/// Resolved daemon configuration: JSON file named by `OVERLAY_CONFIG`,
/// then `OVERLAY_*` env overrides, then validation.
#[derive(Clone, Debug)]
pub struct OverlaydConfig {
    pub model: ModelPaths,
    pub camera: CameraConfig,
    pub thresholds: Thresholds,
    /// When set, a `SnapshotSink` writes the latest annotated frame here.
    pub snapshot_path: Option<PathBuf>,
}

impl OverlaydConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("OVERLAY_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: OverlaydConfigFile) -> Self {
        let model_file = file.model.unwrap_or_default();
        let camera_file = file.camera.unwrap_or_default();
        let thresholds_file = file.thresholds.unwrap_or_default();
        let defaults = Thresholds::default();
        Self {
            model: ModelPaths {
                weights: model_file
                    .weights
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_WEIGHTS)),
                network_config: model_file
                    .network_config
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_NET_CONFIG)),
                class_names: model_file
                    .class_names
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CLASS_NAMES)),
            },
            camera: CameraConfig {
                device: camera_file
                    .device
                    .unwrap_or_else(|| DEFAULT_CAMERA.to_string()),
                target_fps: camera_file.target_fps.unwrap_or(DEFAULT_FPS),
                width: camera_file.width.unwrap_or(DEFAULT_WIDTH),
                height: camera_file.height.unwrap_or(DEFAULT_HEIGHT),
            },
            thresholds: Thresholds {
                detection: thresholds_file.detection.unwrap_or(defaults.detection),
                score: thresholds_file.score.unwrap_or(defaults.score),
                overlap: thresholds_file.overlap.unwrap_or(defaults.overlap),
            },
            snapshot_path: file.snapshot_path,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(device) = std::env::var("OVERLAY_CAMERA") {
            if !device.trim().is_empty() {
                self.camera.device = device;
            }
        }
        if let Ok(fps) = std::env::var("OVERLAY_FPS") {
            self.camera.target_fps = fps
                .parse()
                .map_err(|_| anyhow!("OVERLAY_FPS must be an integer frame rate"))?;
        }
        for (key, target) in [
            ("OVERLAY_WEIGHTS", &mut self.model.weights),
            ("OVERLAY_NET_CONFIG", &mut self.model.network_config),
            ("OVERLAY_CLASS_NAMES", &mut self.model.class_names),
        ] {
            if let Ok(path) = std::env::var(key) {
                if !path.trim().is_empty() {
                    *target = PathBuf::from(path);
                }
            }
        }
        if let Ok(path) = std::env::var("OVERLAY_SNAPSHOT_PATH") {
            if !path.trim().is_empty() {
                self.snapshot_path = Some(PathBuf::from(path));
            }
        }
        for (key, target) in [
            ("OVERLAY_DETECTION_THRESHOLD", &mut self.thresholds.detection),
            ("OVERLAY_SCORE_THRESHOLD", &mut self.thresholds.score),
            ("OVERLAY_OVERLAP_THRESHOLD", &mut self.thresholds.overlap),
        ] {
            if let Ok(value) = std::env::var(key) {
                *target = value
                    .parse()
                    .map_err(|_| anyhow!("{key} must be a number in [0, 1]"))?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.camera.target_fps == 0 {
            return Err(anyhow!("camera target_fps must be greater than zero"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera dimensions must be greater than zero"));
        }
        for (name, value) in [
            ("detection threshold", self.thresholds.detection),
            ("score threshold", self.thresholds.score),
            ("overlap threshold", self.thresholds.overlap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("{name} must be in [0, 1], got {value}"));
            }
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<OverlaydConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
