//! overlayd - real-time video annotation daemon
//!
//! Startup: load configuration, load the model once, open the camera, pick
//! a display sink. Steady state: tick the frame loop at the configured
//! rate. Model-load failures abort with a clear message; after startup,
//! per-tick failures are logged and the loop keeps running. Ctrl-C stops
//! the loop, and model and camera are released together on scope exit.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use overlay_kernel::{
    Camera, ConsoleSink, DisplaySink, FrameLoop, Model, OverlaydConfig, Pipeline, SnapshotSink,
};

#[derive(Parser, Debug)]
#[command(name = "overlayd", about = "Real-time video annotation daemon")]
struct Args {
    /// JSON config file (also honored via OVERLAY_CONFIG).
    #[arg(long, env = "OVERLAY_CONFIG")]
    config: Option<PathBuf>,

    /// Camera device override: stub://name or a local image path.
    #[arg(long)]
    camera: Option<String>,

    /// Write the latest annotated frame to this JPEG path instead of the
    /// console sink.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Some(path) = &args.config {
        std::env::set_var("OVERLAY_CONFIG", path);
    }
    let mut cfg = OverlaydConfig::load().context("failed to load configuration")?;
    if let Some(camera) = args.camera {
        cfg.camera.device = camera;
    }
    if let Some(snapshot) = args.snapshot {
        cfg.snapshot_path = Some(snapshot);
    }

    // One-time model load; fatal on failure, never retried.
    let model = Model::load(&cfg.model).context("startup aborted")?;
    log::info!(
        "overlayd starting: backend={} classes={} camera={} fps={}",
        model.backend_name(),
        model.classes().len(),
        cfg.camera.device,
        cfg.camera.target_fps
    );

    let camera = Camera::open(&cfg.camera).context("failed to open camera")?;
    let sink: Box<dyn DisplaySink> = match &cfg.snapshot_path {
        Some(path) => {
            log::info!("presenting to snapshot file {}", path.display());
            Box::new(SnapshotSink::new(path))
        }
        None => Box::new(ConsoleSink::new()),
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    ctrlc::set_handler(move || {
        log::info!("shutdown requested");
        flag.store(true, Ordering::SeqCst);
    })
    .context("failed to install signal handler")?;

    let pipeline = Pipeline::new(model, cfg.thresholds);
    let mut frame_loop = FrameLoop::new(camera, sink, pipeline, cfg.camera.target_fps);
    frame_loop.run(&shutdown);

    let stats = frame_loop.stats();
    log::info!(
        "overlayd exiting: {} frames presented, {} detections drawn",
        stats.presented,
        stats.detections
    );
    // Model and camera are dropped together here, even after mid-loop errors.
    Ok(())
}
