//! One-time model loading.
//!
//! `Model` bundles the loaded detector backend with the class-name list and
//! the per-class color table. It is created once at startup, reused for the
//! whole process, and dropped once at shutdown. Nothing reloads it per
//! frame.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::annotate::class_palette;
use crate::detect::backend::DetectorBackend;
use crate::detect::backends::StubBackend;
use crate::detect::output::OutputLayer;
use crate::error::PipelineError;
use crate::frame::{Bgr, Frame};

/// On-disk inputs for `Model::load`.
///
/// `weights` may be the literal `stub://` scheme, which selects the scripted
/// stub backend and skips the weights/config file checks; any other value
/// names real files that must exist.
#[derive(Clone, Debug)]
pub struct ModelPaths {
    pub weights: PathBuf,
    pub network_config: PathBuf,
    pub class_names: PathBuf,
}

/// Loaded detection network plus class names and display colors.
/// Immutable after load, except for the backend's internal inference state.
pub struct Model {
    backend: Box<dyn DetectorBackend>,
    classes: Vec<String>,
    palette: Vec<Bgr>,
}

impl Model {
    /// Load the network and class list from disk. Fatal on any missing or
    /// malformed input; never retried.
    pub fn load(paths: &ModelPaths) -> Result<Self, PipelineError> {
        let classes = read_class_names(&paths.class_names)?;

        let is_stub = paths.weights.to_string_lossy().starts_with("stub://");
        if !is_stub {
            require_readable(&paths.weights)?;
            require_readable(&paths.network_config)?;
        }

        let backend: Box<dyn DetectorBackend> = if is_stub {
            Box::new(StubBackend::new(classes.len()))
        } else {
            #[cfg(feature = "backend-tract")]
            {
                Box::new(
                    crate::detect::backends::TractBackend::new(&paths.weights, classes.len())
                        .map_err(|e| {
                            PipelineError::model_load(&paths.weights, e.to_string())
                        })?,
                )
            }
            #[cfg(not(feature = "backend-tract"))]
            {
                return Err(PipelineError::model_load(
                    &paths.weights,
                    "loading model files requires the backend-tract feature",
                ));
            }
        };

        log::info!(
            "model loaded: backend={} input={}px classes={}",
            backend.name(),
            backend.input_size(),
            classes.len()
        );

        let palette = class_palette(classes.len());
        Ok(Self {
            backend,
            classes,
            palette,
        })
    }

    /// Assemble a model around an already-built backend. Test seam.
    pub fn with_backend(backend: Box<dyn DetectorBackend>, classes: Vec<String>) -> Self {
        let palette = class_palette(classes.len());
        Self {
            backend,
            classes,
            palette,
        }
    }

    /// Run one forward pass. Failures are per-tick, not fatal.
    pub fn infer(&mut self, frame: &Frame) -> Result<Vec<OutputLayer>, PipelineError> {
        self.backend
            .infer(frame)
            .map_err(|e| PipelineError::Inference(e.to_string()))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn palette(&self) -> &[Bgr] {
        &self.palette
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

// The boxed backend has no Debug of its own; report what identifies it.
impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("backend", &self.backend.name())
            .field("classes", &self.classes.len())
            .finish()
    }
}

fn require_readable(path: &Path) -> Result<(), PipelineError> {
    let meta =
        fs::metadata(path).map_err(|e| PipelineError::model_load(path, e.to_string()))?;
    if !meta.is_file() {
        return Err(PipelineError::model_load(path, "not a regular file"));
    }
    Ok(())
}

/// Plain-text class list, one name per line; line order defines the class
/// index. Blank lines are skipped; a file with no usable lines is an error.
fn read_class_names(path: &Path) -> Result<Vec<String>, PipelineError> {
    let raw =
        fs::read_to_string(path).map_err(|e| PipelineError::model_load(path, e.to_string()))?;
    let classes: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if classes.is_empty() {
        return Err(PipelineError::model_load(path, "class-names file is empty"));
    }
    Ok(classes)
}
