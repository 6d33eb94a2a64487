mod backend;
mod backends;
mod model;
mod output;

pub use backend::DetectorBackend;
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use model::{Model, ModelPaths};
pub use output::{OutputLayer, RawDetection};
