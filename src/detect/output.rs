//! Raw network output types.

/// One output cell of the detection network.
///
/// Geometry is normalized to [0,1] relative to the network input; `scores`
/// is one entry per class, in class-list order. Produced by a backend,
/// consumed by `decode`, never retained across frames.
#[derive(Clone, Debug, Default)]
pub struct RawDetection {
    /// Box center x, normalized.
    pub cx: f32,
    /// Box center y, normalized.
    pub cy: f32,
    /// Box width, normalized.
    pub w: f32,
    /// Box height, normalized.
    pub h: f32,
    /// Per-class score vector.
    pub scores: Vec<f32>,
}

/// One raw output batch. The network emits one layer per output head.
pub type OutputLayer = Vec<RawDetection>;
