use tensorflood_core::TensorfloodError;
use thiserror::Error;

/// Errors raised while building or training networks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NnError {
    /// An engine error from building or differentiating the graph.
    #[error(transparent)]
    Engine(#[from] TensorfloodError),

    #[error("Learning rate must be finite and positive, got {0}")]
    InvalidLearningRate(f64),

    #[error("Layer '{name}' needs non-zero dimensions, got {in_features} -> {out_features}")]
    InvalidLayerSize {
        name: String,
        in_features: usize,
        out_features: usize,
    },

    #[error("A network needs at least one layer")]
    EmptyNetwork,
}
