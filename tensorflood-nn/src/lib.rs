//! # tensorflood-nn
//!
//! Small feed-forward networks on top of `tensorflood-core`: dense layers,
//! a sigmoid-terminated network for binary classification, graph-built
//! losses and gradient descent.
//!
//! Layers create their variables in the active graph, so build the model
//! inside a [`tensorflood_core::GraphScope`]. A training step rebuilds the
//! forward expression each iteration; call `Graph::reset` between
//! iterations to drop the previous iteration's nodes (the parameters stay
//! alive through the model's handles).

pub mod error;
pub mod linear;
pub mod loss;
pub mod module;
pub mod network;
pub mod optimizer;

pub use error::NnError;
pub use linear::Linear;
pub use loss::{bce_loss, mse_loss, Reduction};
pub use module::Module;
pub use network::{accuracy, NeuralNetwork};
pub use optimizer::{GradientDescent, Optimizer};
