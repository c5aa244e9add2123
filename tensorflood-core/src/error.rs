use thiserror::Error;

use crate::ops::OpKind;

/// Custom error type for the tensorflood engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorfloodError {
    /// Attempted to overwrite the value of a node whose value is fixed
    /// (constants, and operators whose value is their cached forward result).
    #[error("Cannot reassign the value of '{name}': only variables are mutable")]
    InvalidMutation { name: String },

    /// An arithmetic operand that is neither a node nor a numeric scalar.
    #[error("Incompatible operand type: expected a node or a numeric scalar, got {found}")]
    IncompatibleType { found: String },

    /// A node was constructed while no graph was active on this thread.
    #[error("No active graph: activate a graph (or enter its scope) before building nodes")]
    NoActiveGraph,

    /// Shape errors raised by the array primitive, passed through unmodified.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("Backward called on non-scalar node '{name}' of shape {shape:?}")]
    BackwardNonScalar { name: String, shape: Vec<usize> },

    #[error("Operator {op:?} takes {expected} input(s), got {actual}")]
    ArityMismatch {
        op: OpKind,
        expected: usize,
        actual: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = TensorfloodError> = std::result::Result<T, E>;
