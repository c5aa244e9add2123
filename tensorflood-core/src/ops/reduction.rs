//! Reductions.

use ndarray::{ErrorKind, ShapeError};

use crate::error::Result;
use crate::tensor::{self, Array};

/// Sum of all elements, as a 0-d array.
pub fn sum_forward(a: &Array) -> Array {
    tensor::scalar(a.sum())
}

/// The (scalar) output gradient, broadcast to the input's shape.
pub fn sum_backward(a: &Array, grad: &Array) -> Result<Vec<Array>> {
    let broadcast = grad
        .broadcast(a.raw_dim())
        .ok_or_else(|| ShapeError::from_kind(ErrorKind::IncompatibleShape))?;
    Ok(vec![broadcast.to_owned()])
}

#[cfg(test)]
#[path = "reduction_test.rs"]
mod tests;
