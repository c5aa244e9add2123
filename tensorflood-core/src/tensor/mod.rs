//! Dense tensor values.
//!
//! Every node value and every gradient accumulator is an [`Array`], a
//! dynamically-ranked `ndarray` array of `f64`. This module adds the small
//! amount of glue the engine needs on top of `ndarray`: creation helpers,
//! NumPy-style broadcasting for binary element-wise functions, and the
//! reduction that maps a broadcast gradient back onto an input's shape.

use ndarray::{Array1, ArrayD, IxDyn};

use crate::error::TensorfloodError;

pub mod broadcast_utils;

pub use broadcast_utils::{broadcast_shapes, reduce_to_shape, zip_broadcast};

/// The tensor value type held by every node.
pub type Array = ArrayD<f64>;

/// Creates a 0-dimensional array holding `value`.
pub fn scalar(value: f64) -> Array {
    ArrayD::from_elem(IxDyn(&[]), value)
}

/// Creates a 1-dimensional array from a slice.
pub fn vector(values: &[f64]) -> Array {
    Array1::from(values.to_vec()).into_dyn()
}

/// Creates an array of the given shape from row-major data.
///
/// # Errors
/// Returns `TensorfloodError::Shape` if `data.len()` does not match the
/// number of elements described by `shape`.
pub fn from_vec(data: Vec<f64>, shape: &[usize]) -> Result<Array, TensorfloodError> {
    Ok(ArrayD::from_shape_vec(IxDyn(shape), data)?)
}

/// Array of zeros with the given shape.
pub fn zeros(shape: &[usize]) -> Array {
    ArrayD::zeros(IxDyn(shape))
}

/// Array of ones with the given shape.
pub fn ones(shape: &[usize]) -> Array {
    ArrayD::ones(IxDyn(shape))
}

/// Returns the single element of a one-element array of any rank.
pub fn to_scalar(array: &Array) -> Option<f64> {
    if array.len() == 1 {
        array.iter().next().copied()
    } else {
        None
    }
}
