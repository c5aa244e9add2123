use std::cmp::max;

use ndarray::{Axis, ErrorKind, IxDyn, ShapeError, Zip};

use super::Array;
use crate::error::TensorfloodError;

/// Computes the shape two operands broadcast to, NumPy style.
///
/// Shapes are aligned on their trailing axes; a missing or size-1 axis
/// stretches to match the other operand.
///
/// # Errors
/// `ShapeError` with `ErrorKind::IncompatibleShape` when two aligned axes
/// differ and neither is 1.
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>, ShapeError> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = shape_a.get(rank_a.wrapping_sub(1 + i)).copied().unwrap_or(1);
        let dim_b = shape_b.get(rank_b.wrapping_sub(1 + i)).copied().unwrap_or(1);

        result_shape[max_rank - 1 - i] = if dim_a == dim_b || dim_b == 1 {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape));
        };
    }
    Ok(result_shape)
}

/// Applies `f` element-wise over `a` and `b` after broadcasting both to
/// their common shape.
pub fn zip_broadcast<F>(a: &Array, b: &Array, f: F) -> Result<Array, TensorfloodError>
where
    F: Fn(f64, f64) -> f64,
{
    let shape = IxDyn(&broadcast_shapes(a.shape(), b.shape())?);
    let a_view = a
        .broadcast(shape.clone())
        .ok_or_else(|| ShapeError::from_kind(ErrorKind::IncompatibleShape))?;
    let b_view = b
        .broadcast(shape)
        .ok_or_else(|| ShapeError::from_kind(ErrorKind::IncompatibleShape))?;
    Ok(Zip::from(a_view)
        .and(b_view)
        .map_collect(|&x, &y| f(x, y)))
}

/// Reduces a gradient to `target_shape` by summing along broadcast axes.
///
/// Leading axes the target does not have are summed away; axes where the
/// target has extent 1 are summed with the axis kept. A gradient of lower
/// rank than the target (a scalar seed, for instance) is broadcast up.
pub fn reduce_to_shape(grad: &Array, target_shape: &[usize]) -> Result<Array, TensorfloodError> {
    if grad.shape() == target_shape {
        return Ok(grad.clone());
    }

    if grad.ndim() < target_shape.len() {
        let expanded = grad
            .broadcast(IxDyn(target_shape))
            .ok_or_else(|| ShapeError::from_kind(ErrorKind::IncompatibleShape))?;
        return Ok(expanded.to_owned());
    }

    let mut reduced = grad.clone();
    while reduced.ndim() > target_shape.len() {
        reduced = reduced.sum_axis(Axis(0));
    }

    for (axis, &target_dim) in target_shape.iter().enumerate() {
        if target_dim == 1 && reduced.shape()[axis] != 1 {
            reduced = reduced.sum_axis(Axis(axis)).insert_axis(Axis(axis));
        }
    }

    if reduced.shape() != target_shape {
        return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
    }
    Ok(reduced)
}

#[cfg(test)]
#[path = "broadcast_utils_test.rs"]
mod tests;
