//! Matrix product.
//!
//! Operands may be 1-D or 2-D. A 1-D left operand is treated as a row
//! (shape `[1, n]`), a 1-D right operand as a column (`[n, 1]`), and the
//! promoted axis is dropped from the result, so `[n] @ [n, m] -> [m]`,
//! `[n, m] @ [m] -> [n]` and `[n] @ [n] -> []`.

use ndarray::{Array2, ErrorKind, Ix2, ShapeError};

use crate::error::Result;
use crate::tensor::Array;

/// Views `x` as a matrix, promoting a vector to a row (`as_row`) or column.
fn as_matrix(x: &Array, as_row: bool) -> Result<Array2<f64>> {
    match x.ndim() {
        1 => {
            let n = x.len();
            let shape = if as_row { (1, n) } else { (n, 1) };
            Ok(Array2::from_shape_vec(shape, x.iter().copied().collect())?)
        }
        2 => Ok(x.view().into_dimensionality::<Ix2>()?.to_owned()),
        _ => Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into()),
    }
}

/// Reshapes a matrix result back to `shape`, dropping promoted axes.
fn from_matrix(m: Array2<f64>, shape: &[usize]) -> Result<Array> {
    Ok(Array::from_shape_vec(shape.to_vec(), m.iter().copied().collect())?)
}

fn check_inner(a: &Array2<f64>, b: &Array2<f64>) -> Result<()> {
    if a.ncols() == b.nrows() {
        Ok(())
    } else {
        Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into())
    }
}

/// Shape of `a @ b` given both operands' original ranks.
fn output_shape(a: &Array, b: &Array, a2: &Array2<f64>, b2: &Array2<f64>) -> Vec<usize> {
    let mut shape = Vec::with_capacity(2);
    if a.ndim() == 2 {
        shape.push(a2.nrows());
    }
    if b.ndim() == 2 {
        shape.push(b2.ncols());
    }
    shape
}

pub fn matmul_forward(a: &Array, b: &Array) -> Result<Array> {
    let a2 = as_matrix(a, true)?;
    let b2 = as_matrix(b, false)?;
    check_inner(&a2, &b2)?;
    let shape = output_shape(a, b, &a2, &b2);
    from_matrix(a2.dot(&b2), &shape)
}

/// (g @ bᵀ, aᵀ @ g), each reshaped to its operand's shape.
pub fn matmul_backward(a: &Array, b: &Array, grad: &Array) -> Result<Vec<Array>> {
    let a2 = as_matrix(a, true)?;
    let b2 = as_matrix(b, false)?;
    check_inner(&a2, &b2)?;
    let g2 = Array2::from_shape_vec((a2.nrows(), b2.ncols()), grad.iter().copied().collect())?;

    let grad_a = g2.dot(&b2.t());
    let grad_b = a2.t().dot(&g2);
    Ok(vec![from_matrix(grad_a, a.shape())?, from_matrix(grad_b, b.shape())?])
}

#[cfg(test)]
#[path = "linalg_test.rs"]
mod tests;
