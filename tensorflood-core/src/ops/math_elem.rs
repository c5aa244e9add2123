//! Element-wise math functions.

use crate::error::Result;
use crate::tensor::{zip_broadcast, Array};

/// Natural logarithm. Non-positive inputs give NaN or -inf, as `f64::ln`.
pub fn log_forward(a: &Array) -> Array {
    a.mapv(f64::ln)
}

/// g / a
pub fn log_backward(a: &Array, grad: &Array) -> Result<Vec<Array>> {
    Ok(vec![zip_broadcast(grad, a, |g, x| g / x)?])
}
