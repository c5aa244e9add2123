//! # Activation Functions
//!
//! Non-linear element-wise functions used between affine layers.
//!
//! ## Currently Implemented:
//! - ReLU: `max(x, 0)`.
//! - Sigmoid: `1 / (1 + e^-x)`.

use num_traits::Float;

use crate::error::Result;
use crate::tensor::{zip_broadcast, Array};

fn relu<F: Float>(x: F) -> F {
    if x > F::zero() {
        x
    } else {
        F::zero()
    }
}

fn sigmoid<F: Float>(x: F) -> F {
    F::one() / (F::one() + (-x).exp())
}

pub fn relu_forward(a: &Array) -> Array {
    a.mapv(relu::<f64>)
}

/// g where a > 0, else 0. The derivative at exactly 0 is taken as 0.
pub fn relu_backward(a: &Array, grad: &Array) -> Result<Vec<Array>> {
    Ok(vec![zip_broadcast(grad, a, |g, x| if x > 0.0 { g } else { 0.0 })?])
}

pub fn sigmoid_forward(a: &Array) -> Array {
    a.mapv(sigmoid::<f64>)
}

/// g * s * (1 - s), where `output` holds s = sigmoid(a) from the forward pass.
pub fn sigmoid_backward(output: &Array, grad: &Array) -> Result<Vec<Array>> {
    Ok(vec![zip_broadcast(grad, output, |g, s| g * s * (1.0 - s))?])
}

#[cfg(test)]
#[path = "activation_test.rs"]
mod tests;
