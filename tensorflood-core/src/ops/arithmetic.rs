//! Element-wise arithmetic: add, multiply, divide, power, negate.
//!
//! Binary operators broadcast their operands. Their backward functions
//! return gradients with the broadcast output shape; the backward engine
//! sums broadcast axes away before accumulating into each operand.

use crate::error::Result;
use crate::tensor::{zip_broadcast, Array};

pub fn add_forward(a: &Array, b: &Array) -> Result<Array> {
    zip_broadcast(a, b, |x, y| x + y)
}

/// d(a+b)/da = d(a+b)/db = 1.
pub fn add_backward(grad: &Array) -> Vec<Array> {
    vec![grad.clone(), grad.clone()]
}

pub fn mul_forward(a: &Array, b: &Array) -> Result<Array> {
    zip_broadcast(a, b, |x, y| x * y)
}

/// (g * b, g * a)
pub fn mul_backward(a: &Array, b: &Array, grad: &Array) -> Result<Vec<Array>> {
    let grad_a = zip_broadcast(grad, b, |g, y| g * y)?;
    let grad_b = zip_broadcast(grad, a, |g, x| g * x)?;
    Ok(vec![grad_a, grad_b])
}

pub fn div_forward(a: &Array, b: &Array) -> Result<Array> {
    zip_broadcast(a, b, |x, y| x / y)
}

/// (g / b, g * (-a / b²))
pub fn div_backward(a: &Array, b: &Array, grad: &Array) -> Result<Vec<Array>> {
    let grad_a = zip_broadcast(grad, b, |g, y| g / y)?;
    let local_b = zip_broadcast(a, b, |x, y| -x / (y * y))?;
    let grad_b = zip_broadcast(grad, &local_b, |g, l| g * l)?;
    Ok(vec![grad_a, grad_b])
}

pub fn pow_forward(a: &Array, b: &Array) -> Result<Array> {
    zip_broadcast(a, b, f64::powf)
}

/// (g * b * a^(b-1), g * ln(a) * a^b)
///
/// The exponent gradient is NaN wherever `a <= 0`, as ln(a) is.
pub fn pow_backward(a: &Array, b: &Array, grad: &Array) -> Result<Vec<Array>> {
    let local_a = zip_broadcast(a, b, |x, y| y * x.powf(y - 1.0))?;
    let local_b = zip_broadcast(a, b, |x, y| x.ln() * x.powf(y))?;
    let grad_a = zip_broadcast(grad, &local_a, |g, l| g * l)?;
    let grad_b = zip_broadcast(grad, &local_b, |g, l| g * l)?;
    Ok(vec![grad_a, grad_b])
}

pub fn neg_forward(a: &Array) -> Array {
    a.mapv(|x| -x)
}

pub fn neg_backward(grad: &Array) -> Vec<Array> {
    vec![grad.mapv(|g| -g)]
}

#[cfg(test)]
#[path = "arithmetic_test.rs"]
mod tests;
