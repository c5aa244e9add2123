//! # Operators
//!
//! Every differentiable function the engine supports is one variant of
//! [`OpKind`]. A variant knows its arity, its auto-naming prefix, how to
//! compute its output from operand values (`forward`) and how to turn the
//! gradient of its output into one gradient per operand (`backward`).
//!
//! The math lives in the category submodules:
//!
//! - [`arithmetic`]: add, multiply, divide, power, negate.
//! - [`linalg`]: matrix product.
//! - [`math_elem`]: natural logarithm.
//! - [`reduction`]: sum over all elements.
//! - [`activation`]: relu, sigmoid.
//!
//! Operators are pure functions of their cached operands. Gradients returned
//! by `backward` have the operator's output shape (or an operand's shape);
//! reducing them onto the operand's shape is left to the backward engine.

use crate::error::{Result, TensorfloodError};
use crate::tensor::Array;

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod math_elem;
pub mod reduction;

/// The closed set of differentiable operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpKind {
    Add,
    Multiply,
    Divide,
    Power,
    MatMul,
    Negate,
    Log,
    Sum,
    Relu,
    Sigmoid,
}

impl OpKind {
    /// Every variant, in declaration order.
    pub const ALL: [OpKind; 10] = [
        OpKind::Add,
        OpKind::Multiply,
        OpKind::Divide,
        OpKind::Power,
        OpKind::MatMul,
        OpKind::Negate,
        OpKind::Log,
        OpKind::Sum,
        OpKind::Relu,
        OpKind::Sigmoid,
    ];

    /// Number of operands the operator takes.
    pub fn arity(self) -> usize {
        match self {
            OpKind::Add | OpKind::Multiply | OpKind::Divide | OpKind::Power | OpKind::MatMul => 2,
            OpKind::Negate | OpKind::Log | OpKind::Sum | OpKind::Relu | OpKind::Sigmoid => 1,
        }
    }

    /// Prefix of auto-generated node names (`add/0`, `mul/3`, ...).
    pub fn prefix(self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Multiply => "mul",
            OpKind::Divide => "div",
            OpKind::Power => "pow",
            OpKind::MatMul => "matmul",
            OpKind::Negate => "neg",
            OpKind::Log => "log",
            OpKind::Sum => "sum",
            OpKind::Relu => "relu",
            OpKind::Sigmoid => "sigmoid",
        }
    }

    pub(crate) fn check_arity(self, actual: usize) -> Result<()> {
        if actual == self.arity() {
            Ok(())
        } else {
            Err(TensorfloodError::ArityMismatch {
                op: self,
                expected: self.arity(),
                actual,
            })
        }
    }

    /// Computes the operator's output from its operand values.
    pub fn forward(self, inputs: &[Array]) -> Result<Array> {
        self.check_arity(inputs.len())?;
        match self {
            OpKind::Add => arithmetic::add_forward(&inputs[0], &inputs[1]),
            OpKind::Multiply => arithmetic::mul_forward(&inputs[0], &inputs[1]),
            OpKind::Divide => arithmetic::div_forward(&inputs[0], &inputs[1]),
            OpKind::Power => arithmetic::pow_forward(&inputs[0], &inputs[1]),
            OpKind::MatMul => linalg::matmul_forward(&inputs[0], &inputs[1]),
            OpKind::Negate => Ok(arithmetic::neg_forward(&inputs[0])),
            OpKind::Log => Ok(math_elem::log_forward(&inputs[0])),
            OpKind::Sum => Ok(reduction::sum_forward(&inputs[0])),
            OpKind::Relu => Ok(activation::relu_forward(&inputs[0])),
            OpKind::Sigmoid => Ok(activation::sigmoid_forward(&inputs[0])),
        }
    }

    /// Maps the gradient of the output to one gradient per operand.
    ///
    /// `inputs` are the cached operand values, `output` the cached forward
    /// result. The returned vector always has `self.arity()` entries, in
    /// operand order.
    pub fn backward(self, inputs: &[Array], output: &Array, grad: &Array) -> Result<Vec<Array>> {
        self.check_arity(inputs.len())?;
        match self {
            OpKind::Add => Ok(arithmetic::add_backward(grad)),
            OpKind::Multiply => arithmetic::mul_backward(&inputs[0], &inputs[1], grad),
            OpKind::Divide => arithmetic::div_backward(&inputs[0], &inputs[1], grad),
            OpKind::Power => arithmetic::pow_backward(&inputs[0], &inputs[1], grad),
            OpKind::MatMul => linalg::matmul_backward(&inputs[0], &inputs[1], grad),
            OpKind::Negate => Ok(arithmetic::neg_backward(grad)),
            OpKind::Log => math_elem::log_backward(&inputs[0], grad),
            OpKind::Sum => reduction::sum_backward(&inputs[0], grad),
            OpKind::Relu => activation::relu_backward(&inputs[0], grad),
            OpKind::Sigmoid => activation::sigmoid_backward(output, grad),
        }
    }
}
