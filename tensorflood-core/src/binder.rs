//! Arithmetic sugar over [`Node`].
//!
//! Every arithmetic entry point (the `*_op` functions, the std operator
//! traits, and the named methods) converts its operands through one
//! function, [`Operand::into_node`]: nodes pass through, numeric scalars
//! become fresh constants, and anything else is rejected with
//! `TensorfloodError::IncompatibleType`. Operands are checked before any
//! constant is created, and a construction that fails part way removes the
//! nodes it already registered.
//!
//! All results are `Result<Node>`, since building a node can fail (no active
//! graph, incompatible shapes):
//!
//! ```no_run
//! # use tensorflood_core::{tensor, Graph, Node, TensorfloodError};
//! # fn main() -> Result<(), TensorfloodError> {
//! # let graph = Graph::new();
//! # let _scope = graph.enter();
//! let x = Node::variable(tensor::vector(&[1.0, 2.0]), None)?;
//! let y = ((&x * 3.0)? - 1.0)?.sigmoid()?.sum()?;
//! # Ok(())
//! # }
//! ```
//!
//! Subtraction has no operator variant of its own: `a - b` builds
//! `add(a, neg(b))`, one extra node per subtraction.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{Result, TensorfloodError};
use crate::graph::Graph;
use crate::node::Node;
use crate::ops::OpKind;
use crate::tensor::{self, Array};

/// Anything that may appear on either side of a node operator.
#[derive(Debug, Clone)]
pub enum Operand {
    Node(Node),
    Scalar(f64),
    /// Raw arrays are not coerced: wrap them in a constant explicitly.
    Array(Array),
}

fn incompatible(array: &Array) -> TensorfloodError {
    TensorfloodError::IncompatibleType {
        found: format!("array of shape {:?}", array.shape()),
    }
}

impl Operand {
    /// Fails with `TensorfloodError::IncompatibleType` if the operand can
    /// never become a node. Creates nothing.
    pub fn check(&self) -> Result<()> {
        match self {
            Operand::Array(array) => Err(incompatible(array)),
            Operand::Node(_) | Operand::Scalar(_) => Ok(()),
        }
    }

    /// Converts the operand into a graph node, creating a constant in the
    /// active graph for scalars.
    ///
    /// # Errors
    /// * `TensorfloodError::IncompatibleType` for array operands.
    /// * `TensorfloodError::NoActiveGraph` when a constant is needed and no
    ///   graph is active.
    pub fn into_node(self) -> Result<Node> {
        match self {
            Operand::Node(node) => Ok(node),
            Operand::Scalar(value) => Node::constant(tensor::scalar(value), None),
            Operand::Array(array) => Err(incompatible(&array)),
        }
    }
}

impl From<Node> for Operand {
    fn from(node: Node) -> Self {
        Operand::Node(node)
    }
}

impl From<&Node> for Operand {
    fn from(node: &Node) -> Self {
        Operand::Node(node.clone())
    }
}

impl From<Array> for Operand {
    fn from(array: Array) -> Self {
        Operand::Array(array)
    }
}

macro_rules! impl_scalar_operand {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(value: $t) -> Self {
                    Operand::Scalar(f64::from(value))
                }
            }
        )*
    };
}

impl_scalar_operand!(f64, f32, i32, u32, i16, u16, i8, u8);

// Operands are checked before anything is created, and the whole
// construction runs atomically, so a failure leaves the graph untouched.
fn binary(op: OpKind, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Node> {
    let (lhs, rhs) = (lhs.into(), rhs.into());
    lhs.check()?;
    rhs.check()?;
    Graph::active()?.atomically(|| {
        let lhs = lhs.into_node()?;
        let rhs = rhs.into_node()?;
        Node::operator(op, vec![lhs, rhs], None)
    })
}

fn unary(op: OpKind, operand: impl Into<Operand>) -> Result<Node> {
    let operand = operand.into();
    operand.check()?;
    Graph::active()?.atomically(|| {
        let operand = operand.into_node()?;
        Node::operator(op, vec![operand], None)
    })
}

pub fn add_op(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Node> {
    binary(OpKind::Add, lhs, rhs)
}

/// `lhs + (-rhs)`.
pub fn sub_op(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Node> {
    let (lhs, rhs) = (lhs.into(), rhs.into());
    lhs.check()?;
    rhs.check()?;
    Graph::active()?.atomically(|| {
        let lhs = lhs.into_node()?;
        let negated = neg_op(rhs)?;
        Node::operator(OpKind::Add, vec![lhs, negated], None)
    })
}

pub fn mul_op(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Node> {
    binary(OpKind::Multiply, lhs, rhs)
}

pub fn div_op(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Node> {
    binary(OpKind::Divide, lhs, rhs)
}

pub fn pow_op(base: impl Into<Operand>, exponent: impl Into<Operand>) -> Result<Node> {
    binary(OpKind::Power, base, exponent)
}

pub fn matmul_op(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Node> {
    binary(OpKind::MatMul, lhs, rhs)
}

pub fn neg_op(operand: impl Into<Operand>) -> Result<Node> {
    unary(OpKind::Negate, operand)
}

impl Node {
    /// `self ** exponent`, element-wise.
    pub fn pow(&self, exponent: impl Into<Operand>) -> Result<Node> {
        pow_op(self, exponent)
    }

    /// Matrix product `self @ other` (see [`crate::ops::linalg`] for the
    /// accepted ranks).
    pub fn matmul(&self, other: impl Into<Operand>) -> Result<Node> {
        matmul_op(self, other)
    }

    /// Element-wise natural logarithm.
    pub fn log(&self) -> Result<Node> {
        unary(OpKind::Log, self)
    }

    /// Sum of all elements, as a 0-d node.
    pub fn sum(&self) -> Result<Node> {
        unary(OpKind::Sum, self)
    }

    pub fn relu(&self) -> Result<Node> {
        unary(OpKind::Relu, self)
    }

    pub fn sigmoid(&self) -> Result<Node> {
        unary(OpKind::Sigmoid, self)
    }
}

macro_rules! impl_binary_trait {
    ($trait:ident, $method:ident, $func:ident) => {
        impl<R: Into<Operand>> $trait<R> for Node {
            type Output = Result<Node>;

            fn $method(self, rhs: R) -> Result<Node> {
                $func(self, rhs)
            }
        }

        impl<R: Into<Operand>> $trait<R> for &Node {
            type Output = Result<Node>;

            fn $method(self, rhs: R) -> Result<Node> {
                $func(self, rhs)
            }
        }

        impl $trait<Node> for f64 {
            type Output = Result<Node>;

            fn $method(self, rhs: Node) -> Result<Node> {
                $func(self, rhs)
            }
        }

        impl $trait<&Node> for f64 {
            type Output = Result<Node>;

            fn $method(self, rhs: &Node) -> Result<Node> {
                $func(self, rhs)
            }
        }
    };
}

impl_binary_trait!(Add, add, add_op);
impl_binary_trait!(Sub, sub, sub_op);
impl_binary_trait!(Mul, mul, mul_op);
impl_binary_trait!(Div, div, div_op);

impl Neg for Node {
    type Output = Result<Node>;

    fn neg(self) -> Result<Node> {
        neg_op(self)
    }
}

impl Neg for &Node {
    type Output = Result<Node>;

    fn neg(self) -> Result<Node> {
        neg_op(self)
    }
}

#[cfg(test)]
#[path = "binder_test.rs"]
mod tests;
