//! # tensorflood-core
//!
//! Eager (define-by-run) reverse-mode automatic differentiation over dense
//! `f64` tensors.
//!
//! Building an expression out of [`Node`]s evaluates it immediately and
//! records a directed acyclic graph of operator nodes. Calling
//! [`Node::backward`] on a scalar result walks that graph in reverse
//! topological order and accumulates the gradient of the result into every
//! upstream node.
//!
//! ```no_run
//! use tensorflood_core::{tensor, Graph, Node};
//!
//! # fn main() -> Result<(), tensorflood_core::TensorfloodError> {
//! let graph = Graph::new();
//! let _scope = graph.enter();
//!
//! let x = Node::variable(tensor::vector(&[2.0]), Some("x"))?;
//! let y = ((&x * &x)? + &x.log()?)?;
//! y.backward()?;
//! assert!((x.grad()[[0]] - 4.5).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

pub mod autograd;
pub mod binder;
pub mod error;
pub mod graph;
pub mod node;
pub mod ops;
pub mod tensor;
pub mod viz;

#[cfg(test)]
pub(crate) mod utils;

// Re-export the main types so they are reachable as `tensorflood_core::Node` etc.
pub use binder::Operand;
pub use error::{Result, TensorfloodError};
pub use graph::{Graph, GraphScope};
pub use node::{Node, NodeId, NodeKind, Operator};
pub use ops::OpKind;
pub use tensor::Array;

// Re-export the array crate so downstream crates agree on the version.
pub use ndarray;
