//! Reverse-mode differentiation.
//!
//! - [`topo`]: dependency-first ordering of the DAG rooted at a node.
//! - [`backward`]: the engine behind [`Node::backward`](crate::Node::backward).
//! - [`grad_check`]: finite-difference verification of analytical gradients.

pub mod backward;
pub mod grad_check;
pub mod topo;

pub use grad_check::{check_grad, GradCheckError};
pub use topo::topological_sort;
