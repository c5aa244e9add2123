//! Graph vertices.
//!
//! A [`Node`] is a cheap, clonable handle over shared node state. Cloning a
//! handle never copies the value: two operators that consume the same input
//! hold handles to the same state, which is how diamond dependencies arise.
//! Handles compare and hash by identity, never by value.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::{Result, TensorfloodError};
use crate::graph::Graph;
use crate::ops::OpKind;
use crate::tensor::{self, reduce_to_shape, zip_broadcast, Array};

/// What a node is, and for operators, what produced it.
#[derive(Debug)]
pub enum NodeKind {
    /// Immutable leaf.
    Constant,
    /// Mutable leaf, typically a trainable parameter.
    Variable,
    /// Result of applying an [`OpKind`] to earlier nodes.
    Operator(Operator),
}

impl NodeKind {
    /// Short label used in `Display` and debug output.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Constant => "Constant",
            NodeKind::Variable => "Variable",
            NodeKind::Operator(_) => "Operator",
        }
    }
}

/// The operator payload of a non-leaf node.
///
/// Inputs and their values are captured once, when the node is built; the
/// forward result is the node's value. None of them change afterwards.
#[derive(Debug)]
pub struct Operator {
    op: OpKind,
    inputs: Vec<Node>,
    input_values: Vec<Array>,
}

impl Operator {
    pub(crate) fn new(op: OpKind, inputs: Vec<Node>, input_values: Vec<Array>) -> Self {
        Operator {
            op,
            inputs,
            input_values,
        }
    }

    pub fn op(&self) -> OpKind {
        self.op
    }

    /// Operand nodes, in operand order.
    pub fn inputs(&self) -> &[Node] {
        &self.inputs
    }

    /// Operand values as they were when the operator was built.
    pub fn input_values(&self) -> &[Array] {
        &self.input_values
    }
}

pub(crate) struct NodeData {
    name: String,
    kind: NodeKind,
    value: RefCell<Array>,
    /// Gradient accumulator. Starts as a 0-d zero and takes the value's shape
    /// on the first accumulation.
    grad: RefCell<Array>,
}

impl Drop for NodeData {
    /// Releases the input chain with a worklist. Dropping a deep expression
    /// through the default recursive drop would use one stack frame per
    /// level.
    fn drop(&mut self) {
        let NodeKind::Operator(operator) = &mut self.kind else {
            return;
        };
        let mut pending = std::mem::take(&mut operator.inputs);
        while let Some(Node(data)) = pending.pop() {
            // Only the last handle detaches the inputs; other handles just
            // decrement the count.
            if let Ok(mut data) = Rc::try_unwrap(data) {
                if let NodeKind::Operator(inner) = &mut data.kind {
                    pending.append(&mut inner.inputs);
                }
            }
        }
    }
}

/// Identity of a node, stable for as long as any handle to it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Shared handle to a vertex of the computation graph.
#[derive(Clone)]
pub struct Node(Rc<NodeData>);

impl Node {
    pub(crate) fn from_parts(name: String, kind: NodeKind, value: Array) -> Node {
        Node(Rc::new(NodeData {
            name,
            kind,
            value: RefCell::new(value),
            grad: RefCell::new(tensor::scalar(0.0)),
        }))
    }

    /// Creates a constant in the active graph.
    ///
    /// Without a name, the node is called `Const/<n>` where `n` is the
    /// graph's running constant count.
    ///
    /// # Errors
    /// `TensorfloodError::NoActiveGraph` if no graph is active on this thread.
    pub fn constant(value: Array, name: Option<&str>) -> Result<Node> {
        Graph::active()?.constant(value, name)
    }

    /// Creates a variable in the active graph (auto-named `Var/<n>`).
    ///
    /// # Errors
    /// `TensorfloodError::NoActiveGraph` if no graph is active on this thread.
    pub fn variable(value: Array, name: Option<&str>) -> Result<Node> {
        Graph::active()?.variable(value, name)
    }

    /// Applies `op` to `inputs`, evaluating it immediately, and registers the
    /// result in the active graph.
    ///
    /// # Errors
    /// * `TensorfloodError::NoActiveGraph` if no graph is active.
    /// * `TensorfloodError::ArityMismatch` if `inputs` has the wrong length.
    /// * `TensorfloodError::Shape` if the operands' shapes are incompatible.
    pub fn operator(op: OpKind, inputs: Vec<Node>, name: Option<&str>) -> Result<Node> {
        Graph::active()?.operator(op, inputs, name)
    }

    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as usize)
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.0.kind, NodeKind::Operator(_))
    }

    /// The operator payload, or `None` for leaves.
    pub fn operator_data(&self) -> Option<&Operator> {
        match &self.0.kind {
            NodeKind::Operator(operator) => Some(operator),
            _ => None,
        }
    }

    pub fn op(&self) -> Option<OpKind> {
        self.operator_data().map(Operator::op)
    }

    /// Input nodes; empty for leaves.
    pub fn inputs(&self) -> &[Node] {
        match self.operator_data() {
            Some(operator) => operator.inputs(),
            None => &[],
        }
    }

    /// Returns a copy of the node's value.
    pub fn value(&self) -> Array {
        self.0.value.borrow().clone()
    }

    /// Temporary read access to the value. Drop the guard before calling
    /// `set_value` on the same node.
    pub fn borrow_value(&self) -> Ref<'_, Array> {
        self.0.value.borrow()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.0.value.borrow().shape().to_vec()
    }

    /// Replaces the value of a variable.
    ///
    /// # Errors
    /// `TensorfloodError::InvalidMutation` for constants and operators; their
    /// value is left unchanged.
    pub fn set_value(&self, value: Array) -> Result<()> {
        match self.0.kind {
            NodeKind::Variable => {
                *self.0.value.borrow_mut() = value;
                Ok(())
            }
            _ => Err(TensorfloodError::InvalidMutation {
                name: self.0.name.clone(),
            }),
        }
    }

    /// Returns a copy of the gradient accumulator.
    pub fn grad(&self) -> Array {
        self.0.grad.borrow().clone()
    }

    pub fn borrow_grad(&self) -> Ref<'_, Array> {
        self.0.grad.borrow()
    }

    /// Resets the gradient accumulator to a scalar zero.
    pub fn zero_grad(&self) {
        *self.0.grad.borrow_mut() = tensor::scalar(0.0);
    }

    /// Overwrites the accumulator with ones shaped like the value.
    pub(crate) fn seed_grad(&self) {
        let ones = tensor::ones(self.0.value.borrow().shape());
        *self.0.grad.borrow_mut() = ones;
    }

    /// Adds `contribution` into the accumulator after reducing it to the
    /// shape of this node's value.
    pub(crate) fn accumulate_grad(&self, contribution: &Array) -> Result<()> {
        let reduced = reduce_to_shape(contribution, self.0.value.borrow().shape())?;
        let mut grad = self.0.grad.borrow_mut();
        let summed = zip_broadcast(&grad, &reduced, |acc, g| acc + g)?;
        *grad = summed;
        Ok(())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.0.name)
            .field("kind", &self.0.kind.label())
            .field("shape", &self.shape())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0.value.borrow();
        match self.0.kind {
            NodeKind::Operator(_) => write!(f, "Operator: {}", self.0.name),
            ref leaf if value.ndim() == 1 => {
                write!(f, "{}: {}={}", leaf.label(), self.0.name, *value)
            }
            ref leaf => write!(f, "{}: {}", leaf.label(), self.0.name),
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;
