use log::{debug, trace};

use crate::autograd::topo::topological_sort;
use crate::error::{Result, TensorfloodError};
use crate::node::Node;
use crate::tensor::Array;

impl Node {
    /// Computes the gradient of this node with respect to every node it
    /// depends on, accumulating into their gradient accumulators.
    ///
    /// The node's own accumulator is overwritten with 1. Accumulators of the
    /// operator nodes between it and the leaves are reset first, so they
    /// only ever hold this pass's gradient; leaf accumulators keep summing
    /// across calls until [`Node::zero_grad`] is called on them.
    ///
    /// # Errors
    /// * `TensorfloodError::BackwardNonScalar` if the node holds more than one
    ///   element. No accumulator is touched in that case.
    /// * `TensorfloodError::Shape` if a gradient cannot be reduced onto an
    ///   input's shape.
    pub fn backward(&self) -> Result<()> {
        let numel = self.borrow_value().len();
        if numel != 1 {
            return Err(TensorfloodError::BackwardNonScalar {
                name: self.name().to_string(),
                shape: self.shape(),
            });
        }

        let order = topological_sort(self);
        debug!("Backward from '{}' over {} nodes", self.name(), order.len());

        for node in order.iter().filter(|n| !n.is_leaf()) {
            node.zero_grad();
        }
        self.seed_grad();

        for node in order.iter().rev() {
            let Some(operator) = node.operator_data() else {
                continue;
            };
            trace!("Propagating through '{}'", node.name());

            let contributions = node.backward_contribution(&node.grad())?;

            for (input, contribution) in operator.inputs().iter().zip(&contributions) {
                input.accumulate_grad(contribution)?;
            }
        }

        debug!("Backward from '{}' done", self.name());
        Ok(())
    }

    /// Gradients of this node's inputs given the gradient `output_grad` of
    /// its output, one per input in operand order, not yet reduced to the
    /// inputs' shapes. Leaves have no inputs and return an empty vector.
    pub fn backward_contribution(&self, output_grad: &Array) -> Result<Vec<Array>> {
        match self.operator_data() {
            Some(operator) => {
                let output = self.borrow_value();
                operator.op().backward(operator.input_values(), &output, output_grad)
            }
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
