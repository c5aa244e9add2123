use std::fmt::Debug;

use tensorflood_core::Node;

use crate::error::NnError;

/// Anything that maps an input node to an output node through trainable
/// variables.
pub trait Module: Debug {
    /// Builds the module's expression on top of `input` in the active graph.
    fn forward(&self, input: &Node) -> Result<Node, NnError>;

    /// Trainable variables, in a stable order.
    fn parameters(&self) -> Vec<Node>;

    /// Parameters paired with their node names.
    fn named_parameters(&self) -> Vec<(String, Node)> {
        self.parameters()
            .into_iter()
            .map(|param| (param.name().to_string(), param))
            .collect()
    }
}
