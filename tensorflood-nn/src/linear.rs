use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use tensorflood_core::{tensor, Node};

use crate::error::NnError;
use crate::module::Module;

/// Fully connected layer: `act(x @ W + b)`.
///
/// Hidden layers use `relu`; the last layer of a network uses `sigmoid`.
#[derive(Debug)]
pub struct Linear {
    name: String,
    weight: Node,
    bias: Node,
    in_features: usize,
    out_features: usize,
    last_layer: bool,
}

impl Linear {
    /// Creates the layer's variables in the active graph.
    ///
    /// The weight, named `<name>_W`, has shape `[in_features, out_features]`
    /// and is drawn from `Uniform(-1, 1)`; the bias `<name>_b` starts at zero.
    ///
    /// # Errors
    /// * `NnError::InvalidLayerSize` if either dimension is zero.
    /// * `NnError::Engine` if no graph is active.
    pub fn new<R: Rng + ?Sized>(
        name: &str,
        in_features: usize,
        out_features: usize,
        last_layer: bool,
        rng: &mut R,
    ) -> Result<Self, NnError> {
        if in_features == 0 || out_features == 0 {
            return Err(NnError::InvalidLayerSize {
                name: name.to_string(),
                in_features,
                out_features,
            });
        }

        let dist = Uniform::new(-1.0, 1.0);
        let weight_data: Vec<f64> = (0..in_features * out_features)
            .map(|_| dist.sample(rng))
            .collect();
        let weight_value = tensor::from_vec(weight_data, &[in_features, out_features])?;

        let weight = Node::variable(weight_value, Some(&format!("{}_W", name)))?;
        let bias = Node::variable(tensor::zeros(&[out_features]), Some(&format!("{}_b", name)))?;
        debug!("Created layer '{}' ({} -> {})", name, in_features, out_features);

        Ok(Linear {
            name: name.to_string(),
            weight,
            bias,
            in_features,
            out_features,
            last_layer,
        })
    }

    /// Same as [`Linear::new`] with a `StdRng` seeded from `seed`.
    pub fn with_seed(
        name: &str,
        in_features: usize,
        out_features: usize,
        last_layer: bool,
        seed: u64,
    ) -> Result<Self, NnError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(name, in_features, out_features, last_layer, &mut rng)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> &Node {
        &self.weight
    }

    pub fn bias(&self) -> &Node {
        &self.bias
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn is_last_layer(&self) -> bool {
        self.last_layer
    }
}

impl Module for Linear {
    fn forward(&self, input: &Node) -> Result<Node, NnError> {
        let z = (input.matmul(&self.weight)? + &self.bias)?;
        let out = if self.last_layer { z.sigmoid()? } else { z.relu()? };
        Ok(out)
    }

    fn parameters(&self) -> Vec<Node> {
        vec![self.weight.clone(), self.bias.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensorflood_core::{Graph, OpKind};

    #[test]
    fn test_linear_creates_named_variables() {
        let graph = Graph::new();
        let _scope = graph.enter();
        let layer = Linear::with_seed("fc", 3, 2, false, 7).unwrap();

        assert_eq!(layer.weight().name(), "fc_W");
        assert_eq!(layer.bias().name(), "fc_b");
        assert_eq!(layer.weight().shape(), vec![3, 2]);
        assert_eq!(layer.bias().value(), tensor::zeros(&[2]));
        assert!(layer.weight().value().iter().all(|w| (-1.0..1.0).contains(w)));
        assert_eq!(graph.variables().len(), 2);
    }

    #[test]
    fn test_same_seed_same_weights() {
        let graph = Graph::new();
        let _scope = graph.enter();
        let a = Linear::with_seed("a", 4, 3, false, 42).unwrap();
        let b = Linear::with_seed("b", 4, 3, false, 42).unwrap();
        assert_eq!(a.weight().value(), b.weight().value());
    }

    #[test]
    fn test_forward_activation_depends_on_position() {
        let graph = Graph::new();
        let _scope = graph.enter();
        let x = Node::constant(tensor::from_vec(vec![1.0, -1.0], &[1, 2]).unwrap(), None).unwrap();

        let hidden = Linear::with_seed("h", 2, 3, false, 1).unwrap();
        let out = hidden.forward(&x).unwrap();
        assert_eq!(out.op(), Some(OpKind::Relu));
        assert_eq!(out.shape(), vec![1, 3]);
        assert!(out.value().iter().all(|&v| v >= 0.0));

        let last = Linear::with_seed("o", 3, 1, true, 1).unwrap();
        let prob = last.forward(&out).unwrap();
        assert_eq!(prob.op(), Some(OpKind::Sigmoid));
        assert!(prob.value().iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_zero_sized_layer_is_rejected() {
        let graph = Graph::new();
        let _scope = graph.enter();
        let err = Linear::with_seed("bad", 0, 3, false, 0).unwrap_err();
        assert!(matches!(err, NnError::InvalidLayerSize { in_features: 0, .. }));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_linear_needs_active_graph() {
        let err = Linear::with_seed("fc", 2, 2, false, 0).unwrap_err();
        assert_eq!(err, NnError::Engine(tensorflood_core::TensorfloodError::NoActiveGraph));
    }
}
