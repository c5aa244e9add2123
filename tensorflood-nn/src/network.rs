use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tensorflood_core::{tensor, Array, Node};

use crate::error::NnError;
use crate::linear::Linear;
use crate::module::Module;

/// A stack of [`Linear`] layers ending in a sigmoid, for binary
/// classification.
#[derive(Debug)]
pub struct NeuralNetwork {
    layers: Vec<Linear>,
}

impl NeuralNetwork {
    /// Builds layers `Linear_0 .. Linear_{n-1}` with sizes
    /// `input_dim -> units[0] -> ... -> units[n-1]`.
    ///
    /// # Errors
    /// * `NnError::EmptyNetwork` if `units` is empty.
    /// * `NnError::InvalidLayerSize` if any size is zero.
    /// * `NnError::Engine` if no graph is active.
    pub fn new<R: Rng + ?Sized>(
        input_dim: usize,
        units: &[usize],
        rng: &mut R,
    ) -> Result<Self, NnError> {
        if units.is_empty() {
            return Err(NnError::EmptyNetwork);
        }
        let sizes: Vec<usize> = std::iter::once(input_dim).chain(units.iter().copied()).collect();
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let last_layer = i == units.len() - 1;
                Linear::new(&format!("Linear_{}", i), pair[0], pair[1], last_layer, &mut *rng)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Built network with layer sizes {:?}", sizes);
        Ok(NeuralNetwork { layers })
    }

    pub fn with_seed(input_dim: usize, units: &[usize], seed: u64) -> Result<Self, NnError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(input_dim, units, &mut rng)
    }

    pub fn layers(&self) -> &[Linear] {
        &self.layers
    }

    /// Runs the network on `inputs` (one sample per row) and thresholds the
    /// output probabilities at 0.5 into class labels `0.0` / `1.0`.
    ///
    /// The input is wrapped in a constant of the active graph.
    pub fn predict(&self, inputs: &Array) -> Result<Array, NnError> {
        let x = Node::constant(inputs.clone(), None)?;
        let probabilities = self.forward(&x)?.value();
        Ok(probabilities.mapv(|p| if p < 0.5 { 0.0 } else { 1.0 }))
    }
}

impl Module for NeuralNetwork {
    fn forward(&self, input: &Node) -> Result<Node, NnError> {
        self.layers.iter().try_fold(input.clone(), |z, layer| layer.forward(&z))
    }

    fn parameters(&self) -> Vec<Node> {
        self.layers.iter().flat_map(Module::parameters).collect()
    }
}

/// Fraction of predictions equal to their label.
pub fn accuracy(predictions: &Array, labels: &Array) -> Result<f64, NnError> {
    let hits = tensor::zip_broadcast(predictions, labels, |p, y| if p == y { 1.0 } else { 0.0 })?;
    if hits.is_empty() {
        return Ok(0.0);
    }
    Ok(hits.sum() / hits.len() as f64)
}
