//! Loss functions assembled from graph operators, so their gradients come
//! from the engine like any other expression.

use tensorflood_core::Node;

use crate::error::NnError;

/// How per-element losses are folded into the returned scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduction {
    #[default]
    Mean,
    Sum,
}

fn reduce(losses: &Node, reduction: Reduction) -> Result<Node, NnError> {
    let total = losses.sum()?;
    match reduction {
        Reduction::Sum => Ok(total),
        Reduction::Mean => {
            let count = losses.borrow_value().len().max(1) as f64;
            Ok((total / count)?)
        }
    }
}

/// Squared error `(prediction - target)^2`, reduced.
pub fn mse_loss(prediction: &Node, target: &Node, reduction: Reduction) -> Result<Node, NnError> {
    let diff = (prediction - target)?;
    let squared = (&diff * &diff)?;
    reduce(&squared, reduction)
}

/// Binary cross-entropy `-(t log p + (1 - t) log(1 - p))`, reduced.
///
/// `prediction` holds probabilities; values of exactly 0 or 1 give
/// infinite losses.
pub fn bce_loss(prediction: &Node, target: &Node, reduction: Reduction) -> Result<Node, NnError> {
    let positive = (target * prediction.log()?)?;
    let negative = ((1.0 - target)? * (1.0 - prediction)?.log()?)?;
    let losses = (-(positive + negative)?)?;
    reduce(&losses, reduction)
}
