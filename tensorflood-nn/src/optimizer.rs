use log::{debug, warn};
use tensorflood_core::{tensor, Node};

use crate::error::NnError;

/// Updates a fixed set of parameters from their accumulated gradients.
pub trait Optimizer {
    /// Applies one update to every parameter.
    fn step(&mut self) -> Result<(), NnError>;

    /// Resets every parameter's gradient to zero. Call before each backward
    /// pass, since leaf gradients accumulate.
    fn zero_grad(&self);
}

/// Plain gradient descent: `p <- p - lr * grad(p)`.
#[derive(Debug)]
pub struct GradientDescent {
    params: Vec<Node>,
    lr: f64,
}

fn validate_lr(lr: f64) -> Result<f64, NnError> {
    if lr.is_finite() && lr > 0.0 {
        Ok(lr)
    } else {
        Err(NnError::InvalidLearningRate(lr))
    }
}

impl GradientDescent {
    /// # Errors
    /// `NnError::InvalidLearningRate` unless `lr` is finite and positive.
    pub fn new(params: Vec<Node>, lr: f64) -> Result<Self, NnError> {
        let lr = validate_lr(lr)?;
        debug!("GradientDescent over {} parameters, lr={}", params.len(), lr);
        Ok(GradientDescent { params, lr })
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr
    }

    pub fn set_learning_rate(&mut self, lr: f64) -> Result<(), NnError> {
        self.lr = validate_lr(lr)?;
        Ok(())
    }

    pub fn params(&self) -> &[Node] {
        &self.params
    }
}

impl Optimizer for GradientDescent {
    fn step(&mut self) -> Result<(), NnError> {
        let lr = self.lr;
        for param in &self.params {
            let grad = param.grad();
            if grad.ndim() == 0 && param.borrow_value().ndim() != 0 {
                warn!("Parameter '{}' has no gradient; leaving it unchanged", param.name());
                continue;
            }
            let updated = tensor::zip_broadcast(&param.borrow_value(), &grad, |p, g| p - lr * g)?;
            param.set_value(updated)?;
        }
        Ok(())
    }

    fn zero_grad(&self) {
        self.params.iter().for_each(Node::zero_grad);
    }
}
