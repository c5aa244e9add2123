use log::debug;
use thiserror::Error;

use crate::error::TensorfloodError;
use crate::node::{Node, NodeKind};
use crate::tensor::{reduce_to_shape, to_scalar, Array};

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error(
        "Gradient mismatch at input {input_index}[{element_index}]: {analytical} vs {numerical}"
    )]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical: f64,
        numerical: f64,
        difference: f64,
    },

    #[error("Gradient check needs a single-element output, got shape {shape:?}")]
    NonScalarOutput { shape: Vec<usize> },

    #[error("Non-finite numerical gradient at input {input_index}[{element_index}]")]
    NumericalGradNotFinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Engine error during gradient check: {0}")]
    Engine(#[from] TensorfloodError),
}

/// Checks analytical gradients against central finite differences.
///
/// `func` rebuilds the expression from `inputs` and must return a
/// single-element node. Every variable in `inputs` is probed element by
/// element: its value is nudged by `±epsilon`, `func` is re-run, and the
/// slope of the output is compared with the gradient one `backward()`
/// produced. Constants in `inputs` are passed through but not probed.
///
/// A probe fails when `|analytical - numerical| > tolerance * (1 + |numerical|)`.
/// Input values are restored after every probe, also on error.
pub fn check_grad<F>(
    func: F,
    inputs: &[Node],
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Node]) -> Result<Node, TensorfloodError>,
{
    for input in inputs {
        input.zero_grad();
    }
    let output = func(inputs)?;
    if output.borrow_value().len() != 1 {
        return Err(GradCheckError::NonScalarOutput { shape: output.shape() });
    }
    output.backward()?;

    for (input_index, input) in inputs.iter().enumerate() {
        if !matches!(input.kind(), NodeKind::Variable) {
            continue;
        }
        let original = input.value();
        let analytical = reduce_to_shape(&input.grad(), original.shape())?;

        for (element_index, &analytical_grad) in analytical.iter().enumerate() {
            let loss_plus = probe(&func, inputs, input, &original, element_index, epsilon);
            let loss_minus = probe(&func, inputs, input, &original, element_index, -epsilon);
            input.set_value(original.clone())?;
            let (loss_plus, loss_minus) = (loss_plus?, loss_minus?);

            let numerical = (loss_plus - loss_minus) / (2.0 * epsilon);
            if !numerical.is_finite() {
                return Err(GradCheckError::NumericalGradNotFinite {
                    input_index,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }

            let difference = (analytical_grad - numerical).abs();
            if difference > tolerance * (1.0 + numerical.abs()) {
                return Err(GradCheckError::GradientMismatch {
                    input_index,
                    element_index,
                    analytical: analytical_grad,
                    numerical,
                    difference,
                });
            }
        }
        debug!("check_grad: input {} ('{}') ok", input_index, input.name());
    }
    Ok(())
}

/// Evaluates `func` with one element of `input` shifted by `delta`.
fn probe<F>(
    func: &F,
    inputs: &[Node],
    input: &Node,
    original: &Array,
    element_index: usize,
    delta: f64,
) -> Result<f64, GradCheckError>
where
    F: Fn(&[Node]) -> Result<Node, TensorfloodError>,
{
    let mut shifted = original.clone();
    if let Some(element) = shifted.iter_mut().nth(element_index) {
        *element += delta;
    }
    input.set_value(shifted)?;
    let output = func(inputs)?;
    let value = output.value();
    to_scalar(&value).ok_or(GradCheckError::NonScalarOutput { shape: value.shape().to_vec() })
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
