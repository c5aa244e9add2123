use super::*;
use crate::tensor::vector;
use crate::utils::testing::check_array_near;

#[test]
fn test_relu_forward() {
    let a = vector(&[-1.0, 0.0, 2.0]);
    check_array_near(&relu_forward(&a), &[3], &[0.0, 0.0, 2.0], 1e-12);
}

#[test]
fn test_relu_backward_masks_non_positive() {
    let a = vector(&[-1.0, 0.0, 2.0]);
    let grads = relu_backward(&a, &vector(&[5.0, 5.0, 5.0])).unwrap();
    check_array_near(&grads[0], &[3], &[0.0, 0.0, 5.0], 1e-12);
}

#[test]
fn test_sigmoid_forward() {
    let a = vector(&[0.0, 100.0, -100.0]);
    check_array_near(&sigmoid_forward(&a), &[3], &[0.5, 1.0, 0.0], 1e-12);
}

#[test]
fn test_sigmoid_backward_uses_cached_output() {
    let a = vector(&[0.0, 1.0]);
    let s = sigmoid_forward(&a);
    let grads = sigmoid_backward(&s, &vector(&[1.0, 2.0])).unwrap();
    let s1 = 1.0 / (1.0 + (-1.0_f64).exp());
    check_array_near(&grads[0], &[2], &[0.25, 2.0 * s1 * (1.0 - s1)], 1e-12);
}
