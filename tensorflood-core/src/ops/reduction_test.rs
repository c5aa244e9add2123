use super::*;
use crate::tensor::{from_vec, scalar, to_scalar, vector};
use crate::utils::testing::check_array_near;

#[test]
fn test_sum_forward_is_zero_dimensional() {
    let a = from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    let out = sum_forward(&a);
    assert_eq!(out.ndim(), 0);
    assert_eq!(to_scalar(&out), Some(10.0));
}

#[test]
fn test_sum_forward_empty() {
    let a = vector(&[]);
    assert_eq!(to_scalar(&sum_forward(&a)), Some(0.0));
}

#[test]
fn test_sum_backward_broadcasts_gradient() {
    let a = from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    let grads = sum_backward(&a, &scalar(2.5)).unwrap();
    check_array_near(&grads[0], &[2, 3], &[2.5; 6], 1e-12);
}

#[test]
fn test_sum_backward_rejects_non_broadcastable_gradient() {
    let a = vector(&[1.0, 2.0, 3.0]);
    assert!(sum_backward(&a, &vector(&[1.0, 2.0])).is_err());
}
