use tensorflood_core::autograd::check_grad;
use tensorflood_core::{tensor, Node, OpKind, TensorfloodError};

mod common;
use common::{assert_array_eq, fresh_graph, variable};

#[test]
fn test_shared_input_accumulates_over_both_paths() {
    let (_graph, _scope) = fresh_graph();
    let a = Node::variable(tensor::vector(&[3.0]), Some("a")).unwrap();
    let c = ((&a * &a).unwrap() + &a).unwrap();
    c.backward().unwrap();
    // d/da (a*a + a) = 2a + 1
    assert_array_eq(&a.grad(), &[1], &[7.0]);
}

#[test]
fn test_broadcast_add_gradient_takes_operand_shape() {
    let (_graph, _scope) = fresh_graph();
    let a = variable(vec![1.0; 12], &[3, 4]);
    let b = variable(vec![0.5, 1.5, 2.5, 3.5], &[4]);
    let out = (&a + &b).unwrap().sum().unwrap();
    out.backward().unwrap();

    assert_array_eq(&a.grad(), &[3, 4], &[1.0; 12]);
    assert_array_eq(&b.grad(), &[4], &[3.0, 3.0, 3.0, 3.0]);
}

#[test]
fn test_square_plus_log() {
    let (_graph, _scope) = fresh_graph();
    let x = Node::variable(tensor::vector(&[2.0]), Some("x")).unwrap();
    let y = ((&x * &x).unwrap() + x.log().unwrap()).unwrap();
    y.backward().unwrap();
    assert_array_eq(&y.value(), &[1], &[4.0 + 2.0f64.ln()]);
    assert_array_eq(&x.grad(), &[1], &[4.5]);
}

#[test]
fn test_matmul_gradients() {
    let (_graph, _scope) = fresh_graph();
    let a = variable(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let b = variable(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]);
    let out = a.matmul(&b).unwrap().sum().unwrap();
    out.backward().unwrap();

    // ones(2,2) @ B^T and A^T @ ones(2,2)
    assert_array_eq(&a.grad(), &[2, 2], &[11.0, 15.0, 11.0, 15.0]);
    assert_array_eq(&b.grad(), &[2, 2], &[4.0, 4.0, 6.0, 6.0]);
}

#[test]
fn test_repeated_backward_accumulates_into_leaves_only() {
    let (_graph, _scope) = fresh_graph();
    let x = Node::variable(tensor::vector(&[1.0, 2.0]), None).unwrap();
    let sq = (&x * &x).unwrap();
    let y = sq.sum().unwrap();

    y.backward().unwrap();
    y.backward().unwrap();
    assert_array_eq(&x.grad(), &[2], &[4.0, 8.0]);
    assert_array_eq(&sq.grad(), &[2], &[1.0, 1.0]);
}

#[test]
fn test_shape_mismatch_is_reported_and_nothing_registered() {
    let (graph, _scope) = fresh_graph();
    let a = variable(vec![1.0, 2.0, 3.0], &[3]);
    let b = variable(vec![1.0, 2.0], &[2]);
    let before = graph.len();

    assert!(matches!((&a + &b).unwrap_err(), TensorfloodError::Shape(_)));
    assert!(matches!(a.matmul(&b).unwrap_err(), TensorfloodError::Shape(_)));
    assert_eq!(graph.len(), before);
}

#[test]
fn test_arity_is_checked() {
    let (_graph, _scope) = fresh_graph();
    let a = variable(vec![1.0], &[1]);
    let err = Node::operator(OpKind::Add, vec![a], None).unwrap_err();
    assert_eq!(
        err,
        TensorfloodError::ArityMismatch {
            op: OpKind::Add,
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn test_composite_expression_passes_grad_check() {
    let (_graph, _scope) = fresh_graph();
    let w = variable(vec![0.3, -0.2, 0.5, 0.1, -0.4, 0.2], &[3, 2]);
    let b = variable(vec![0.1, -0.1], &[2]);
    let x_value = tensor::from_vec(vec![1.0, 2.0, -1.0, 0.5, 0.0, 1.5], &[2, 3]).unwrap();
    let x = Node::constant(x_value, None).unwrap();

    let func = |xs: &[Node]| -> Result<Node, TensorfloodError> {
        let hidden = (xs[2].matmul(&xs[0])? + &xs[1])?.sigmoid()?;
        let shifted = (1.0 - &hidden)?;
        (&hidden * &shifted.log()?)?.sum()
    };
    check_grad(func, &[w, b, x], 1e-6, 1e-4).unwrap();
}
