use approx::assert_abs_diff_eq;
use tensorflood_core::{tensor, Array, Graph, GraphScope, Node};

// Shared by several test binaries; not every binary uses every helper.
#[allow(dead_code)]
pub fn fresh_graph() -> (Graph, GraphScope) {
    let _ = env_logger::builder().is_test(true).try_init();
    let graph = Graph::new();
    let scope = graph.enter();
    (graph, scope)
}

#[allow(dead_code)]
pub fn variable(data: Vec<f64>, shape: &[usize]) -> Node {
    let value = tensor::from_vec(data, shape).expect("Test array creation failed");
    Node::variable(value, None).expect("Test variable creation failed")
}

#[allow(dead_code)]
pub fn assert_array_eq(actual: &Array, expected_shape: &[usize], expected_data: &[f64]) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    for (a, e) in actual.iter().zip(expected_data) {
        assert_abs_diff_eq!(*a, *e, epsilon = 1e-9);
    }
    assert_eq!(actual.len(), expected_data.len(), "Data length mismatch");
}
