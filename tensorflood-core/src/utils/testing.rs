use approx::abs_diff_eq;

use crate::graph::{Graph, GraphScope};
use crate::tensor::Array;

/// Checks that an array has the expected shape and data within tolerance.
/// Panics with the first offending index otherwise.
pub fn check_array_near(
    actual: &Array,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    assert_eq!(actual.len(), expected_data.len(), "Data length mismatch");

    for (i, (a, e)) in actual.iter().zip(expected_data.iter()).enumerate() {
        if !abs_diff_eq!(*a, *e, epsilon = tolerance) {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, tolerance={:?}",
                i, a, e, tolerance
            );
        }
    }
}

/// Creates a fresh graph and enters its scope for the duration of a test.
pub fn test_scope() -> (Graph, GraphScope) {
    let _ = env_logger::builder().is_test(true).try_init();
    let graph = Graph::new();
    let scope = graph.enter();
    (graph, scope)
}
