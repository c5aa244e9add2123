use std::collections::HashSet;

use log::trace;

use crate::node::{Node, NodeId};

/// Orders the DAG rooted at `root` so that every node comes after all of its
/// inputs. `root` is last; each node appears exactly once.
///
/// Depth-first post-order over inputs in operand order, with a visited set
/// keyed by node identity, so the cost is linear in nodes plus edges. The
/// walk keeps its own stack, so graph depth is bounded by memory only.
pub fn topological_sort(root: &Node) -> Vec<Node> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut sorted = Vec::new();
    // Each entry is a node and the index of the next input to visit.
    let mut stack: Vec<(Node, usize)> = vec![(root.clone(), 0)];
    visited.insert(root.id());

    while let Some((node, next)) = stack.last_mut() {
        let input = node.inputs().get(*next).cloned();
        *next += 1;
        match input {
            Some(input) => {
                if visited.insert(input.id()) {
                    stack.push((input, 0));
                }
            }
            None => {
                if let Some((done, _)) = stack.pop() {
                    trace!("[topological_sort] {} at position {}", done.name(), sorted.len());
                    sorted.push(done);
                }
            }
        }
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::OpKind;
    use crate::tensor::scalar;
    use crate::utils::testing::test_scope;

    fn position(order: &[Node], node: &Node) -> usize {
        order.iter().position(|n| n == node).expect("node missing from order")
    }

    #[test]
    fn test_leaf_sorts_to_itself() {
        let (_graph, _scope) = test_scope();
        let x = Node::variable(scalar(1.0), None).unwrap();
        assert_eq!(topological_sort(&x), vec![x]);
    }

    #[test]
    fn test_diamond_visits_shared_node_once() {
        let (_graph, _scope) = test_scope();
        let a = Node::variable(scalar(2.0), Some("a")).unwrap();
        let left = Node::operator(OpKind::Log, vec![a.clone()], None).unwrap();
        let right = Node::operator(OpKind::Negate, vec![a.clone()], None).unwrap();
        let top = Node::operator(OpKind::Add, vec![left.clone(), right.clone()], None).unwrap();

        let order = topological_sort(&top);
        assert_eq!(order.len(), 4);
        assert_eq!(order.iter().filter(|n| **n == a).count(), 1);
        assert_eq!(order.last(), Some(&top));
        assert!(position(&order, &a) < position(&order, &left));
        assert!(position(&order, &a) < position(&order, &right));
        assert!(position(&order, &left) < position(&order, &top));
    }

    #[test]
    fn test_every_node_after_its_transitive_inputs() {
        let (_graph, _scope) = test_scope();
        let x = Node::variable(scalar(1.5), None).unwrap();
        let k = Node::constant(scalar(3.0), None).unwrap();
        let mut current = x.clone();
        for i in 0..6 {
            let op = if i % 2 == 0 { OpKind::Multiply } else { OpKind::Add };
            let step = Node::operator(op, vec![current.clone(), k.clone()], None).unwrap();
            current = Node::operator(OpKind::Add, vec![step, x.clone()], None).unwrap();
        }

        let order = topological_sort(&current);
        for (i, node) in order.iter().enumerate() {
            for input in node.inputs() {
                assert!(
                    position(&order, input) < i,
                    "{} precedes its input {}",
                    node.name(),
                    input.name()
                );
            }
        }
        let unique: HashSet<NodeId> = order.iter().map(Node::id).collect();
        assert_eq!(unique.len(), order.len());
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let (_graph, _scope) = test_scope();
        let x = Node::variable(scalar(1.0), None).unwrap();
        let mut current = x.clone();
        for _ in 0..50_000 {
            current = Node::operator(OpKind::Negate, vec![current], None).unwrap();
        }
        let order = topological_sort(&current);
        assert_eq!(order.len(), 50_001);
        assert_eq!(order.first(), Some(&x));
        assert_eq!(order.last(), Some(&current));
    }

    #[test]
    fn test_same_input_twice() {
        let (_graph, _scope) = test_scope();
        let a = Node::variable(scalar(3.0), None).unwrap();
        let sq = Node::operator(OpKind::Multiply, vec![a.clone(), a.clone()], None).unwrap();
        assert_eq!(topological_sort(&sq), vec![a, sq]);
    }
}
