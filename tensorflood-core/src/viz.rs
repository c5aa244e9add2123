//! Graphviz export of the graph upstream of a node.

use crate::autograd::topological_sort;
use crate::node::Node;

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Renders every node `root` depends on (and `root` itself) as a DOT
/// `digraph`.
///
/// Nodes are circles identified by their full name and labelled with the
/// part of the name before the first `/` (`Var/3` shows as `Var`). Each
/// edge runs from an input to the operator consuming it and carries the
/// input's name.
pub fn to_dot(root: &Node) -> String {
    let order = topological_sort(root);
    let mut dot = String::from("digraph G {\n    rankdir=LR;\n    node [shape=circle];\n");

    for node in &order {
        let label = node.name().split('/').next().unwrap_or_default();
        dot.push_str(&format!("    {} [label={}];\n", quote(node.name()), quote(label)));
    }
    for node in &order {
        for input in node.inputs() {
            dot.push_str(&format!(
                "    {} -> {} [label={}];\n",
                quote(input.name()),
                quote(node.name()),
                quote(input.name())
            ));
        }
    }

    dot.push_str("}\n");
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::vector;
    use crate::utils::testing::test_scope;

    #[test]
    fn test_to_dot_lists_nodes_and_edges() {
        let (_graph, _scope) = test_scope();
        let x = Node::variable(vector(&[1.0, 2.0]), None).unwrap();
        let y = (&x * &x).unwrap().sum().unwrap();

        let dot = to_dot(&y);
        assert!(dot.starts_with("digraph G {\n    rankdir=LR;"));
        assert!(dot.contains("\"Var/0\" [label=\"Var\"];"));
        assert!(dot.contains("\"mul/0\" [label=\"mul\"];"));
        assert!(dot.contains("\"sum/0\" [label=\"sum\"];"));
        // Diamond: both operands of the product are the same variable.
        assert_eq!(dot.matches("\"Var/0\" -> \"mul/0\" [label=\"Var/0\"];").count(), 2);
        assert!(dot.contains("\"mul/0\" -> \"sum/0\" [label=\"mul/0\"];"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_to_dot_escapes_quotes() {
        let (_graph, _scope) = test_scope();
        let c = Node::constant(vector(&[1.0]), Some("say \"hi\"")).unwrap();
        let dot = to_dot(&c);
        assert!(dot.contains("\"say \\\"hi\\\"\" [label=\"say \\\"hi\\\"\"];"));
    }
}
