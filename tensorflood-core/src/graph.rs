//! The graph registry.
//!
//! A [`Graph`] keeps every node built while it is active, split into
//! constants, variables and operators, together with one naming counter per
//! node kind (two leaf kinds plus one per [`OpKind`]). Node constructors
//! register into the thread's *active* graph; there is never an implicit
//! default graph.
//!
//! The active graph is thread-local. [`Graph::enter`] activates a graph for a
//! lexical scope and restores the previously active graph when the returned
//! [`GraphScope`] is dropped, so scopes nest.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace, warn};

use crate::error::{Result, TensorfloodError};
use crate::node::{Node, NodeId, NodeKind, Operator};
use crate::ops::OpKind;
use crate::tensor::Array;

thread_local! {
    static ACTIVE_GRAPH: RefCell<Option<Graph>> = RefCell::new(None);
}

/// Key of a naming counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Constant,
    Variable,
    Operator(OpKind),
}

impl NodeTag {
    /// Prefix of auto-generated names: `Const`, `Var`, or the operator's.
    pub fn prefix(self) -> &'static str {
        match self {
            NodeTag::Constant => "Const",
            NodeTag::Variable => "Var",
            NodeTag::Operator(op) => op.prefix(),
        }
    }

    fn of(kind: &NodeKind) -> NodeTag {
        match kind {
            NodeKind::Constant => NodeTag::Constant,
            NodeKind::Variable => NodeTag::Variable,
            NodeKind::Operator(operator) => NodeTag::Operator(operator.op()),
        }
    }
}

#[derive(Default)]
struct GraphData {
    constants: HashMap<NodeId, Node>,
    variables: HashMap<NodeId, Node>,
    operators: HashMap<NodeId, Node>,
    counters: HashMap<NodeTag, usize>,
    /// Nodes registered since the outermost open [`Graph::atomically`] call.
    journal: Option<Vec<NodeId>>,
}

/// Shared handle to a node registry. Clones refer to the same registry.
#[derive(Clone, Default)]
pub struct Graph(Rc<RefCell<GraphData>>);

impl Graph {
    /// Creates an empty, inactive graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the graph active on this thread.
    ///
    /// # Errors
    /// `TensorfloodError::NoActiveGraph` if none is.
    pub fn active() -> Result<Graph> {
        ACTIVE_GRAPH
            .with(|active| active.borrow().clone())
            .ok_or(TensorfloodError::NoActiveGraph)
    }

    pub fn is_active(&self) -> bool {
        ACTIVE_GRAPH.with(|active| active.borrow().as_ref().map_or(false, |g| g.ptr_eq(self)))
    }

    /// Makes this graph the target of node registration on this thread,
    /// replacing any other active graph.
    pub fn activate(&self) {
        ACTIVE_GRAPH.with(|active| *active.borrow_mut() = Some(self.clone()));
        debug!("Activated graph ({} nodes)", self.len());
    }

    /// Clears the active graph if it is this one.
    pub fn deactivate(&self) {
        ACTIVE_GRAPH.with(|active| {
            let mut active = active.borrow_mut();
            if active.as_ref().map_or(false, |g| g.ptr_eq(self)) {
                *active = None;
                debug!("Deactivated graph");
            } else {
                warn!("deactivate() called on a graph that is not active; ignoring");
            }
        });
    }

    /// Activates this graph until the returned scope is dropped.
    ///
    /// On drop, the previously active graph (if any) is restored and this
    /// graph's naming counters are reset. Registered nodes are kept; call
    /// [`Graph::reset`] to drop them.
    pub fn enter(&self) -> GraphScope {
        let previous = ACTIVE_GRAPH.with(|active| active.borrow_mut().replace(self.clone()));
        debug!("Entered graph scope");
        GraphScope {
            graph: self.clone(),
            previous,
        }
    }

    /// Empties the three registries and restarts every naming counter at 0.
    ///
    /// Handles held outside the graph stay valid; the graph simply stops
    /// keeping their nodes alive.
    pub fn reset(&self) {
        let mut data = self.0.borrow_mut();
        debug!(
            "Resetting graph: {} constants, {} variables, {} operators",
            data.constants.len(),
            data.variables.len(),
            data.operators.len()
        );
        data.constants.clear();
        data.variables.clear();
        data.operators.clear();
        data.counters.clear();
    }

    /// Restarts every naming counter at 0 without touching the registries.
    pub fn reset_counters(&self) {
        self.0.borrow_mut().counters.clear();
    }

    /// Current value of the naming counter for `tag`.
    pub fn count(&self, tag: NodeTag) -> usize {
        self.0.borrow().counters.get(&tag).copied().unwrap_or(0)
    }

    pub fn constants(&self) -> Vec<Node> {
        self.0.borrow().constants.values().cloned().collect()
    }

    pub fn variables(&self) -> Vec<Node> {
        self.0.borrow().variables.values().cloned().collect()
    }

    pub fn operators(&self) -> Vec<Node> {
        self.0.borrow().operators.values().cloned().collect()
    }

    pub fn contains(&self, node: &Node) -> bool {
        let data = self.0.borrow();
        let id = node.id();
        data.constants.contains_key(&id)
            || data.variables.contains_key(&id)
            || data.operators.contains_key(&id)
    }

    /// Total number of registered nodes.
    pub fn len(&self) -> usize {
        let data = self.0.borrow();
        data.constants.len() + data.variables.len() + data.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zeroes the gradient accumulator of every registered node.
    pub fn zero_grad(&self) {
        let data = self.0.borrow();
        data.constants
            .values()
            .chain(data.variables.values())
            .chain(data.operators.values())
            .for_each(Node::zero_grad);
    }

    /// Creates a constant registered in this graph, active or not.
    pub fn constant(&self, value: Array, name: Option<&str>) -> Result<Node> {
        let name = self.next_name(NodeTag::Constant, name);
        let node = Node::from_parts(name, NodeKind::Constant, value);
        self.register(&node);
        Ok(node)
    }

    /// Creates a variable registered in this graph, active or not.
    pub fn variable(&self, value: Array, name: Option<&str>) -> Result<Node> {
        let name = self.next_name(NodeTag::Variable, name);
        let node = Node::from_parts(name, NodeKind::Variable, value);
        self.register(&node);
        Ok(node)
    }

    /// Evaluates `op` on the current values of `inputs` and registers the
    /// resulting operator node in this graph.
    ///
    /// Nothing is registered (and no name is consumed) if the forward
    /// computation fails.
    pub fn operator(&self, op: OpKind, inputs: Vec<Node>, name: Option<&str>) -> Result<Node> {
        op.check_arity(inputs.len())?;
        let input_values: Vec<Array> = inputs.iter().map(Node::value).collect();
        let value = op.forward(&input_values)?;

        let name = self.next_name(NodeTag::Operator(op), name);
        let kind = NodeKind::Operator(Operator::new(op, inputs, input_values));
        let node = Node::from_parts(name, kind, value);
        self.register(&node);
        Ok(node)
    }

    /// Advances the counter for `tag` and returns the node's name: the
    /// explicit one if given, `<prefix>/<index>` otherwise.
    fn next_name(&self, tag: NodeTag, name: Option<&str>) -> String {
        let mut data = self.0.borrow_mut();
        let counter = data.counters.entry(tag).or_insert(0);
        let index = *counter;
        *counter += 1;
        match name {
            Some(name) => name.to_string(),
            None => format!("{}/{}", tag.prefix(), index),
        }
    }

    /// Runs `build`, which may create several nodes in this graph, as one
    /// unit: if it fails, every node it registered is removed again and the
    /// naming counters are restored. Nested calls join the outermost one.
    pub(crate) fn atomically<T>(&self, build: impl FnOnce() -> Result<T>) -> Result<T> {
        let counters = {
            let mut data = self.0.borrow_mut();
            if data.journal.is_some() {
                None
            } else {
                data.journal = Some(Vec::new());
                Some(data.counters.clone())
            }
        };
        let Some(counters) = counters else {
            return build();
        };

        let result = build();
        let mut discarded = Vec::new();
        {
            let mut data = self.0.borrow_mut();
            let journal = data.journal.take().unwrap_or_default();
            if result.is_err() {
                for id in &journal {
                    discarded.extend(data.constants.remove(id));
                    discarded.extend(data.operators.remove(id));
                    discarded.extend(data.variables.remove(id));
                }
                data.counters = counters;
            }
        }
        if !discarded.is_empty() {
            debug!("Rolled back {} nodes from a failed construction", discarded.len());
        }
        result
    }

    fn register(&self, node: &Node) {
        trace!("Registering {} '{}'", node.kind().label(), node.name());
        let mut data = self.0.borrow_mut();
        if let Some(journal) = data.journal.as_mut() {
            journal.push(node.id());
        }
        let set = match NodeTag::of(node.kind()) {
            NodeTag::Constant => &mut data.constants,
            NodeTag::Variable => &mut data.variables,
            NodeTag::Operator(_) => &mut data.operators,
        };
        set.insert(node.id(), node.clone());
    }

    fn ptr_eq(&self, other: &Graph) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Graph {}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Graph")
            .field("constants", &data.constants.len())
            .field("variables", &data.variables.len())
            .field("operators", &data.operators.len())
            .finish()
    }
}

/// Guard returned by [`Graph::enter`].
#[must_use = "dropping the scope immediately deactivates the graph"]
pub struct GraphScope {
    graph: Graph,
    previous: Option<Graph>,
}

impl GraphScope {
    /// The graph this scope activated.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

impl Drop for GraphScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // The thread-local may already be gone during thread teardown.
        let _ = ACTIVE_GRAPH.try_with(|active| *active.borrow_mut() = previous);
        self.graph.reset_counters();
        debug!("Left graph scope");
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
