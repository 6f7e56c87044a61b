//! Immutable labelled-graph container for solved systems.
//!
//! Built once from the saturated inductive-form graph and never mutated
//! afterwards. Each node carries a label and its full context: the incoming
//! and outgoing `(neighbour, edge label)` lists, so walks in either
//! direction need no global index.

use crate::graph::NodeId;
use rustc_hash::FxHashMap;

/// One node's view of the graph: its label and both neighbourhoods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context<N, E> {
    /// The node label.
    pub label: N,
    /// Incoming `(neighbour, edge label)` pairs, in insertion order.
    pub incoming: Vec<(NodeId, E)>,
    /// Outgoing `(neighbour, edge label)` pairs, in insertion order.
    pub outgoing: Vec<(NodeId, E)>,
}

/// An immutable node- and edge-labelled graph.
#[derive(Debug, Clone)]
pub struct LabelledGraph<N, E> {
    contexts: FxHashMap<NodeId, Context<N, E>>,
    edge_count: usize,
}

impl<N, E: Clone> LabelledGraph<N, E> {
    /// Build a graph from node labels and labelled edges.
    ///
    /// Every edge endpoint must appear in `nodes`; dangling endpoints are an
    /// invariant violation.
    pub fn build(
        nodes: impl IntoIterator<Item = (NodeId, N)>,
        edges: impl IntoIterator<Item = (NodeId, NodeId, E)>,
    ) -> Self {
        let mut contexts: FxHashMap<NodeId, Context<N, E>> = nodes
            .into_iter()
            .map(|(id, label)| {
                (
                    id,
                    Context {
                        label,
                        incoming: Vec::new(),
                        outgoing: Vec::new(),
                    },
                )
            })
            .collect();
        let mut edge_count = 0;
        for (src, dst, label) in edges {
            {
                let out = contexts
                    .get_mut(&src)
                    .expect("edge source is not a graph node");
                out.outgoing.push((dst, label.clone()));
            }
            let inc = contexts
                .get_mut(&dst)
                .expect("edge target is not a graph node");
            inc.incoming.push((src, label));
            edge_count += 1;
        }
        Self {
            contexts,
            edge_count,
        }
    }

    /// The full context of a node.
    #[must_use]
    pub fn context(&self, id: NodeId) -> Option<&Context<N, E>> {
        self.contexts.get(&id)
    }

    /// The label of a node.
    #[must_use]
    pub fn node_label(&self, id: NodeId) -> Option<&N> {
        self.contexts.get(&id).map(|c| &c.label)
    }

    /// Incoming `(neighbour, edge label)` pairs of a node.
    #[must_use]
    pub fn preds(&self, id: NodeId) -> &[(NodeId, E)] {
        self.contexts
            .get(&id)
            .map_or(&[], |c| c.incoming.as_slice())
    }

    /// Outgoing `(neighbour, edge label)` pairs of a node.
    #[must_use]
    pub fn succs(&self, id: NodeId) -> &[(NodeId, E)] {
        self.contexts
            .get(&id)
            .map_or(&[], |c| c.outgoing.as_slice())
    }

    /// The node ids, in id order.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.contexts.keys().copied().collect();
        nodes.sort_unstable();
        nodes
    }

    /// The edges as `(src, dst, label)` triples, ordered by endpoints.
    #[must_use]
    pub fn edges(&self) -> Vec<(NodeId, NodeId, E)> {
        let mut edges: Vec<(NodeId, NodeId, E)> = self
            .contexts
            .iter()
            .flat_map(|(&src, c)| {
                c.outgoing
                    .iter()
                    .map(move |(dst, label)| (src, *dst, label.clone()))
            })
            .collect();
        edges.sort_by_key(|&(src, dst, _)| (src, dst));
        edges
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.contexts.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
