//! Mutable inductive-form constraint graph.
//!
//! A labelled multigraph over dense integer node ids with two edge colours,
//! [`EdgeLabel::Pred`] and [`EdgeLabel::Succ`]. Each node keeps separate
//! incoming and outgoing adjacency lists; an endpoint-pair index gives an
//! O(1) answer to "is there any edge from `src` to `dst`". Self loops and
//! duplicate `(src, dst, label)` triples are invariant violations and abort.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// A dense integer node id, assigned in order of first sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node id from a raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The id as a table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Edge colour of the inductive-form graph.
///
/// A `Var ⊆ Var` inclusion is a `Pred` edge when the source variable orders
/// below the target and a `Succ` edge otherwise; term-to-variable edges are
/// `Pred`, variable-to-term edges are `Succ`. Saturation composes `Pred`
/// with `Succ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeLabel {
    /// Predecessor edge.
    Pred,
    /// Successor edge.
    Succ,
}

impl EdgeLabel {
    /// The other colour.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Pred => Self::Succ,
            Self::Succ => Self::Pred,
        }
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pred => write!(f, "pred"),
            Self::Succ => write!(f, "succ"),
        }
    }
}

type AdjList = SmallVec<[(NodeId, EdgeLabel); 4]>;

#[derive(Debug, Default)]
struct Adjacency {
    incoming: AdjList,
    outgoing: AdjList,
}

/// The mutable inductive-form graph.
#[derive(Debug, Default)]
pub struct IfGraph {
    adjacency: FxHashMap<NodeId, Adjacency>,
    endpoint_index: FxHashSet<(NodeId, NodeId)>,
    edge_count: usize,
}

impl IfGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Idempotent.
    pub fn insert_node(&mut self, id: NodeId) {
        self.adjacency.entry(id).or_default();
    }

    /// Check whether a node is present.
    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Insert an edge. The caller guarantees the `(src, dst, label)` triple
    /// is new and `src != dst`; both are asserted.
    pub fn insert_edge(&mut self, src: NodeId, dst: NodeId, label: EdgeLabel) {
        assert_ne!(src, dst, "self loop on {src}");
        let out = self.adjacency.entry(src).or_default();
        assert!(
            !out.outgoing.iter().any(|&(n, l)| n == dst && l == label),
            "duplicate {label} edge {src} -> {dst}"
        );
        out.outgoing.push((dst, label));
        self.adjacency.entry(dst).or_default().incoming.push((src, label));
        self.endpoint_index.insert((src, dst));
        self.edge_count += 1;
    }

    /// Check whether any edge, of either label, runs from `src` to `dst`.
    #[must_use]
    pub fn edge_exists(&self, src: NodeId, dst: NodeId) -> bool {
        self.endpoint_index.contains(&(src, dst))
    }

    /// Remove a node and every incident edge, fixing counterpart adjacency.
    pub fn remove_node(&mut self, id: NodeId) {
        let Some(adjacency) = self.adjacency.remove(&id) else {
            return;
        };
        for &(src, label) in &adjacency.incoming {
            if let Some(n) = self.adjacency.get_mut(&src) {
                n.outgoing.retain(|(d, l)| !(*d == id && *l == label));
            }
            self.endpoint_index.remove(&(src, id));
            self.edge_count -= 1;
        }
        for &(dst, label) in &adjacency.outgoing {
            if let Some(n) = self.adjacency.get_mut(&dst) {
                n.incoming.retain(|(s, l)| !(*s == id && *l == label));
            }
            self.endpoint_index.remove(&(id, dst));
            self.edge_count -= 1;
        }
    }

    /// Incoming `(neighbour, label)` pairs for edges into `id`.
    #[must_use]
    pub fn preds(&self, id: NodeId) -> &[(NodeId, EdgeLabel)] {
        self.adjacency
            .get(&id)
            .map_or(&[], |a| a.incoming.as_slice())
    }

    /// Outgoing `(neighbour, label)` pairs for edges out of `id`.
    #[must_use]
    pub fn succs(&self, id: NodeId) -> &[(NodeId, EdgeLabel)] {
        self.adjacency
            .get(&id)
            .map_or(&[], |a| a.outgoing.as_slice())
    }

    /// Fold over the `(neighbour, label)` pairs of edges into `id`.
    pub fn fold_pred<A>(&self, id: NodeId, acc: A, mut f: impl FnMut(A, NodeId, EdgeLabel) -> A) -> A {
        self.preds(id)
            .iter()
            .fold(acc, |acc, &(n, l)| f(acc, n, l))
    }

    /// Fold over the `(neighbour, label)` pairs of edges out of `id`.
    pub fn fold_succ<A>(&self, id: NodeId, acc: A, mut f: impl FnMut(A, NodeId, EdgeLabel) -> A) -> A {
        self.succs(id)
            .iter()
            .fold(acc, |acc, &(n, l)| f(acc, n, l))
    }

    /// Snapshot of the node set, in id order.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.adjacency.keys().copied().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Snapshot of the edge set, in `(src, dst, label)` order.
    #[must_use]
    pub fn edges(&self) -> Vec<(NodeId, NodeId, EdgeLabel)> {
        let mut edges: Vec<(NodeId, NodeId, EdgeLabel)> = self
            .adjacency
            .iter()
            .flat_map(|(&src, a)| a.outgoing.iter().map(move |&(dst, l)| (src, dst, l)))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
