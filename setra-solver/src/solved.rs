//! Solved systems and the least-solution query.
//!
//! After saturation the builder's graph is frozen into an immutable
//! snapshot. Queries walk the snapshot only; nothing mutates after the
//! freeze, so a solved system can be shared across threads and queried
//! concurrently.

use crate::builder::SolverStats;
use crate::graph::{EdgeLabel, IfGraph, NodeId};
use crate::labelled::LabelledGraph;
use rustc_hash::FxHashSet;
use setra_core::{ConstraintError, SetExpr};
use std::collections::BTreeMap;

/// An immutable solved constraint system.
///
/// Holds the saturated graph as a frozen labelled-graph snapshot together
/// with the expression-to-id map (which resolves collapsed expressions to
/// their representative) and the solve-time statistics.
#[derive(Debug, Clone)]
pub struct SolvedSystem<V, C> {
    graph: LabelledGraph<SetExpr<V, C>, EdgeLabel>,
    ids: BTreeMap<SetExpr<V, C>, NodeId>,
    stats: SolverStats,
}

impl<V, C> SolvedSystem<V, C>
where
    V: Clone + Ord,
    C: Clone + Ord,
{
    pub(crate) fn freeze(
        graph: &IfGraph,
        ids: BTreeMap<SetExpr<V, C>, NodeId>,
        exprs: Vec<SetExpr<V, C>>,
        stats: SolverStats,
    ) -> Self {
        let nodes = graph
            .nodes()
            .into_iter()
            .map(|id| (id, exprs[id.index()].clone()));
        let snapshot = LabelledGraph::build(nodes, graph.edges());
        Self {
            graph: snapshot,
            ids,
            stats,
        }
    }

    /// The constructed terms that must belong to the least solution of
    /// variable `v`.
    ///
    /// Walks backward over incoming edges from the variable's node, visiting
    /// each node at most once; every edge means "source is included in
    /// target", so everything reached flows into `v`. Fails with
    /// [`ConstraintError::NoVariableLabel`] if the system never saw `v`.
    pub fn least_solution(&self, v: &V) -> Result<Vec<SetExpr<V, C>>, ConstraintError<V, C>> {
        let key = SetExpr::Variable(v.clone());
        let Some(&start) = self.ids.get(&key) else {
            return Err(ConstraintError::NoVariableLabel(v.clone()));
        };

        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut stack = vec![start];
        let mut members = Vec::new();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(expr) = self.graph.node_label(id)
                && expr.is_term()
            {
                members.push(expr.clone());
            }
            for &(pred, _) in self.graph.preds(id) {
                if !visited.contains(&pred) {
                    stack.push(pred);
                }
            }
        }
        Ok(members)
    }

    /// Debug projection of the solved graph: the `(id, expression)` node
    /// table and the `(src, dst, label)` edge list, both in id order.
    #[must_use]
    pub fn graph_elems(&self) -> (Vec<(NodeId, &SetExpr<V, C>)>, Vec<(NodeId, NodeId, EdgeLabel)>) {
        let nodes = self
            .graph
            .nodes()
            .into_iter()
            .filter_map(|id| self.graph.node_label(id).map(|expr| (id, expr)))
            .collect();
        (nodes, self.graph.edges())
    }

    /// The counters accumulated while solving.
    #[must_use]
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }
}
