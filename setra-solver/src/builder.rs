//! Constraint-graph construction, online cycle elimination, and saturation.
//!
//! The builder owns the id-assignment map, the append-only id table, the
//! mutable inductive-form graph, and the cycle-detection budget. Atomic
//! inclusions become labelled edges; inserting a `Var ⊆ Var` edge may
//! trigger a search for an opposite-label chain closing a cycle, in which
//! case the chain collapses onto its minimum-id representative. Saturation
//! then composes `Pred` segments with `Succ` edges to a fixed point.

use crate::graph::{EdgeLabel, IfGraph, NodeId};
use crate::solved::SolvedSystem;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use setra_core::{ConstraintError, ConstraintSystem, Inclusion, SetExpr, simplify, simplify_inclusion};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::debug;

/// Configuration for a solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Collapse cycles online during edge insertion. Cycle elimination is an
    /// optimisation: the least solution is identical either way.
    pub remove_cycles: bool,
    /// Total number of nodes cycle detection may visit across the whole
    /// solve; once exhausted, later searches degrade to "no chain". `None`
    /// means unlimited.
    pub cycle_budget: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            remove_cycles: true,
            cycle_budget: None,
        }
    }
}

/// Counters accumulated during a solve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Expression nodes allocated.
    pub nodes_created: u64,
    /// Edges inserted into the graph.
    pub edges_inserted: u64,
    /// Cycle-chain searches performed.
    pub chain_searches: u64,
    /// Nodes visited across all chain searches.
    pub chain_nodes_visited: u64,
    /// Cycles collapsed.
    pub cycles_collapsed: u64,
    /// Nodes removed by cycle collapse.
    pub nodes_collapsed: u64,
    /// Saturation rounds run.
    pub saturation_rounds: u64,
    /// Whether the cycle-detection budget ran out.
    pub budget_exhausted: bool,
}

/// Pairs of `Pred`-segment endpoints that new saturation work must consider.
type Affected = FxHashSet<(NodeId, NodeId)>;

pub(crate) struct Builder<V, C> {
    /// Expression to node id. After cycle collapse several expressions map
    /// to the same representative id.
    ids: BTreeMap<SetExpr<V, C>, NodeId>,
    /// Node id to the expression it was allocated for. Append-only; entries
    /// for collapsed nodes stay in place, unused except for re-lookup.
    exprs: Vec<SetExpr<V, C>>,
    graph: IfGraph,
    /// Remaining cycle-detection budget.
    budget: Option<u64>,
    config: SolverConfig,
    stats: SolverStats,
}

impl<V, C> Builder<V, C>
where
    V: Clone + Ord + Debug,
    C: Clone + Ord + Debug,
{
    pub(crate) fn new(config: SolverConfig) -> Self {
        Self {
            ids: BTreeMap::new(),
            exprs: Vec::new(),
            graph: IfGraph::new(),
            budget: config.cycle_budget,
            config,
            stats: SolverStats::default(),
        }
    }

    /// Solve a system: simplify, build the initial graph, saturate, freeze.
    pub(crate) fn solve(
        mut self,
        system: &ConstraintSystem<V, C>,
    ) -> Result<SolvedSystem<V, C>, ConstraintError<V, C>> {
        let atomic = simplify(system)?;
        let remove_cycles = self.config.remove_cycles;
        let mut affected = Affected::default();
        for inclusion in &atomic {
            self.add_inclusion(remove_cycles, &mut affected, inclusion)?;
        }
        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "initial graph built"
        );
        self.saturate()?;
        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            rounds = self.stats.saturation_rounds,
            "saturation reached fixed point"
        );
        Ok(SolvedSystem::freeze(
            &self.graph,
            self.ids,
            self.exprs,
            self.stats,
        ))
    }

    /// Look up or allocate the node id for an expression. A hit may return a
    /// representative installed by an earlier cycle collapse.
    fn node_for(&mut self, expr: &SetExpr<V, C>) -> NodeId {
        if let Some(&id) = self.ids.get(expr) {
            return id;
        }
        let id = NodeId::new(u32::try_from(self.exprs.len()).expect("node id space exhausted"));
        self.exprs.push(expr.clone());
        self.graph.insert_node(id);
        self.ids.insert(expr.clone(), id);
        self.stats.nodes_created += 1;
        id
    }

    fn expr(&self, id: NodeId) -> &SetExpr<V, C> {
        &self.exprs[id.index()]
    }

    /// Insert one atomic inclusion as a labelled edge.
    ///
    /// Variable pairs orient by key order: the smaller variable gets a
    /// `Pred` edge to the larger, the larger a `Succ` edge to the smaller.
    /// A non-variable left side is a `Pred` edge into the variable; a
    /// non-variable right side is a `Succ` edge out of it. Anything else is
    /// a programming error: simplification never emits it.
    fn add_inclusion(
        &mut self,
        remove_cycles: bool,
        affected: &mut Affected,
        inclusion: &Inclusion<V, C>,
    ) -> Result<(), ConstraintError<V, C>> {
        match (&inclusion.lhs, &inclusion.rhs) {
            (SetExpr::Variable(a), SetExpr::Variable(b)) => {
                assert!(a != b, "same-variable inclusion reached the builder");
                let label = if a < b { EdgeLabel::Pred } else { EdgeLabel::Succ };
                self.add_edge(remove_cycles, affected, label, &inclusion.lhs, &inclusion.rhs)
            }
            (SetExpr::Term(_) | SetExpr::UniversalSet, SetExpr::Variable(_)) => self.add_edge(
                remove_cycles,
                affected,
                EdgeLabel::Pred,
                &inclusion.lhs,
                &inclusion.rhs,
            ),
            (SetExpr::Variable(_), SetExpr::Term(_) | SetExpr::EmptySet) => self.add_edge(
                remove_cycles,
                affected,
                EdgeLabel::Succ,
                &inclusion.lhs,
                &inclusion.rhs,
            ),
            _ => panic!("non-atomic inclusion reached the builder: {inclusion:?}"),
        }
    }

    fn add_edge(
        &mut self,
        remove_cycles: bool,
        affected: &mut Affected,
        label: EdgeLabel,
        lhs: &SetExpr<V, C>,
        rhs: &SetExpr<V, C>,
    ) -> Result<(), ConstraintError<V, C>> {
        let src = self.node_for(lhs);
        let dst = self.node_for(rhs);
        if src == dst || self.graph.edge_exists(src, dst) {
            return Ok(());
        }
        // Only variable cycles collapse: a chain through a term node would
        // take its variable-to-term edge with it, and later lower bounds on
        // the merged variable could no longer decompose against the term.
        // Saturation handles such cycles on its own.
        if remove_cycles
            && lhs.is_variable()
            && rhs.is_variable()
            && let Some(chain) = self.chain_between(label.opposite(), src, dst)
        {
            return self.collapse_chain(affected, &chain);
        }
        self.simple_add_edge(affected, label, src, dst);
        Ok(())
    }

    /// Search for a chain of `target`-labelled edges from `to` back to
    /// `from`, walking incoming edges depth-first starting at `from` and
    /// stepping only across variable nodes.
    ///
    /// Returns the node ids along the successful branch, endpoints
    /// included. Budget exhaustion degrades to "no chain"; collapse is an
    /// optimisation, never a soundness requirement.
    fn chain_between(
        &mut self,
        target: EdgeLabel,
        from: NodeId,
        to: NodeId,
    ) -> Option<Vec<NodeId>> {
        self.stats.chain_searches += 1;
        let mut visited = FxHashSet::default();
        let mut chain = Vec::new();
        if self.chain_dfs(target, from, to, &mut visited, &mut chain) {
            Some(chain)
        } else {
            None
        }
    }

    fn chain_dfs(
        &mut self,
        target: EdgeLabel,
        node: NodeId,
        to: NodeId,
        visited: &mut FxHashSet<NodeId>,
        chain: &mut Vec<NodeId>,
    ) -> bool {
        if node == to {
            chain.push(node);
            return true;
        }
        if !visited.insert(node) {
            return false;
        }
        if !self.consume_budget() {
            return false;
        }
        let steps: SmallVec<[NodeId; 8]> = self
            .graph
            .preds(node)
            .iter()
            .filter(|&&(pred, label)| label == target && self.exprs[pred.index()].is_variable())
            .map(|&(pred, _)| pred)
            .collect();
        for pred in steps {
            if self.chain_dfs(target, pred, to, visited, chain) {
                chain.push(node);
                return true;
            }
        }
        false
    }

    fn consume_budget(&mut self) -> bool {
        self.stats.chain_nodes_visited += 1;
        match &mut self.budget {
            None => true,
            Some(0) => {
                self.stats.budget_exhausted = true;
                false
            }
            Some(remaining) => {
                *remaining -= 1;
                true
            }
        }
    }

    /// Collapse a chain of provably-equal variable nodes onto its minimum
    /// id.
    ///
    /// Out-of-chain neighbour edges are re-emitted as inclusions against the
    /// representative and re-inserted through the ordinary path, so the
    /// graph invariants stay enforced by a single insertion routine.
    /// Intra-chain edges are dropped with the removed nodes.
    fn collapse_chain(
        &mut self,
        affected: &mut Affected,
        chain: &[NodeId],
    ) -> Result<(), ConstraintError<V, C>> {
        let rep = *chain.iter().min().expect("chain is never empty");
        let in_chain: FxHashSet<NodeId> = chain.iter().copied().collect();
        self.stats.cycles_collapsed += 1;
        debug!(len = chain.len(), rep = %rep, "collapsing cycle");

        let mut emitted: Vec<Inclusion<V, C>> = Vec::new();
        for &node in chain {
            if node == rep {
                continue;
            }
            for &(src, _) in self.graph.preds(node) {
                if !in_chain.contains(&src) {
                    emitted.push(Inclusion::new(self.expr(src).clone(), self.expr(rep).clone()));
                }
            }
            for &(dst, _) in self.graph.succs(node) {
                if !in_chain.contains(&dst) {
                    emitted.push(Inclusion::new(self.expr(rep).clone(), self.expr(dst).clone()));
                }
            }
        }

        for &node in chain {
            if node == rep {
                continue;
            }
            self.graph.remove_node(node);
            let original = self.exprs[node.index()].clone();
            self.ids.insert(original, rep);
            self.stats.nodes_collapsed += 1;
        }

        // Chain nodes are all variables, so every redirected inclusion is
        // atomic and re-inserts directly. Cycle elimination stays off here
        // to bound the recursion.
        for inclusion in &emitted {
            self.add_inclusion(false, affected, inclusion)?;
        }
        Ok(())
    }

    /// Insert the edge and record the segments new saturation work must
    /// consider: the edge itself for `Pred`, and every `Pred` segment ending
    /// at the source for `Succ`.
    fn simple_add_edge(
        &mut self,
        affected: &mut Affected,
        label: EdgeLabel,
        src: NodeId,
        dst: NodeId,
    ) {
        self.graph.insert_edge(src, dst, label);
        self.stats.edges_inserted += 1;
        match label {
            EdgeLabel::Pred => {
                affected.insert((src, dst));
            }
            EdgeLabel::Succ => {
                let segments: SmallVec<[NodeId; 8]> = self
                    .graph
                    .preds(src)
                    .iter()
                    .filter(|&&(_, l)| l == EdgeLabel::Pred)
                    .map(|&(p, _)| p)
                    .collect();
                for p in segments {
                    affected.insert((p, src));
                }
            }
        }
    }

    /// Close the graph under composition of `Pred` segments with `Succ`
    /// edges.
    ///
    /// The worklist starts as every `Pred` edge of the initial graph and is
    /// refreshed each round from the edges the round inserted. Nodes removed
    /// by a collapse leave stale pairs behind; their adjacency is empty and
    /// their expressions re-resolve to the representative, so stale work is
    /// harmless.
    fn saturate(&mut self) -> Result<(), ConstraintError<V, C>> {
        let mut worklist: Affected = self
            .graph
            .edges()
            .into_iter()
            .filter(|&(_, _, label)| label == EdgeLabel::Pred)
            .map(|(src, dst, _)| (src, dst))
            .collect();

        while !worklist.is_empty() {
            self.stats.saturation_rounds += 1;
            let mut candidates: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
            for &(l, x) in &worklist {
                for &(r, label) in self.graph.succs(x) {
                    if label == EdgeLabel::Succ && l != r && !self.graph.edge_exists(l, r) {
                        candidates.insert((l, r));
                    }
                }
            }
            if candidates.is_empty() {
                break;
            }

            let mut next = Affected::default();
            for (l, r) in candidates {
                let induced = Inclusion::new(self.expr(l).clone(), self.expr(r).clone());
                for atomic in simplify_inclusion(&induced)? {
                    self.add_inclusion(self.config.remove_cycles, &mut next, &atomic)?;
                }
            }
            worklist = next;
        }
        Ok(())
    }
}

/// The solver: a configuration wrapper around one-shot builds.
///
/// Constraints cannot be added after solving; each call to [`Solver::solve`]
/// runs a fresh build to completion and returns an immutable
/// [`SolvedSystem`].
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// A solver with the default configuration (cycle elimination on,
    /// unlimited budget).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A solver with an explicit configuration.
    #[must_use]
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve a constraint system down to its least-solution form.
    pub fn solve<V, C>(
        &self,
        system: &ConstraintSystem<V, C>,
    ) -> Result<SolvedSystem<V, C>, ConstraintError<V, C>>
    where
        V: Clone + Ord + Debug,
        C: Clone + Ord + Debug,
    {
        Builder::new(self.config.clone()).solve(system)
    }
}

/// Solve a constraint system with the default configuration.
pub fn solve_system<V, C>(
    system: &ConstraintSystem<V, C>,
) -> Result<SolvedSystem<V, C>, ConstraintError<V, C>>
where
    V: Clone + Ord + Debug,
    C: Clone + Ord + Debug,
{
    Solver::new().solve(system)
}
