//! Error taxonomy for constraint solving and queries.

use crate::constraint::Inclusion;
use thiserror::Error;

/// Failures reported across the solver boundary.
///
/// Programmer errors (a non-atomic inclusion reaching the constraint graph,
/// a duplicate edge, a self loop) are invariant violations and abort instead
/// of surfacing here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError<V, C> {
    /// An inclusion was proved unsatisfiable, either during simplification
    /// or while saturating the constraint graph. Carries the offending
    /// inclusion verbatim.
    #[error("unsatisfiable inclusion: {0:?}")]
    NoSolution(Inclusion<V, C>),

    /// A least-solution query named a variable the solved system has never
    /// seen.
    #[error("unknown set variable: {0:?}")]
    NoVariableLabel(V),
}

/// Result alias over [`ConstraintError`].
pub type Result<T, V, C> = std::result::Result<T, ConstraintError<V, C>>;
