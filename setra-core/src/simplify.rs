//! Rewriting of compound inclusions into atomic form.
//!
//! The simplifier applies a fixed rewrite table to every inclusion of a
//! system: trivial inclusions are discarded, provably unsatisfiable ones
//! fail with [`ConstraintError::NoSolution`], and term/term inclusions are
//! decomposed position-by-position under the constructor's variance
//! signature. Decomposition strictly shrinks the total term size, so a
//! single pass terminates. The output preserves source order.

use crate::constraint::{ConstraintSystem, Inclusion};
use crate::error::ConstraintError;
use crate::expr::{SetExpr, Variance};

/// Rewrite every inclusion of `system` into atomic form.
///
/// Returns the atomic system, or the first inclusion proved unsatisfiable.
///
/// ```
/// use setra_core::{ConstraintSystem, Inclusion, SetExpr, simplify};
///
/// type Expr = SetExpr<&'static str, &'static str>;
///
/// let a: Expr = SetExpr::atom("a");
/// let x: Expr = SetExpr::variable("x");
/// let system = ConstraintSystem::from_inclusions(vec![Inclusion::new(a, x)]);
/// let atomic = simplify(&system).unwrap();
/// assert_eq!(atomic.len(), 1);
/// ```
pub fn simplify<V, C>(
    system: &ConstraintSystem<V, C>,
) -> Result<ConstraintSystem<V, C>, ConstraintError<V, C>>
where
    V: Clone + Ord,
    C: Clone + Ord,
{
    let mut out = Vec::new();
    for inclusion in system {
        simplify_into(inclusion, &mut out)?;
    }
    Ok(ConstraintSystem::from_inclusions(out))
}

/// Rewrite a single inclusion into atomic form.
///
/// This is the entry point the saturation loop re-uses on inclusions induced
/// by edge composition; one compound inclusion may expand into several
/// atomic ones, or into none at all.
pub fn simplify_inclusion<V, C>(
    inclusion: &Inclusion<V, C>,
) -> Result<Vec<Inclusion<V, C>>, ConstraintError<V, C>>
where
    V: Clone + Ord,
    C: Clone + Ord,
{
    let mut out = Vec::new();
    simplify_into(inclusion, &mut out)?;
    Ok(out)
}

fn simplify_into<V, C>(
    inclusion: &Inclusion<V, C>,
    out: &mut Vec<Inclusion<V, C>>,
) -> Result<(), ConstraintError<V, C>>
where
    V: Clone + Ord,
    C: Clone + Ord,
{
    match (&inclusion.lhs, &inclusion.rhs) {
        // x ⊆ x holds vacuously.
        (SetExpr::Variable(a), SetExpr::Variable(b)) if a == b => Ok(()),
        // U only fits inside U itself.
        (SetExpr::UniversalSet, SetExpr::EmptySet)
        | (SetExpr::UniversalSet, SetExpr::Term(_))
        | (SetExpr::Term(_), SetExpr::EmptySet) => {
            Err(ConstraintError::NoSolution(inclusion.clone()))
        }
        // Everything fits inside U; ∅ fits inside everything.
        (_, SetExpr::UniversalSet) | (SetExpr::EmptySet, _) => Ok(()),
        (SetExpr::Term(lhs), SetExpr::Term(rhs)) => {
            let compatible = lhs.constructor == rhs.constructor
                && lhs.signature == rhs.signature
                && lhs.children.len() == rhs.children.len()
                && lhs.children.len() == lhs.signature.len();
            if !compatible {
                return Err(ConstraintError::NoSolution(inclusion.clone()));
            }
            for (i, variance) in lhs.signature.iter().enumerate() {
                let child = match variance {
                    Variance::Covariant => {
                        Inclusion::new(lhs.children[i].clone(), rhs.children[i].clone())
                    }
                    Variance::Contravariant => {
                        Inclusion::new(rhs.children[i].clone(), lhs.children[i].clone())
                    }
                };
                simplify_into(&child, out)?;
            }
            Ok(())
        }
        _ => {
            out.push(inclusion.clone());
            Ok(())
        }
    }
}
