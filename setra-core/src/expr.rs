//! Set expressions: the value-level algebra the solver operates on.
//!
//! A [`SetExpr`] is one of four shapes: the empty set, the universal set, a
//! set variable, or a constructed term (a constructor applied to child
//! expressions under a per-position variance signature). Equality and
//! ordering are structural and derived, so the same inputs order the same
//! way across runs.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Variance of one constructor argument position.
///
/// Decomposing `c(.., x_i, ..) ⊆ c(.., y_i, ..)` keeps the inclusion
/// direction at covariant positions and reverses it at contravariant ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variance {
    /// Child inclusion keeps the parent direction.
    Covariant,
    /// Child inclusion reverses the parent direction.
    Contravariant,
}

impl Variance {
    /// The opposite variance.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Covariant => Self::Contravariant,
            Self::Contravariant => Self::Covariant,
        }
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Covariant => write!(f, "+"),
            Self::Contravariant => write!(f, "-"),
        }
    }
}

/// A constructor signature: one variance per argument position.
pub type Signature = SmallVec<[Variance; 4]>;

/// A constructor application: label, signature, and child expressions.
///
/// Two terms are compatible only when the constructor label, arity, and
/// signature all agree; the simplifier enforces this when it decomposes a
/// term/term inclusion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConstructedTerm<V, C> {
    /// Constructor label.
    pub constructor: C,
    /// Per-position variances; the same length as `children` in any
    /// well-formed term.
    pub signature: Signature,
    /// Child expressions, in signature order.
    pub children: Vec<SetExpr<V, C>>,
}

/// A set expression.
///
/// The derived ordering (empty < universal < variable < term, then
/// structural within a shape) is deterministic given deterministic `Ord` on
/// `V` and `C`, which is all the solver requires of its key types.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetExpr<V, C> {
    /// The universally-smallest set, `∅`.
    EmptySet,
    /// The universally-largest set, `U`.
    UniversalSet,
    /// A named set variable.
    Variable(V),
    /// A constructor applied to child expressions.
    Term(ConstructedTerm<V, C>),
}

impl<V, C> SetExpr<V, C> {
    /// The empty set, `∅`.
    #[must_use]
    pub const fn empty_set() -> Self {
        Self::EmptySet
    }

    /// The universal set, `U`.
    #[must_use]
    pub const fn universal_set() -> Self {
        Self::UniversalSet
    }

    /// A set variable.
    #[must_use]
    pub const fn variable(v: V) -> Self {
        Self::Variable(v)
    }

    /// A zero-arity constructed term.
    #[must_use]
    pub fn atom(constructor: C) -> Self {
        Self::Term(ConstructedTerm {
            constructor,
            signature: Signature::new(),
            children: Vec::new(),
        })
    }

    /// Check whether this expression is a set variable.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Check whether this expression is a constructed term.
    #[must_use]
    pub const fn is_term(&self) -> bool {
        matches!(self, Self::Term(_))
    }

    /// Get the variable key if this expression is a variable.
    #[must_use]
    pub const fn as_variable(&self) -> Option<&V> {
        match self {
            Self::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Get the constructed term if this expression is one.
    #[must_use]
    pub const fn as_term(&self) -> Option<&ConstructedTerm<V, C>> {
        match self {
            Self::Term(t) => Some(t),
            _ => None,
        }
    }
}

/// A builder for a constructed term over `constructor` with the given
/// signature; apply it to children to obtain the expression.
///
/// ```
/// use setra_core::{SetExpr, Variance, term};
///
/// let a: SetExpr<&str, &str> = SetExpr::atom("a");
/// let fa = term("f", [Variance::Covariant]).apply(vec![a]);
/// assert!(fa.is_term());
/// ```
#[must_use]
pub fn term<C>(constructor: C, signature: impl IntoIterator<Item = Variance>) -> TermBuilder<C> {
    TermBuilder {
        constructor,
        signature: signature.into_iter().collect(),
    }
}

/// A partially-applied constructed term: constructor and signature fixed,
/// children pending. Produced by [`term`].
#[derive(Debug, Clone)]
pub struct TermBuilder<C> {
    constructor: C,
    signature: Signature,
}

impl<C> TermBuilder<C> {
    /// Apply the builder to child expressions, yielding the term.
    ///
    /// Total: arity agreement between signature and children is checked by
    /// the simplifier, not here.
    #[must_use]
    pub fn apply<V>(self, children: Vec<SetExpr<V, C>>) -> SetExpr<V, C> {
        SetExpr::Term(ConstructedTerm {
            constructor: self.constructor,
            signature: self.signature,
            children,
        })
    }
}

impl<V: fmt::Display, C: fmt::Display> fmt::Display for SetExpr<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySet => write!(f, "∅"),
            Self::UniversalSet => write!(f, "U"),
            Self::Variable(v) => write!(f, "{v}"),
            Self::Term(t) => write!(f, "{t}"),
        }
    }
}

impl<V: fmt::Display, C: fmt::Display> fmt::Display for ConstructedTerm<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constructor)?;
        if !self.children.is_empty() {
            write!(f, "(")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{child}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
