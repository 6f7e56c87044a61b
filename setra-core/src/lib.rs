//! Setra Core - Set Expressions, Inclusions, and the Simplifier
//!
//! This crate provides the value layer of the Setra set-constraint solver:
//! - The [`SetExpr`] algebra: empty set, universal set, set variables, and
//!   constructed terms with per-position variance signatures
//! - [`Inclusion`] constraints and ordered [`ConstraintSystem`]s
//! - The [`simplify`] pass, rewriting compound inclusions into atomic form
//!   and detecting trivially unsatisfiable systems
//!
//! The constraint-graph engine that consumes atomic systems lives in the
//! `setra-solver` crate.
//!
//! # Examples
//!
//! ## Building expressions
//!
//! ```
//! use setra_core::{SetExpr, Variance, term};
//!
//! type Expr = SetExpr<&'static str, &'static str>;
//!
//! let a: Expr = SetExpr::atom("a");
//! let x: Expr = SetExpr::variable("x");
//! let fa = term("f", [Variance::Covariant]).apply(vec![a]);
//! assert!(fa.is_term());
//! assert!(x.is_variable());
//! ```
//!
//! ## Simplifying a system
//!
//! ```
//! use setra_core::{ConstraintSystem, Inclusion, SetExpr, Variance, simplify, term};
//!
//! type Expr = SetExpr<&'static str, &'static str>;
//!
//! // f(a) ⊆ f(y) decomposes to a ⊆ y at the covariant position.
//! let a: Expr = SetExpr::atom("a");
//! let y: Expr = SetExpr::variable("y");
//! let lhs = term("f", [Variance::Covariant]).apply(vec![a.clone()]);
//! let rhs = term("f", [Variance::Covariant]).apply(vec![y.clone()]);
//!
//! let system = ConstraintSystem::from_inclusions(vec![Inclusion::new(lhs, rhs)]);
//! let atomic = simplify(&system).unwrap();
//! let out: Vec<_> = atomic.into_iter().collect();
//! assert_eq!(out, vec![Inclusion::new(a, y)]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constraint;
pub mod error;
pub mod expr;
pub mod simplify;

pub use constraint::{ConstraintSystem, Inclusion};
pub use error::{ConstraintError, Result};
pub use expr::{ConstructedTerm, SetExpr, Signature, TermBuilder, Variance, term};
pub use simplify::{simplify, simplify_inclusion};
