//! Setra Solver - Inductive-Form Set-Constraint Engine
//!
//! This crate solves systems of inclusion constraints over set expressions
//! and answers least-solution queries:
//! - A mutable inductive-form constraint graph over dense integer node ids
//!   with `Pred`/`Succ` edge colours ([`IfGraph`])
//! - The builder: id assignment, edge insertion with online cycle
//!   elimination, and transitive-closure saturation to fixed point
//! - An immutable solved snapshot ([`SolvedSystem`]) supporting concurrent
//!   [`SolvedSystem::least_solution`] queries
//!
//! The engine is single-threaded while solving; the returned snapshot is
//! freely shareable. Solving is one-shot: constraints cannot be added after
//! a solve.
//!
//! # Examples
//!
//! ```
//! use setra_core::{ConstraintSystem, Inclusion, SetExpr};
//! use setra_solver::solve_system;
//!
//! type Expr = SetExpr<&'static str, &'static str>;
//!
//! let a: Expr = SetExpr::atom("a");
//! let x: Expr = SetExpr::variable("x");
//! let y: Expr = SetExpr::variable("y");
//!
//! // a ⊆ x and x ⊆ y, so a must be in the least solution of y.
//! let system: ConstraintSystem<_, _> = [
//!     Inclusion::new(a.clone(), x.clone()),
//!     Inclusion::new(x, y),
//! ]
//! .into_iter()
//! .collect();
//!
//! let solved = solve_system(&system).unwrap();
//! assert_eq!(solved.least_solution(&"y").unwrap(), vec![a]);
//! ```
//!
//! Configuration goes through [`Solver`]:
//!
//! ```
//! use setra_core::ConstraintSystem;
//! use setra_solver::{Solver, SolverConfig};
//!
//! let config = SolverConfig {
//!     remove_cycles: true,
//!     cycle_budget: Some(10_000),
//! };
//! let solver = Solver::with_config(config);
//! let solved = solver
//!     .solve(&ConstraintSystem::<&str, &str>::new())
//!     .unwrap();
//! assert_eq!(solved.stats().nodes_created, 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod graph;
pub mod labelled;
pub mod solved;

pub use builder::{Solver, SolverConfig, SolverStats, solve_system};
pub use graph::{EdgeLabel, IfGraph, NodeId};
pub use labelled::{Context, LabelledGraph};
pub use solved::SolvedSystem;
