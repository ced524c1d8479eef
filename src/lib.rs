//! # boolean-lp: incremental linear arithmetic with boolean structure
//!
//! **`boolean-lp`** decides conjunctions of linear constraints over exact rationals,
//! combined with `and`, `or` and biconditionals over boolean flags.
//! It is a small, deterministic engine meant to be embedded as a back end for higher-level tooling.
//!
//! ## How it works
//!
//! Every linear predicate `a·x + c REL 0` becomes a slack row of a general Simplex tableau,
//! with the constraint turned into a bound on the slack.
//! Strict bounds are handled symbolically with an infinitesimal δ, so `x < y` never needs rounding.
//! Feasibility is decided with **Bland's rule**, which cannot cycle.
//!
//! The boolean layer sits on top: disjunctions and biconditionals are explored depth-first,
//! left branch first, and each leaf is a plain conjunction handed to the Simplex core.
//!
//! ## Key Features
//!
//! - **Exact**: all arithmetic uses arbitrary-precision [`Rational`][crate::rational::Rational]s. Nothing is rounded.
//! - **Incremental scopes**: [`push`][crate::solver::Solver::push] and [`pop`][crate::solver::Solver::pop] restore the assertion set exactly.
//! - **Deterministic models**: identical assertions always produce the same witness, independent of earlier checks.
//! - **Bounded effort**: an optional pivot limit turns runaway checks into `UNKNOWN`.
//!
//! ## Basic Usage
//!
//! ```rust
//! use boolean_lp::formula::Formula;
//! use boolean_lp::solver::{CheckResult, Solver};
//! use boolean_lp::term::Term;
//! use boolean_lp::types::Sort;
//!
//! let mut solver = Solver::new();
//! let x = solver.new_variable("x", Sort::Int);
//! let y = solver.new_variable("y", Sort::Int);
//! let w = solver.new_variable("w", Sort::Bool);
//!
//! // w <-> (x < y), and either w holds or x > y
//! solver.add_assertion(Term::var(x).le(5).unwrap()).unwrap();
//! solver.add_assertion(Term::var(y).le(2).unwrap()).unwrap();
//! solver.add_assertion(Formula::iff(w, Formula::lit(Term::var(x).lt(y).unwrap()))).unwrap();
//! solver.add_assertion(Formula::or(
//!     Formula::boolean(w),
//!     Formula::lit(Term::var(x).gt(y).unwrap()),
//! )).unwrap();
//!
//! let (result, model) = solver.check(&[x, y, w]).unwrap();
//! assert_eq!(result, CheckResult::Satisfiable);
//! assert_eq!(model, ["1", "2", "1"]);
//! ```
//!
//! ## Core Components
//!
//! - **[`solver`]**: The [`Solver`][crate::solver::Solver] facade, configuration and statistics.
//! - **[`simplex`]**: The tableau and Bland's rule.
//! - **[`search`]**: Case splitting over the boolean structure.
//! - **[`term`]** and **[`formula`]**: Building constraints.

pub mod delta;
pub mod error;
pub mod formula;
pub mod rational;
pub mod search;
pub mod simplex;
pub mod solver;
pub mod stack;
pub mod term;
pub mod types;
