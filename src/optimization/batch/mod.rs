//! batch — full-batch descent methods (GD, nonlinear CG, L-BFGS).
//!
//! Purpose
//! -------
//! Minimize a smooth function using its exact value and gradient at every
//! iteration. Each method picks a descent direction; a line search from
//! [`crate::optimization::line_search`] picks the step.
//!
//! Key behaviors
//! -------------
//! - `run_batch` is the single driving loop: convergence check, direction,
//!   initial step, line search, commit, logging callback.
//! - Directions: steepest descent, nine conjugate-gradient `β` formulas with
//!   automatic restarts, and L-BFGS with a bounded curvature history.
//! - Per-method default line searches, overridable through [`BatchParams`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every committed step satisfies at least the Armijo condition, so with
//!   the default line searches `f` never increases between iterations.
//! - A line-search failure ends the run with `Status::Failed` and returns
//!   the last accepted state.
//! - Parameter and input validation happens before the first evaluation;
//!   afterwards no `OptError` is produced.
//!
//! Downstream usage
//! ----------------
//! - Build a [`BatchSolver`] from a [`BatchSolverKind`] (or its registry
//!   name) and [`BatchParams`], then call `minimize(function, x0, logger)`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the `β` formulas, the two-loop recursion, and full
//!   runs on the sphere, ellipsoid and Rosenbrock functions.

pub mod api;
pub mod cgd;
pub mod lbfgs;
pub mod params;
pub mod run;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{BatchSolver, BatchSolverKind, DEFAULT_C1};
pub use self::cgd::{CgdVariant, cgd_direction};
pub use self::lbfgs::LbfgsMemory;
pub use self::params::BatchParams;
pub use self::run::{BatchDirection, LineSearchSetup, run_batch};
