//! optimization — line searches, batch and stochastic solvers, and tuning.
//!
//! Purpose
//! -------
//! Minimize smooth, possibly non-convex scalar functions `f: R^n → R` given
//! their value and gradient. Full-batch methods combine a descent direction
//! with a line search; stochastic methods follow an a-priori learning-rate
//! schedule on sampled gradients and tune their hyperparameters on a small
//! grid before the full run.
//!
//! Key behaviors
//! -------------
//! - `function`: the [`function::Function`] capability, finite-difference
//!   gradients, evaluation counting, an adapter for `argmin` problems and a
//!   catalogue of test functions.
//! - `line_search`: backtracking (Armijo/Wolfe/strong Wolfe), interpolation
//!   ("zoom") and CG_DESCENT, plus step-length initializers.
//! - `batch`: gradient descent, nine nonlinear CG variants and L-BFGS.
//! - `stochastic`: fourteen update rules on a shared epoch loop.
//! - `tuner`, `config`, `registry`: grid search, flat hyperparameter maps
//!   with schemas, and name-based construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration and input problems are returned as `OptError` before a
//!   run starts; numerical trouble during a run is reported through the
//!   terminal [`state::SolverState`] (`Status::Failed` plus a
//!   [`state::FailureReason`]), never as an error or a panic.
//! - Runs are single-threaded; every run owns its buffers and accumulators.
//! - Cancellation is cooperative: the per-iteration logger returns `false`.
//!
//! Conventions
//! -----------
//! - Points, gradients and directions are `ndarray::Array1<f64>`
//!   ([`types::Vector`]).
//! - Convergence means `‖g‖_∞ / (1 + |f|) < epsilon`.
//! - Progress logging to the terminal is available behind the `obs_slog`
//!   feature and the `verbose` flag of the parameter bundles.
//!
//! Downstream usage
//! ----------------
//! - Implement `Function` for the objective, build a solver directly
//!   (`BatchSolver`, `StochSolver`) or by name through `SolverRegistry`,
//!   then call `minimize(function, x0, logger)`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; `tests/` holds end-to-end
//!   scenarios across the public surface.

pub mod batch;
pub mod config;
pub mod errors;
pub mod function;
pub mod line_search;
pub mod numerics;
#[cfg(feature = "obs_slog")]
pub mod observer;
pub mod registry;
pub mod state;
pub mod stochastic;
pub mod tuner;
pub mod types;
pub mod validation;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_optimizers::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::batch::{BatchParams, BatchSolver, BatchSolverKind, CgdVariant};
    pub use super::config::{ParamSpec, SolverConfig};
    pub use super::errors::{OptError, OptResult};
    pub use super::function::{
        ArgminFunction, Counted, Function, central_difference, grad_accuracy,
    };
    pub use super::line_search::{LineSearch, LineSearchError, LineSearchInit, LineSearchStrategy};
    pub use super::registry::{Solver, SolverRegistry};
    pub use super::state::{FailureReason, SolverState, Status};
    pub use super::stochastic::{AgRestart, StochParams, StochSolver, StochSolverKind};
    pub use super::tuner::{TuneOutcome, TuneSpace, tune};
    pub use super::types::{DEFAULT_LBFGS_MEM, Logger, Scalar, Vector};
}
