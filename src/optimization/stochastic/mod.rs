//! stochastic — learning-rate driven methods on noisy gradients.
//!
//! Purpose
//! -------
//! Minimize functions whose gradient is only available on random samples
//! (minibatches). Each method is an inner update rule driven by a shared
//! epoch loop that judges progress on full evaluations.
//!
//! Key behaviors
//! -------------
//! - `run_stoch` alternates `epoch_size` rule steps (each followed by
//!   `Function::stoch_next`) with a full-batch snapshot evaluation.
//! - Fourteen rules: SG, SGM, NGD, AG (no/function/gradient restart),
//!   AdaGrad, AdaDelta, RMSProp, Adam, AMSGrad, ASGD, SVRG, COCOB.
//! - Learning rates follow `alpha0 / (k + 1)^decay`.
//! - [`StochSolver::minimize`] grid-searches free hyperparameters for
//!   `tune_epochs` epochs, then runs the full budget from the tuned optimum.
//!
//! Invariants & assumptions
//! ------------------------
//! - A snapshot must lower the reported value by more than `epsilon`,
//!   otherwise the run fails as stagnated; the returned state is always
//!   the best snapshot seen.
//! - Non-finite states abort the run as diverged.
//!
//! Conventions
//! -----------
//! - `iterations` on the returned state counts epochs, not inner steps.
//!
//! Testing notes
//! -------------
//! - Rules are tested one step at a time against hand computations; the
//!   loop is tested with a synthetic scaling rule; end-to-end tests run
//!   every method on a seeded least-squares problem.

pub mod api;
pub mod params;
pub mod rules;
pub mod run;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{StochSolver, StochSolverKind};
pub use self::params::StochParams;
pub use self::rules::AgRestart;
pub use self::run::{StochRule, run_stoch};
