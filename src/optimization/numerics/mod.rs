//! numerics — small numeric building blocks shared by every solver.
//!
//! Purpose
//! -------
//! Collect the scalar/vector helpers, learning-rate schedule and momentum
//! accumulators that the line searches and solvers are built from, so the
//! solver modules contain only their update rules.
//!
//! Key behaviors
//! -------------
//! - [`guards`]: machine-epsilon derived thresholds, clamping, infinity norm
//!   and finiteness checks for `Vector`s.
//! - [`lrate`]: the a-priori schedule `alpha(k) = alpha0 / (k + 1)^decay`.
//! - [`momentum`]: vector exponential moving averages with an
//!   optional bias-corrected read-out.
//!
//! Invariants & assumptions
//! ------------------------
//! - Helpers never panic on non-finite input; they propagate `NaN`/`±∞`
//!   so callers can detect divergence through the solver state.
//! - Accumulators are owned by exactly one solver run.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its closed-form behavior.

pub mod guards;
pub mod lrate;
pub mod momentum;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::guards::{all_finite, clamp, epsilon1, norm_inf};
pub use self::lrate::LearningRate;
pub use self::momentum::MomentumVector;
