//! optimization::types — shared numeric aliases and crate-wide constants.
//!
//! Purpose
//! -------
//! Centralize the core numeric types used by every solver so the rest of the
//! crate stays agnostic to the `ndarray` container choice and can evolve if
//! the backend changes.
//!
//! Invariants & assumptions
//! ------------------------
//! - All points, gradients and directions are `ndarray::Array1<f64>` of a
//!   single, fixed dimension per run.
//! - `Scalar` is always `f64`; there is no generic float parameter.
//!
//! Testing notes
//! -------------
//! - This module only defines aliases and constants; correctness is
//!   exercised by the modules that use them.
use ndarray::Array1;

/// Point, gradient or search direction in `R^n`.
pub type Vector = Array1<f64>;

/// Scalar objective value `f(x)`.
pub type Scalar = f64;

/// Machine epsilon for `f64`.
pub const EPSILON: f64 = f64::EPSILON;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 6;

/// Logging callback invoked once per outer iteration (batch) or epoch
/// (stochastic). Returning `false` stops the run with `Status::Stopped`.
pub type Logger<'a> = &'a mut dyn FnMut(&crate::optimization::state::SolverState) -> bool;
