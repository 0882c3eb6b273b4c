//! function — the objective abstraction and everything built around it.
//!
//! Purpose
//! -------
//! Define what a solver needs from an objective ([`Function`]) and provide
//! the pieces shared by every caller: evaluation counting, finite-difference
//! gradients, an adapter for `argmin` problems, and a catalogue of synthetic
//! test functions.
//!
//! Key behaviors
//! -------------
//! - [`Function`] exposes full-batch (`eval`, `eval_grad`) and stochastic
//!   (`stoch_eval`, `stoch_eval_grad`, `stoch_next`) evaluation. Missing
//!   analytic gradients fall back to central differences.
//! - [`Counted`] wraps any function with interior call counters that solvers
//!   copy into the terminal state.
//! - [`grad_accuracy`] compares analytic and numerical gradients.
//! - [`ArgminFunction`] adapts `argmin::core::{CostFunction, Gradient}`
//!   problems, capturing backend errors instead of panicking.
//!
//! Invariants & assumptions
//! ------------------------
//! - `size()` is constant and matches the length of every point passed in.
//! - Functions are evaluated from a single thread; interior mutability uses
//!   `Cell`/`RefCell`.
//!
//! Testing notes
//! -------------
//! - Gradients of the catalogue are verified against finite differences;
//!   the adapter is tested with analytic, missing and failing gradients.

pub mod adapter;
pub mod catalog;
pub mod counter;
pub mod finite_diff;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::adapter::ArgminFunction;
pub use self::counter::{Counted, EvalCounter};
pub use self::finite_diff::{central_difference, grad_accuracy};
pub use self::traits::Function;
