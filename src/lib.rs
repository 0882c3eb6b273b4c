//! rust_optimizers — gradient-based numerical optimization in Rust.
//!
//! Purpose
//! -------
//! Serve as the crate root for a family of unconstrained minimizers: line
//! searches, full-batch solvers (GD, nonlinear conjugate gradient, L-BFGS)
//! and stochastic solvers (SG variants, accelerated and adaptive methods,
//! SVRG, COCOB) with hyperparameter tuning.
//!
//! Key behaviors
//! -------------
//! - Re-export the `optimization` module as the public crate surface.
//! - Offer a crate-level `prelude` forwarding `optimization::prelude`.
//!
//! Conventions
//! -----------
//! - All numerics are `f64` on `ndarray` vectors.
//! - Fallible entry points return `OptResult<T>`; terminal solver states
//!   describe how a run ended.
//!
//! Downstream usage
//! ----------------
//! ```ignore
//! use rust_optimizers::prelude::*;
//! use rust_optimizers::optimization::function::catalog::Rosenbrock;
//!
//! let registry = SolverRegistry::with_defaults();
//! let solver = registry.get("lbfgs")?;
//! let state = solver.minimize(&Rosenbrock::new(2), &ndarray::array![-1.2, 1.0], None)?;
//! assert_eq!(state.status, Status::Converged);
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests sit beside each module; integration tests under `tests/`
//!   exercise solvers end to end through the public API.

pub mod optimization;

pub mod prelude {
    pub use crate::optimization::prelude::*;
}
