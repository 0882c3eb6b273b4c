//! line_search — step-length selection along a descent direction.
//!
//! Purpose
//! -------
//! Given a point `x`, its value and gradient, and a descent direction `d`,
//! choose a step `t > 0` such that `x + t·d` makes sufficient progress. All
//! batch solvers delegate step selection to a [`LineSearch`] value.
//!
//! Key behaviors
//! -------------
//! - [`LineSearchStrategy`] selects one of: backtracking with the Armijo,
//!   Wolfe or strong-Wolfe criterion ([`backtracking`]), bracketing with
//!   interpolating zoom ([`interpolation`]), or Hager–Zhang CG_DESCENT
//!   ([`cg_descent`]).
//! - [`StepInitializer`] proposes the first trial step (`Unit`,
//!   `Quadratic`, `Consistent`).
//! - Failures are reported as [`LineSearchError`] and never mutate the
//!   caller's state.
//!
//! Invariants & assumptions
//! ------------------------
//! - `0 < c1 < c2 < 1` (validated by the parameter bundles).
//! - `phi'(0) < 0` and `t0 > ε` are checked before any evaluation.
//! - Successful steps satisfy the contract of their criterion: Armijo,
//!   Wolfe, strong Wolfe, or (CG_DESCENT) Wolfe/approximate Wolfe.
//!
//! Conventions
//! -----------
//! - Strategy names parse case-insensitively with `-` or `_` separators:
//!   `backtrack-armijo`, `backtrack-wolfe`, `backtrack-strong-wolfe`,
//!   `interpolation`, `cg-descent`.
//!
//! Testing notes
//! -------------
//! - Each strategy module tests its acceptance contract on quadratics and on
//!   Rosenbrock; this module tests dispatch and parsing.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::optimization::{
    errors::{OptError, OptResult},
    function::Function,
    state::SolverState,
    validation::verify_wolfe_coefficients,
};

pub mod backtracking;
pub mod cg_descent;
pub mod init;
pub mod interpolants;
pub mod interpolation;
pub mod step;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::backtracking::WolfeCriterion;
pub use self::cg_descent::{CgDescent, CgDescentParams};
pub use self::init::{LineSearchInit, StepInitializer};
pub use self::step::{LineSearchContext, LineSearchStep};

/// Why a line search produced no step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearchError {
    /// `phi'(0) ≥ 0` (or not finite).
    NotDescentDirection,
    /// `t0` is not finite or not above machine epsilon.
    InvalidInitialStep,
    /// No acceptable step within the iteration caps.
    Exhausted,
}

impl std::error::Error for LineSearchError {}

impl fmt::Display for LineSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSearchError::NotDescentDirection => {
                write!(f, "line search failed: not a descent direction")
            }
            LineSearchError::InvalidInitialStep => {
                write!(f, "line search failed: invalid initial step")
            }
            LineSearchError::Exhausted => {
                write!(f, "line search failed: no acceptable step found")
            }
        }
    }
}

/// Choice of line-search algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSearchStrategy {
    BacktrackArmijo,
    BacktrackWolfe,
    BacktrackStrongWolfe,
    Interpolation,
    CgDescent,
}

impl FromStr for LineSearchStrategy {
    type Err = OptError;

    /// Parse a strategy name (case-insensitive, `-` and `_` interchangeable).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "backtrack-armijo" => Ok(LineSearchStrategy::BacktrackArmijo),
            "backtrack-wolfe" => Ok(LineSearchStrategy::BacktrackWolfe),
            "backtrack-strong-wolfe" => Ok(LineSearchStrategy::BacktrackStrongWolfe),
            "interpolation" => Ok(LineSearchStrategy::Interpolation),
            "cg-descent" => Ok(LineSearchStrategy::CgDescent),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are 'backtrack-armijo', 'backtrack-wolfe', \
                         'backtrack-strong-wolfe', 'interpolation' or 'cg-descent'.",
            }),
        }
    }
}

/// A configured line search; owns the CG_DESCENT memory for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSearch {
    strategy: LineSearchStrategy,
    c1: f64,
    c2: f64,
    cg_descent: CgDescent,
}

impl LineSearch {
    /// # Errors
    /// [`OptError::InvalidLineSearchCoefficients`] unless `0 < c1 < c2 < 1`.
    pub fn new(strategy: LineSearchStrategy, c1: f64, c2: f64) -> OptResult<Self> {
        verify_wolfe_coefficients(c1, c2)?;
        Ok(Self { strategy, c1, c2, cg_descent: CgDescent::default() })
    }

    pub fn strategy(&self) -> LineSearchStrategy {
        self.strategy
    }

    /// Find a step along `state.d` starting from `t0`.
    ///
    /// `state` is not modified; committing the step is the caller's job.
    pub fn search(
        &mut self, function: &dyn Function, state: &SolverState, t0: f64,
    ) -> Result<LineSearchStep, LineSearchError> {
        let ctx = LineSearchContext::new(function, state);
        let (c1, c2) = (self.c1, self.c2);
        match self.strategy {
            LineSearchStrategy::BacktrackArmijo => {
                backtracking::backtrack(&ctx, t0, c1, c2, WolfeCriterion::Armijo)
            }
            LineSearchStrategy::BacktrackWolfe => {
                backtracking::backtrack(&ctx, t0, c1, c2, WolfeCriterion::Wolfe)
            }
            LineSearchStrategy::BacktrackStrongWolfe => {
                backtracking::backtrack(&ctx, t0, c1, c2, WolfeCriterion::StrongWolfe)
            }
            LineSearchStrategy::Interpolation => interpolation::interpolate(&ctx, t0, c1, c2),
            LineSearchStrategy::CgDescent => self.cg_descent.search(&ctx, t0, c1, c2),
        }
    }
}
