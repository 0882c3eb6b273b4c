//! state — the mutable snapshot every solver iterates on.
//!
//! Purpose
//! -------
//! Hold the current point, its value and gradient, the search direction and
//! the bookkeeping (status, counters) that solvers update in place and hand
//! back to callers as the result of a run.
//!
//! Key behaviors
//! -------------
//! - Construct a state from `x0` with exactly one (full or stochastic)
//!   evaluation.
//! - Move along the current direction (`update_along`), jump to a point
//!   (`update_to`), or accept values already computed by a line search
//!   (`update_with`).
//! - Report the scale-invariant convergence criterion
//!   `‖g‖_∞ / (1 + |f|)` and validity (finite value and criterion).
//! - Order states for tuning: non-failed before failed, then by `f`, with
//!   non-finite values last.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x`, `g` and `d` always share the function dimension.
//! - `failure` is `Some` exactly when `status == Status::Failed`.
//! - Counters are copied from the evaluation counter at the end of a run;
//!   they are zero while a run is in progress.
use std::cmp::Ordering;
use std::fmt;

use crate::optimization::{
    function::Function,
    line_search::LineSearchError,
    numerics::{all_finite, norm_inf},
    types::{Scalar, Vector},
};

/// Terminal (or in-progress) status of a solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Converged,
    MaxIterations,
    Failed,
    Stopped,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Running => "running",
            Status::Converged => "converged",
            Status::MaxIterations => "max_iterations",
            Status::Failed => "failed",
            Status::Stopped => "stopped",
        };
        write!(f, "{name}")
    }
}

/// Why a run ended with [`Status::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The line search could not produce an acceptable step.
    LineSearch(LineSearchError),
    /// A value, gradient or iterate became non-finite.
    Diverged,
    /// A stochastic epoch did not decrease the snapshot value.
    Stagnated,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::LineSearch(err) => write!(f, "{err}"),
            FailureReason::Diverged => write!(f, "diverged"),
            FailureReason::Stagnated => write!(f, "stagnated"),
        }
    }
}

/// Point, value, gradient, direction and bookkeeping of a solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverState {
    pub x: Vector,
    pub g: Vector,
    pub d: Vector,
    pub f: Scalar,
    pub status: Status,
    pub failure: Option<FailureReason>,
    pub iterations: usize,
    pub fcalls: usize,
    pub gcalls: usize,
}

impl SolverState {
    /// Evaluate `function` (value and gradient) at `x0`.
    pub fn new(function: &dyn Function, x0: Vector) -> Self {
        let mut g = Vector::zeros(x0.len());
        let f = function.eval_grad(&x0, &mut g);
        Self::from_parts(x0, f, g)
    }

    /// Same as [`SolverState::new`] using the stochastic evaluation path.
    pub fn stoch_new(function: &dyn Function, x0: Vector) -> Self {
        let mut g = Vector::zeros(x0.len());
        let f = function.stoch_eval_grad(&x0, &mut g);
        Self::from_parts(x0, f, g)
    }

    fn from_parts(x: Vector, f: Scalar, g: Vector) -> Self {
        let d = -&g;
        Self {
            x,
            g,
            d,
            f,
            status: Status::Running,
            failure: None,
            iterations: 0,
            fcalls: 0,
            gcalls: 0,
        }
    }

    /// Move to `x + t·d` and re-evaluate. Returns [`SolverState::is_valid`].
    pub fn update_along(&mut self, function: &dyn Function, t: f64) -> bool {
        self.x.scaled_add(t, &self.d);
        self.f = function.eval_grad(&self.x, &mut self.g);
        self.is_valid()
    }

    /// Jump to `x` and re-evaluate (full batch).
    pub fn update_to(&mut self, function: &dyn Function, x: &Vector) {
        self.x.assign(x);
        self.f = function.eval_grad(&self.x, &mut self.g);
    }

    /// Jump to `x` and re-evaluate (stochastic path).
    pub fn stoch_update_to(&mut self, function: &dyn Function, x: &Vector) {
        self.x.assign(x);
        self.f = function.stoch_eval_grad(&self.x, &mut self.g);
    }

    /// Re-evaluate value and gradient at the current `x` on the current sample.
    pub fn stoch_refresh(&mut self, function: &dyn Function) {
        self.f = function.stoch_eval_grad(&self.x, &mut self.g);
    }

    /// Accept a step whose value `f` and gradient `g` at `x + t·d` are known.
    pub fn update_with(&mut self, t: f64, f: Scalar, g: &Vector) {
        self.x.scaled_add(t, &self.d);
        self.f = f;
        self.g.assign(g);
    }

    /// Scale-invariant stationarity measure `‖g‖_∞ / (1 + |f|)`.
    pub fn convergence_criterion(&self) -> f64 {
        norm_inf(&self.g) / (1.0 + self.f.abs())
    }

    /// `true` if the convergence criterion is strictly below `epsilon`.
    pub fn converged(&self, epsilon: f64) -> bool {
        self.convergence_criterion() < epsilon
    }

    /// Finite value, finite convergence criterion and finite iterate.
    pub fn is_valid(&self) -> bool {
        self.f.is_finite() && self.convergence_criterion().is_finite() && all_finite(&self.x)
    }

    /// Directional derivative `g · d` along the current direction.
    pub fn dg(&self) -> f64 {
        self.g.dot(&self.d)
    }

    /// `true` if `d` is a strict descent direction.
    pub fn has_descent(&self) -> bool {
        self.dg() < 0.0
    }

    /// Mark the run as failed for `reason`.
    pub fn fail(&mut self, reason: FailureReason) {
        self.status = Status::Failed;
        self.failure = Some(reason);
    }

    /// Total order used to pick the best run while tuning.
    ///
    /// Non-failed states come first; within a class states are ordered by
    /// `f`, with `NaN`/`±∞` treated as the worst possible value.
    pub fn tuning_cmp(&self, other: &Self) -> Ordering {
        let key = |s: &Self| {
            let failed = s.status == Status::Failed || !s.f.is_finite();
            let value = if s.f.is_finite() { s.f } else { f64::INFINITY };
            (failed, value)
        };
        let (fa, va) = key(self);
        let (fb, vb) = key(other);
        fa.cmp(&fb).then(va.total_cmp(&vb))
    }
}
