//! Line-search trial points and the one-dimensional restriction they live on.
//!
//! Along a direction `d` from `x0`, a line search studies
//! `phi(alpha) = f(x0 + alpha·d)` and its derivative
//! `phi'(alpha) = ∇f(x0 + alpha·d) · d`. [`LineSearchContext`] evaluates trial
//! points and tests the classical acceptance conditions against the values
//! at `alpha = 0`.
use std::cmp::Ordering;

use crate::optimization::{
    function::Function,
    line_search::LineSearchError,
    state::SolverState,
    types::{EPSILON, Vector},
};

/// Smallest step length a line search will try.
pub const STEP_MIN: f64 = EPSILON;

/// Largest step length a line search will try.
pub const STEP_MAX: f64 = 1.0 / EPSILON;

/// One evaluated trial point `(alpha, phi(alpha), phi'(alpha))`.
///
/// The full gradient at `x0 + alpha·d` is kept so an accepted step can be
/// committed to the solver state without re-evaluating the function.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSearchStep {
    pub alpha: f64,
    pub phi: f64,
    pub gphi: f64,
    pub g: Vector,
}

impl LineSearchStep {
    /// `alpha`, `phi` and `gphi` are all finite.
    pub fn is_valid(&self) -> bool {
        self.alpha.is_finite() && self.phi.is_finite() && self.gphi.is_finite()
    }

    /// Order trial points by function value.
    pub fn cmp_phi(&self, other: &Self) -> Ordering {
        self.phi.total_cmp(&other.phi)
    }
}

/// The restriction of a function to the ray `x0 + alpha·d`.
pub struct LineSearchContext<'a> {
    function: &'a dyn Function,
    x0: &'a Vector,
    d: &'a Vector,
    step0: LineSearchStep,
}

impl<'a> LineSearchContext<'a> {
    /// Restrict `function` to the current point and direction of `state`.
    ///
    /// Uses the value and gradient already stored in `state`; no evaluation
    /// happens here.
    pub fn new(function: &'a dyn Function, state: &'a SolverState) -> Self {
        let step0 =
            LineSearchStep { alpha: 0.0, phi: state.f, gphi: state.dg(), g: state.g.clone() };
        Self { function, x0: &state.x, d: &state.d, step0 }
    }

    pub fn step0(&self) -> &LineSearchStep {
        &self.step0
    }

    pub fn phi0(&self) -> f64 {
        self.step0.phi
    }

    pub fn gphi0(&self) -> f64 {
        self.step0.gphi
    }

    /// Evaluate `phi` and `phi'` at `alpha`.
    pub fn evaluate_at(&self, alpha: f64) -> LineSearchStep {
        let x = self.x0 + &(self.d * alpha);
        let mut g = Vector::zeros(x.len());
        let phi = self.function.eval_grad(&x, &mut g);
        let gphi = g.dot(self.d);
        LineSearchStep { alpha, phi, gphi, g }
    }

    /// Reject non-descent directions and unusable initial steps.
    ///
    /// # Errors
    /// - [`LineSearchError::NotDescentDirection`] unless `phi'(0) < 0`.
    /// - [`LineSearchError::InvalidInitialStep`] unless `t0` is finite and
    ///   `t0 > ε`.
    pub fn check(&self, t0: f64) -> Result<(), LineSearchError> {
        if !(self.gphi0() < 0.0) {
            return Err(LineSearchError::NotDescentDirection);
        }
        if !(t0.is_finite() && t0 > STEP_MIN) {
            return Err(LineSearchError::InvalidInitialStep);
        }
        Ok(())
    }

    /// Sufficient decrease: `phi(a) ≤ phi(0) + c1·a·phi'(0)`.
    pub fn armijo(&self, step: &LineSearchStep, c1: f64) -> bool {
        step.phi <= self.phi0() + c1 * step.alpha * self.gphi0()
    }

    /// Curvature: `phi'(a) ≥ c2·phi'(0)`.
    pub fn wolfe(&self, step: &LineSearchStep, c2: f64) -> bool {
        step.gphi >= c2 * self.gphi0()
    }

    /// Strong curvature: `|phi'(a)| ≤ -c2·phi'(0)`.
    pub fn strong_wolfe(&self, step: &LineSearchStep, c2: f64) -> bool {
        step.gphi.abs() <= -c2 * self.gphi0()
    }

    /// Approximate Wolfe (Hager–Zhang):
    /// `(2c1 - 1)·phi'(0) ≥ phi'(a) ≥ c2·phi'(0)` and `phi(a) ≤ phi(0) + eps`.
    pub fn approx_wolfe(&self, step: &LineSearchStep, c1: f64, c2: f64, eps: f64) -> bool {
        (2.0 * c1 - 1.0) * self.gphi0() >= step.gphi
            && step.gphi >= c2 * self.gphi0()
            && step.phi <= self.phi0() + eps
    }
}
