//! Backtracking line search for the Armijo, Wolfe and strong-Wolfe
//! conditions.
//!
//! Starting from `t0`, the step is shrunk by [`DECREMENT`] when sufficient
//! decrease fails or the slope has turned too positive, and grown by
//! [`INCREMENT`] when the slope is still too negative. The first step
//! satisfying the requested criterion is returned.
use crate::optimization::line_search::{
    LineSearchError,
    step::{LineSearchContext, LineSearchStep, STEP_MAX, STEP_MIN},
};

/// Factor applied to shrink the step.
pub const DECREMENT: f64 = 0.5;

/// Factor applied to grow the step.
pub const INCREMENT: f64 = 2.1;

/// Maximum number of trial evaluations.
pub const MAX_ITERATIONS: usize = 64;

/// Which acceptance condition terminates the backtracking loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WolfeCriterion {
    Armijo,
    Wolfe,
    StrongWolfe,
}

/// Run the backtracking search along `ctx` from `t0`.
///
/// # Errors
/// - Precondition failures from [`LineSearchContext::check`].
/// - [`LineSearchError::Exhausted`] after [`MAX_ITERATIONS`] trials, when the
///   step leaves `[ε, 1/ε]`, or when an evaluation is non-finite.
pub fn backtrack(
    ctx: &LineSearchContext<'_>, t0: f64, c1: f64, c2: f64, criterion: WolfeCriterion,
) -> Result<LineSearchStep, LineSearchError> {
    ctx.check(t0)?;
    let mut t = t0;
    for _ in 0..MAX_ITERATIONS {
        if !(STEP_MIN..=STEP_MAX).contains(&t) {
            break;
        }
        let step = ctx.evaluate_at(t);
        if !step.is_valid() {
            break;
        }
        if !ctx.armijo(&step, c1) {
            t *= DECREMENT;
        } else if criterion == WolfeCriterion::Armijo {
            return Ok(step);
        } else if !ctx.wolfe(&step, c2) {
            t *= INCREMENT;
        } else if criterion == WolfeCriterion::Wolfe {
            return Ok(step);
        } else if !ctx.strong_wolfe(&step, c2) {
            t *= DECREMENT;
        } else {
            return Ok(step);
        }
    }
    Err(LineSearchError::Exhausted)
}
