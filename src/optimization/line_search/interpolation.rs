//! Bracketing line search with interpolating "zoom" (Nocedal & Wright,
//! Algorithms 3.5 and 3.6), terminating on the strong Wolfe conditions.
use crate::optimization::{
    line_search::{
        LineSearchError,
        interpolants::{bisection, cubic, quadratic},
        step::{LineSearchContext, LineSearchStep, STEP_MAX},
    },
    numerics::epsilon1,
};

/// Growth factor while searching for a bracket.
pub const GROWTH: f64 = 3.0;

/// Maximum number of trial evaluations in each phase.
pub const MAX_ITERATIONS: usize = 64;

/// Run the bracketing phase from `t0`, then zoom into the bracket.
///
/// # Errors
/// - Precondition failures from [`LineSearchContext::check`].
/// - [`LineSearchError::Exhausted`] if no strong-Wolfe step is found within
///   the iteration caps, the bracket collapses, or an evaluation is
///   non-finite.
pub fn interpolate(
    ctx: &LineSearchContext<'_>, t0: f64, c1: f64, c2: f64,
) -> Result<LineSearchStep, LineSearchError> {
    ctx.check(t0)?;
    let mut prev = ctx.step0().clone();
    let mut t = t0.min(STEP_MAX);
    for i in 0..MAX_ITERATIONS {
        let step = ctx.evaluate_at(t);
        if !step.is_valid() {
            return Err(LineSearchError::Exhausted);
        }
        if !ctx.armijo(&step, c1) || (i > 0 && step.phi >= prev.phi) {
            return zoom(ctx, prev, step, c1, c2);
        }
        if ctx.strong_wolfe(&step, c2) {
            return Ok(step);
        }
        if step.gphi >= 0.0 {
            return zoom(ctx, step, prev, c1, c2);
        }
        if t >= STEP_MAX {
            break;
        }
        prev = step;
        t = (t * GROWTH).min(STEP_MAX);
    }
    Err(LineSearchError::Exhausted)
}

/// Shrink the bracket `[lo, hi]` (in either order) until a strong-Wolfe step
/// is found. `lo` always holds the lowest Armijo-satisfying value seen.
fn zoom(
    ctx: &LineSearchContext<'_>, mut lo: LineSearchStep, mut hi: LineSearchStep, c1: f64, c2: f64,
) -> Result<LineSearchStep, LineSearchError> {
    for _ in 0..MAX_ITERATIONS {
        let width = (hi.alpha - lo.alpha).abs();
        if width <= epsilon1() * lo.alpha.abs().max(hi.alpha.abs()).max(1.0) {
            break;
        }
        let step = ctx.evaluate_at(next_trial(&lo, &hi));
        if !step.is_valid() {
            break;
        }
        if !ctx.armijo(&step, c1) || step.phi >= lo.phi {
            hi = step;
        } else {
            if ctx.strong_wolfe(&step, c2) {
                return Ok(step);
            }
            if step.gphi * (hi.alpha - lo.alpha) >= 0.0 {
                hi = lo;
            }
            lo = step;
        }
    }
    Err(LineSearchError::Exhausted)
}

/// Pick the interpolated candidate closest to `lo` that lies safely inside
/// the bracket (5% margin on each side), defaulting to bisection.
fn next_trial(lo: &LineSearchStep, hi: &LineSearchStep) -> f64 {
    let tmin = lo.alpha.min(hi.alpha);
    let tmax = lo.alpha.max(hi.alpha);
    let teps = (tmax - tmin) / 20.0;
    let (c_min, c_other) = cubic(lo, hi);
    [bisection(lo, hi), quadratic(lo, hi), c_min, c_other]
        .into_iter()
        .filter(|t| t.is_finite() && *t > tmin + teps && *t < tmax - teps)
        .min_by(|a, b| (a - lo.alpha).abs().total_cmp(&(b - lo.alpha).abs()))
        .unwrap_or_else(|| bisection(lo, hi))
}
