//! CG_DESCENT line search (Hager & Zhang, 2005/2006).
//!
//! Purpose
//! -------
//! Find a step satisfying either the Wolfe conditions or, once the iterates
//! are close enough to a minimum that function differences are dominated by
//! round-off, the *approximate* Wolfe conditions, which only test slopes plus
//! a small tolerance on the value.
//!
//! Key behaviors
//! -------------
//! - `bracket` expands the step by `rho` until the slope turns non-negative
//!   or the value rises above `phi(0) + eps_k`.
//! - `update` / `update_u` keep the invariant `phi'(a) < 0 ≤ phi'(b)` with
//!   `phi(a) ≤ phi(0) + eps_k`, bisecting with weight `theta` when needed.
//! - `secant2` takes two secant steps; when the interval does not shrink by
//!   `gamma`, the midpoint is tried.
//! - The value tolerance `eps_k = epsilon · C_k` tracks a running average
//!   `C_k` of `|phi(0)|` across calls (`Q_k = 1 + delta·Q_{k-1}`).
//!
//! Invariants & assumptions
//! ------------------------
//! - One [`CgDescent`] value serves one solver run; its memory (`Q_k`,
//!   `C_k`, approximate-Wolfe switch) persists across line searches.
//! - The switch to approximate Wolfe is one-way: it flips when an accepted
//!   step changes the value by at most `omega · C_k`.
use crate::optimization::{
    line_search::{
        LineSearchError,
        step::{LineSearchContext, LineSearchStep, STEP_MAX},
    },
    numerics::epsilon1,
};

/// Maximum inner iterations of `bracket` and `update_u`.
pub const MAX_UPDATE_ITERATIONS: usize = 64;

/// Maximum outer (secant²) iterations.
pub const MAX_ITERATIONS: usize = 128;

/// Tuning constants of CG_DESCENT (defaults from the paper).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CgDescentParams {
    pub epsilon: f64,
    pub theta: f64,
    pub gamma: f64,
    pub delta: f64,
    pub omega: f64,
    pub rho: f64,
}

impl Default for CgDescentParams {
    fn default() -> Self {
        Self { epsilon: 1e-6, theta: 0.5, gamma: 0.66, delta: 0.7, omega: 1e-3, rho: 5.0 }
    }
}

/// Stateful CG_DESCENT line search.
#[derive(Debug, Clone, PartialEq)]
pub struct CgDescent {
    params: CgDescentParams,
    sum_q: f64,
    sum_c: f64,
    approx: bool,
}

impl Default for CgDescent {
    fn default() -> Self {
        Self::new(CgDescentParams::default())
    }
}

impl CgDescent {
    pub fn new(params: CgDescentParams) -> Self {
        Self { params, sum_q: 0.0, sum_c: 0.0, approx: false }
    }

    /// Search along `ctx` from `t0`.
    ///
    /// # Errors
    /// - Precondition failures from [`LineSearchContext::check`].
    /// - [`LineSearchError::Exhausted`] if no acceptable step is found within
    ///   the iteration caps or an evaluation is non-finite.
    pub fn search(
        &mut self, ctx: &LineSearchContext<'_>, t0: f64, c1: f64, c2: f64,
    ) -> Result<LineSearchStep, LineSearchError> {
        ctx.check(t0)?;
        self.sum_q = 1.0 + self.sum_q * self.params.delta;
        self.sum_c += (ctx.phi0().abs() - self.sum_c) / self.sum_q;

        let mut run = Run {
            ctx,
            c1,
            c2,
            params: self.params,
            eps_k: self.params.epsilon * self.sum_c,
            approx: self.approx,
            accepted: None,
            invalid: false,
        };
        let step = run.execute(t0.min(STEP_MAX)).ok_or(LineSearchError::Exhausted)?;
        if !self.approx && (step.phi - ctx.phi0()).abs() <= self.params.omega * self.sum_c {
            self.approx = true;
        }
        Ok(step)
    }
}

/// Scratch state of a single CG_DESCENT call.
struct Run<'c, 'a> {
    ctx: &'c LineSearchContext<'a>,
    c1: f64,
    c2: f64,
    params: CgDescentParams,
    eps_k: f64,
    approx: bool,
    accepted: Option<LineSearchStep>,
    invalid: bool,
}

type Bracket = (LineSearchStep, LineSearchStep);

impl Run<'_, '_> {
    fn execute(&mut self, t0: f64) -> Option<LineSearchStep> {
        let c = self.eval(t0)?;
        if self.done() {
            return self.accepted.take();
        }
        let (mut a, mut b) = self.bracket(c.clone());
        if self.done() {
            return self.accepted.take();
        }
        if !(a.alpha < b.alpha) {
            (a, b) = (self.ctx.step0().clone(), c);
        }
        for _ in 0..MAX_ITERATIONS {
            if self.collapsed(&a, &b) {
                break;
            }
            let width = b.alpha - a.alpha;
            let (na, nb) = self.secant2(&a, &b);
            if self.done() {
                break;
            }
            if nb.alpha - na.alpha > self.params.gamma * width {
                let mid = self.eval(0.5 * (na.alpha + nb.alpha));
                if self.done() {
                    break;
                }
                (a, b) = self.update(na, nb, mid);
            } else {
                (a, b) = (na, nb);
            }
            if self.done() {
                break;
            }
        }
        self.accepted.take()
    }

    fn eval(&mut self, alpha: f64) -> Option<LineSearchStep> {
        if !alpha.is_finite() {
            return None;
        }
        let step = self.ctx.evaluate_at(alpha);
        if !step.is_valid() {
            self.invalid = true;
            return None;
        }
        if self.accepted.is_none() && self.acceptable(&step) {
            self.accepted = Some(step.clone());
        }
        Some(step)
    }

    fn acceptable(&self, step: &LineSearchStep) -> bool {
        let wolfe = self.ctx.armijo(step, self.c1) && self.ctx.wolfe(step, self.c2);
        wolfe || (self.approx && self.ctx.approx_wolfe(step, self.c1, self.c2, self.eps_k))
    }

    fn done(&self) -> bool {
        self.accepted.is_some() || self.invalid
    }

    fn collapsed(&self, a: &LineSearchStep, b: &LineSearchStep) -> bool {
        (b.alpha - a.alpha).abs() <= epsilon1() * a.alpha.abs().max(b.alpha.abs()).max(1.0)
    }

    fn below_tolerance(&self, step: &LineSearchStep) -> bool {
        step.phi <= self.ctx.phi0() + self.eps_k
    }

    fn bracket(&mut self, mut c: LineSearchStep) -> Bracket {
        let mut last_good = self.ctx.step0().clone();
        for _ in 0..MAX_UPDATE_ITERATIONS {
            if c.gphi >= 0.0 {
                return (last_good, c);
            }
            if !self.below_tolerance(&c) {
                return self.update_u(self.ctx.step0().clone(), c);
            }
            let next = self.params.rho * c.alpha;
            if next > STEP_MAX {
                break;
            }
            last_good = c;
            c = match self.eval(next) {
                Some(step) => step,
                None => break,
            };
            if self.done() {
                break;
            }
        }
        (self.ctx.step0().clone(), self.ctx.step0().clone())
    }

    fn update(
        &mut self, a: LineSearchStep, b: LineSearchStep, c: Option<LineSearchStep>,
    ) -> Bracket {
        let Some(c) = c else {
            return (a, b);
        };
        if !(a.alpha < c.alpha && c.alpha < b.alpha) {
            return (a, b);
        }
        if c.gphi >= 0.0 {
            return (a, c);
        }
        if self.below_tolerance(&c) {
            return (c, b);
        }
        self.update_u(a, c)
    }

    fn update_u(&mut self, mut a: LineSearchStep, mut b: LineSearchStep) -> Bracket {
        let theta = self.params.theta;
        for _ in 0..MAX_UPDATE_ITERATIONS {
            if self.collapsed(&a, &b) {
                break;
            }
            let Some(d) = self.eval((1.0 - theta) * a.alpha + theta * b.alpha) else {
                break;
            };
            if self.done() {
                break;
            }
            if d.gphi >= 0.0 {
                return (a, d);
            }
            if self.below_tolerance(&d) {
                a = d;
            } else {
                b = d;
            }
        }
        (a, b)
    }

    fn secant2(&mut self, a: &LineSearchStep, b: &LineSearchStep) -> Bracket {
        let c = self.eval(secant(a, b));
        if self.done() {
            return (a.clone(), b.clone());
        }
        let (na, nb) = self.update(a.clone(), b.clone(), c.clone());
        let Some(c) = c else {
            return (na, nb);
        };
        let refine = if c.alpha == nb.alpha {
            Some(secant(b, &nb))
        } else if c.alpha == na.alpha {
            Some(secant(a, &na))
        } else {
            None
        };
        match refine {
            Some(t) => {
                let c2 = self.eval(t);
                if self.done() {
                    return (na, nb);
                }
                self.update(na, nb, c2)
            }
            None => (na, nb),
        }
    }
}

/// Root of the secant through `(a, phi'(a))` and `(b, phi'(b))`.
fn secant(a: &LineSearchStep, b: &LineSearchStep) -> f64 {
    (a.alpha * b.gphi - b.alpha * a.gphi) / (b.gphi - a.gphi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        function::catalog::{Ellipsoid, Rosenbrock, Sphere},
        state::SolverState,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The secant step landing on the minimizer of a quadratic restriction.
    // - The Wolfe contract of accepted steps on non-quadratic problems.
    // - Persistence of the running averages across calls.
    //
    // They intentionally DO NOT cover:
    // - CGD/L-BFGS convergence with this search (see `batch`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // On a quadratic restriction the first secant step is exact.
    //
    // Given
    // -----
    // - Sphere at `(3, 3)`, `d = -g`, `t0 = 1` (slope positive at 1).
    //
    // Expect
    // ------
    // - `alpha = 0.5` with `phi = 0`.
    fn secant_is_exact_on_sphere() {
        // Arrange
        let sphere = Sphere::new(2);
        let state = SolverState::new(&sphere, array![3.0, 3.0]);
        let ctx = LineSearchContext::new(&sphere, &state);
        let mut ls = CgDescent::default();

        // Act
        let step = ls.search(&ctx, 1.0, 0.1, 0.9).expect("line search should succeed");

        // Assert
        assert_relative_eq!(step.alpha, 0.5, epsilon = 1e-12);
        assert_relative_eq!(step.phi, 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Accepted steps satisfy Wolfe (the approximate switch is still off).
    //
    // Given
    // -----
    // - Rosenbrock at `(-1.2, 1)`, `t0 = 1e-3`, `c1 = 0.1`, `c2 = 0.9`.
    //
    // Expect
    // ------
    // - Armijo and Wolfe hold at the accepted step.
    fn accepted_step_satisfies_wolfe_on_rosenbrock() {
        // Arrange
        let rosen = Rosenbrock::new(2);
        let state = SolverState::new(&rosen, array![-1.2, 1.0]);
        let ctx = LineSearchContext::new(&rosen, &state);
        let mut ls = CgDescent::default();

        // Act
        let step = ls.search(&ctx, 1e-3, 0.1, 0.9).expect("line search should succeed");

        // Assert
        assert!(!ls.approx);
        assert!(ctx.armijo(&step, 0.1));
        assert!(ctx.wolfe(&step, 0.9));
    }

    #[test]
    // Purpose
    // -------
    // A too-short step is expanded by `rho` until the slope turns.
    //
    // Given
    // -----
    // - 3-d ellipsoid at `(1, 1, 1)`, `t0 = 1e-4`.
    //
    // Expect
    // ------
    // - The accepted step is longer than `t0` and reduces the value.
    fn bracket_expands_short_steps() {
        // Arrange
        let f = Ellipsoid::new(3);
        let state = SolverState::new(&f, array![1.0, 1.0, 1.0]);
        let ctx = LineSearchContext::new(&f, &state);
        let mut ls = CgDescent::default();

        // Act
        let step = ls.search(&ctx, 1e-4, 0.1, 0.9).expect("line search should succeed");

        // Assert
        assert!(step.alpha > 1e-4);
        assert!(step.phi < state.f);
    }

    #[test]
    // Purpose
    // -------
    // An ascent direction is rejected without touching the memory.
    //
    // Given
    // -----
    // - Sphere state with `d = +g`.
    //
    // Expect
    // ------
    // - `NotDescentDirection`; a fresh search object compares equal.
    fn ascent_direction_is_rejected() {
        // Arrange
        let sphere = Sphere::new(2);
        let mut state = SolverState::new(&sphere, array![3.0, 3.0]);
        state.d = state.g.clone();
        let ctx = LineSearchContext::new(&sphere, &state);
        let mut ls = CgDescent::default();

        // Act
        let result = ls.search(&ctx, 1.0, 0.1, 0.9);

        // Assert
        assert_eq!(result, Err(LineSearchError::NotDescentDirection));
        assert_eq!(ls, CgDescent::default());
    }
}
