//! Central finite-difference gradients and gradient-accuracy checks.
//!
//! The step `h = cbrt(10 · ε)` balances the `O(h²)` truncation error of the
//! central scheme against the `O(ε / h)` round-off error of the difference
//! quotient.
use crate::optimization::{
    function::Function,
    numerics::norm_inf,
    types::{EPSILON, Scalar, Vector},
};

/// Finite-difference step used by [`central_difference`].
pub fn fd_step() -> f64 {
    (10.0 * EPSILON).cbrt()
}

/// Central-difference gradient of `f` at `x`.
///
/// Computes `(f(x + h·e_i) - f(x - h·e_i)) / (2h)` for each coordinate; costs
/// `2n` evaluations. Non-finite evaluations propagate as non-finite entries.
pub fn central_difference<G: Fn(&Vector) -> Scalar + ?Sized>(f: &G, x: &Vector) -> Vector {
    let h = fd_step();
    let mut grad = Vector::zeros(x.len());
    let mut xh = x.clone();
    for i in 0..x.len() {
        let xi = xh[i];
        xh[i] = xi + h;
        let fp = f(&xh);
        xh[i] = xi - h;
        let fm = f(&xh);
        xh[i] = xi;
        grad[i] = (fp - fm) / (2.0 * h);
    }
    grad
}

/// Relative discrepancy between the analytic and finite-difference gradient.
///
/// Returns `‖g - g_fd‖_∞ / (1 + |f(x)|)`; values around `1e-8` or below
/// indicate a correct analytic gradient.
pub fn grad_accuracy(function: &dyn Function, x: &Vector) -> f64 {
    let mut g = Vector::zeros(x.len());
    let f = function.eval_grad(x, &mut g);
    let g_fd = central_difference(&|p: &Vector| function.eval(p), x);
    norm_inf(&(&g - &g_fd)) / (1.0 + f.abs())
}
