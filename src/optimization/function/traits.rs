//! The objective-function capability consumed by every solver.
use crate::optimization::{
    function::finite_diff::central_difference,
    types::{Scalar, Vector},
};

/// Smooth scalar objective `f: R^n → R`.
///
/// Required:
/// - `size()`: the dimension `n`; constant for the lifetime of the value.
/// - `eval(x)`: the value `f(x)`.
///
/// Optional:
/// - `eval_grad(x, g)`: value plus gradient written into `g` (length `n`).
///   Defaults to central finite differences of `eval`; override it whenever
///   an analytic gradient is available.
/// - `stoch_eval(x)` / `stoch_eval_grad(x, g)`: noisy estimates over the
///   current minibatch. Default to the full-batch evaluations, so
///   deterministic functions work unchanged with stochastic solvers.
/// - `stoch_next()`: advance to the next minibatch. Repeated stochastic
///   evaluations return identical results until this is called.
///
/// Failures are signalled in-band: a non-finite value or gradient entry
/// makes the solver state invalid and ends the run with `Status::Failed`.
/// Methods take `&self`; implementations that carry sampling state (e.g.
/// the minibatch cursor) use interior mutability.
pub trait Function {
    // Required methods
    fn size(&self) -> usize;
    fn eval(&self, x: &Vector) -> Scalar;

    // Optional methods
    fn eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        let fd = central_difference(&|p: &Vector| self.eval(p), x);
        g.assign(&fd);
        self.eval(x)
    }

    fn stoch_eval(&self, x: &Vector) -> Scalar {
        self.eval(x)
    }

    fn stoch_eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        self.eval_grad(x, g)
    }

    fn stoch_next(&self) {}
}

impl<F: Function + ?Sized> Function for &F {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn eval(&self, x: &Vector) -> Scalar {
        (**self).eval(x)
    }

    fn eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        (**self).eval_grad(x, g)
    }

    fn stoch_eval(&self, x: &Vector) -> Scalar {
        (**self).stoch_eval(x)
    }

    fn stoch_eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        (**self).stoch_eval_grad(x, g)
    }

    fn stoch_next(&self) {
        (**self).stoch_next()
    }
}
