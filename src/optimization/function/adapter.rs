//! Adapter that exposes an `argmin` problem as a [`Function`].
//!
//! Any problem implementing `argmin::core::{CostFunction, Gradient}` over
//! `Array1<f64>` can be minimized by the solvers in this crate. If the
//! problem's gradient reports `ArgminError::NotImplemented`, we
//! finite-difference the cost instead.
use std::cell::RefCell;

use argmin::core::{ArgminError, CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

use crate::optimization::{
    errors::OptError,
    function::Function,
    types::{Scalar, Vector},
    validation::validate_grad,
};

/// Bridges an `argmin` problem to the crate's [`Function`] trait.
///
/// - `eval` returns the problem's cost, or `NaN` if it failed.
/// - `eval_grad` returns the analytic gradient when available, otherwise a
///   finite-difference gradient of the cost (central first, forward as a
///   retry).
///
/// Implementation notes:
/// - `Function` methods return plain `f64`, so we can’t use `?` inside
///   them; the first error is captured in `error` and the evaluation returns
///   `NaN`, which the solvers treat as a failed run. Retrieve the cause with
///   [`ArgminFunction::take_error`].
#[derive(Debug)]
pub struct ArgminFunction<P> {
    problem: P,
    size: usize,
    error: RefCell<Option<Error>>,
}

impl<P> ArgminFunction<P>
where
    P: CostFunction<Param = Vector, Output = f64> + Gradient<Param = Vector, Gradient = Vector>,
{
    /// Wrap `problem`, whose parameters have dimension `size`.
    pub fn new(problem: P, size: usize) -> Self {
        Self { problem, size, error: RefCell::new(None) }
    }

    /// Take the first error captured since the last call, converted into
    /// an [`OptError`].
    pub fn take_error(&self) -> Option<OptError> {
        self.error.take().map(OptError::from)
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    fn capture(&self, err: Error) {
        let mut slot = self.error.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    fn fd_gradient(&self, x: &Vector) -> Vector {
        let cost_func = |p: &Vector| -> f64 { self.eval(p) };
        let fd_grad = x.central_diff(&cost_func);
        if validate_grad(&fd_grad, self.size).is_ok() {
            return fd_grad;
        }
        x.forward_diff(&cost_func)
    }
}

impl<P> Function for ArgminFunction<P>
where
    P: CostFunction<Param = Vector, Output = f64> + Gradient<Param = Vector, Gradient = Vector>,
{
    fn size(&self) -> usize {
        self.size
    }

    fn eval(&self, x: &Vector) -> Scalar {
        match self.problem.cost(x) {
            Ok(value) => value,
            Err(e) => {
                self.capture(e);
                f64::NAN
            }
        }
    }

    fn eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        let value = self.eval(x);
        match self.problem.gradient(x) {
            Ok(grad) => match validate_grad(&grad, self.size) {
                Ok(()) => g.assign(&grad),
                Err(e) => {
                    self.capture(e.into());
                    g.fill(f64::NAN);
                }
            },
            Err(e) => match e.downcast_ref::<ArgminError>() {
                Some(ArgminError::NotImplemented { .. }) => g.assign(&self.fd_gradient(x)),
                _ => {
                    self.capture(e);
                    g.fill(f64::NAN);
                }
            },
        }
        value
    }
}
