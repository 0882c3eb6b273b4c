//! Evaluation counting around any [`Function`].
use std::cell::Cell;

use crate::optimization::{
    function::Function,
    types::{Scalar, Vector},
};

/// Interior counters for function and gradient evaluations.
///
/// Every evaluation (full or stochastic) bumps `fcalls`; evaluations that
/// also produce a gradient bump `gcalls`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalCounter {
    fcalls: Cell<usize>,
    gcalls: Cell<usize>,
}

impl EvalCounter {
    pub fn fcalls(&self) -> usize {
        self.fcalls.get()
    }

    pub fn gcalls(&self) -> usize {
        self.gcalls.get()
    }

    fn count(&self, with_grad: bool) {
        self.fcalls.set(self.fcalls.get() + 1);
        if with_grad {
            self.gcalls.set(self.gcalls.get() + 1);
        }
    }
}

/// Wraps a function reference and counts the evaluations made through it.
#[derive(Debug)]
pub struct Counted<'a, F: Function + ?Sized> {
    inner: &'a F,
    counter: EvalCounter,
}

impl<'a, F: Function + ?Sized> Counted<'a, F> {
    pub fn new(inner: &'a F) -> Self {
        Self { inner, counter: EvalCounter::default() }
    }

    pub fn counter(&self) -> &EvalCounter {
        &self.counter
    }
}

impl<F: Function + ?Sized> Function for Counted<'_, F> {
    fn size(&self) -> usize {
        self.inner.size()
    }

    fn eval(&self, x: &Vector) -> Scalar {
        self.counter.count(false);
        self.inner.eval(x)
    }

    fn eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        self.counter.count(true);
        self.inner.eval_grad(x, g)
    }

    fn stoch_eval(&self, x: &Vector) -> Scalar {
        self.counter.count(false);
        self.inner.stoch_eval(x)
    }

    fn stoch_eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        self.counter.count(true);
        self.inner.stoch_eval_grad(x, g)
    }

    fn stoch_next(&self) {
        self.inner.stoch_next()
    }
}
