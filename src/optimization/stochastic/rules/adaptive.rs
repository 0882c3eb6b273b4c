//! Per-coordinate adaptive step sizes: AdaGrad, AdaDelta and RMSProp.
use ndarray::Zip;

use crate::optimization::{
    function::Function,
    numerics::MomentumVector,
    state::SolverState,
    stochastic::run::StochRule,
    types::Vector,
};

/// `x ← x − alpha0·g / (epsilon + √Σg²)`.
#[derive(Debug, Clone)]
pub struct AdaGrad {
    alpha0: f64,
    epsilon: f64,
    sum_sq: Vector,
}

impl AdaGrad {
    pub fn new(alpha0: f64, epsilon: f64, size: usize) -> Self {
        Self { alpha0, epsilon, sum_sq: Vector::zeros(size) }
    }
}

impl StochRule for AdaGrad {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        let (alpha0, epsilon) = (self.alpha0, self.epsilon);
        Zip::from(&mut state.x).and(&mut self.sum_sq).and(&state.g).for_each(|x, s, &g| {
            *s += g * g;
            *x -= alpha0 * g / (epsilon + s.sqrt());
        });
    }
}

/// Unit-corrected steps `Δx = −√(E[Δx²] + ε) / √(E[g²] + ε) · g`.
#[derive(Debug, Clone)]
pub struct AdaDelta {
    epsilon: f64,
    grad_sq: MomentumVector,
    delta_sq: MomentumVector,
    delta: Vector,
}

impl AdaDelta {
    pub fn new(momentum: f64, epsilon: f64, size: usize) -> Self {
        Self {
            epsilon,
            grad_sq: MomentumVector::new(momentum, size),
            delta_sq: MomentumVector::new(momentum, size),
            delta: Vector::zeros(size),
        }
    }
}

impl StochRule for AdaDelta {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        self.grad_sq.update_squared(&state.g);
        let epsilon = self.epsilon;
        Zip::from(&mut self.delta)
            .and(&state.g)
            .and(self.grad_sq.value())
            .and(self.delta_sq.value())
            .for_each(|d, &g, &gs, &ds| *d = -((ds + epsilon).sqrt() / (gs + epsilon).sqrt()) * g);
        self.delta_sq.update_squared(&self.delta);
        state.x += &self.delta;
    }
}

/// `x ← x − alpha0·g / (epsilon + √E[g²])`.
#[derive(Debug, Clone)]
pub struct RmsProp {
    alpha0: f64,
    epsilon: f64,
    grad_sq: MomentumVector,
}

impl RmsProp {
    pub fn new(alpha0: f64, momentum: f64, epsilon: f64, size: usize) -> Self {
        Self { alpha0, epsilon, grad_sq: MomentumVector::new(momentum, size) }
    }
}

impl StochRule for RmsProp {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        self.grad_sq.update_squared(&state.g);
        let (alpha0, epsilon) = (self.alpha0, self.epsilon);
        Zip::from(&mut state.x).and(&state.g).and(self.grad_sq.value()).for_each(|x, &g, &v| {
            *x -= alpha0 * g / (epsilon + v.sqrt());
        });
    }
}
