//! Stochastic variance-reduced gradient.
//!
//! At the start of each epoch the current iterate becomes the reference
//! point `x̃` and the full gradient `∇f(x̃)` is computed once. Inner steps use
//! the unbiased estimate `g_i(x) − g_i(x̃) + ∇f(x̃)`, whose variance vanishes
//! as `x` and `x̃` approach the minimizer.
use crate::optimization::{
    function::Function,
    numerics::LearningRate,
    state::SolverState,
    stochastic::run::StochRule,
    types::Vector,
};

#[derive(Debug, Clone)]
pub struct Svrg {
    lrate: LearningRate,
    x_ref: Vector,
    g_ref_full: Vector,
    g_ref_sample: Vector,
}

impl Svrg {
    pub fn new(alpha0: f64, decay: f64, size: usize) -> Self {
        Self {
            lrate: LearningRate::new(alpha0, decay),
            x_ref: Vector::zeros(size),
            g_ref_full: Vector::zeros(size),
            g_ref_sample: Vector::zeros(size),
        }
    }
}

impl StochRule for Svrg {
    fn epoch_start(&mut self, function: &dyn Function, state: &SolverState) {
        self.x_ref.assign(&state.x);
        function.eval_grad(&self.x_ref, &mut self.g_ref_full);
    }

    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        function.stoch_eval_grad(&self.x_ref, &mut self.g_ref_sample);
        let alpha = self.lrate.next();
        state.x.scaled_add(-alpha, &state.g);
        state.x.scaled_add(alpha, &self.g_ref_sample);
        state.x.scaled_add(-alpha, &self.g_ref_full);
    }
}
