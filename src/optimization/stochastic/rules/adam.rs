//! Adam and AMSGrad.
use ndarray::Zip;

use crate::optimization::{
    function::Function,
    numerics::MomentumVector,
    state::SolverState,
    stochastic::run::StochRule,
    types::Vector,
};

/// `x ← x − alpha0·m̂ / (epsilon + √v̂)` with bias-corrected first and
/// second moments. The AMSGrad variant replaces `v` by its running
/// element-wise maximum before correction.
#[derive(Debug, Clone)]
pub struct Adam {
    alpha0: f64,
    epsilon: f64,
    beta2: f64,
    steps: i32,
    m: MomentumVector,
    v: MomentumVector,
    v_max: Option<Vector>,
}

impl Adam {
    pub fn new(alpha0: f64, epsilon: f64, beta1: f64, beta2: f64, size: usize) -> Self {
        Self {
            alpha0,
            epsilon,
            beta2,
            steps: 0,
            m: MomentumVector::new(beta1, size),
            v: MomentumVector::new(beta2, size),
            v_max: None,
        }
    }

    pub fn amsgrad(alpha0: f64, epsilon: f64, beta1: f64, beta2: f64, size: usize) -> Self {
        Self { v_max: Some(Vector::zeros(size)), ..Self::new(alpha0, epsilon, beta1, beta2, size) }
    }

    fn second_moment(&mut self) -> Vector {
        match &mut self.v_max {
            None => self.v.corrected(),
            Some(v_max) => {
                v_max.zip_mut_with(self.v.value(), |a, &b| *a = a.max(b));
                let correction = 1.0 - self.beta2.powi(self.steps);
                if correction > 0.0 { &*v_max / correction } else { v_max.clone() }
            }
        }
    }
}

impl StochRule for Adam {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        self.steps = self.steps.saturating_add(1);
        self.m.update(&state.g);
        self.v.update_squared(&state.g);
        let m_hat = self.m.corrected();
        let v_hat = self.second_moment();
        let (alpha0, epsilon) = (self.alpha0, self.epsilon);
        Zip::from(&mut state.x).and(&m_hat).and(&v_hat).for_each(|x, &m, &v| {
            *x -= alpha0 * m / (epsilon + v.sqrt());
        });
    }
}
