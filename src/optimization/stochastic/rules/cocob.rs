//! COCOB-Backprop: parameter-free steps from coin-betting.
//!
//! Per coordinate the rule tracks the largest observed gradient magnitude
//! `L`, the sum of magnitudes `G`, the accumulated reward and the negative
//! gradient sum `θ`, and bets a fraction of `L + reward` around the starting
//! point:
//! `x = x₀ + θ / (L·max(G + L, alpha·L)) · (L + reward)`.
use crate::optimization::{
    function::Function, state::SolverState, stochastic::run::StochRule, types::Vector,
};

/// Initial value of the per-coordinate gradient bound `L`.
const L_INIT: f64 = 1e-8;

#[derive(Debug, Clone)]
pub struct Cocob {
    alpha: f64,
    x0: Option<Vector>,
    l: Vector,
    g_sum: Vector,
    reward: Vector,
    theta: Vector,
}

impl Cocob {
    pub fn new(alpha: f64, size: usize) -> Self {
        Self {
            alpha,
            x0: None,
            l: Vector::from_elem(size, L_INIT),
            g_sum: Vector::from_elem(size, L_INIT),
            reward: Vector::zeros(size),
            theta: Vector::zeros(size),
        }
    }
}

impl StochRule for Cocob {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        let x0 = self.x0.get_or_insert_with(|| state.x.clone());
        for i in 0..state.x.len() {
            let g = state.g[i];
            let l = self.l[i].max(g.abs());
            let g_sum = self.g_sum[i] + g.abs();
            let reward = (self.reward[i] - g * (state.x[i] - x0[i])).max(0.0);
            let theta = self.theta[i] - g;
            state.x[i] = x0[i] + theta / (l * (g_sum + l).max(self.alpha * l)) * (l + reward);
            self.l[i] = l;
            self.g_sum[i] = g_sum;
            self.reward[i] = reward;
            self.theta[i] = theta;
        }
    }
}
