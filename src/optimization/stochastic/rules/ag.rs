//! Nesterov accelerated gradient with optional adaptive restarts.
//!
//! Each step evaluates the gradient at the extrapolated point `y`, moves
//! `x⁺ = y − alpha(k)·∇f(y)` with `alpha(k) = alpha0 / (k + 1)^decay`, and
//! extrapolates again:
//! `y⁺ = x⁺ + β·(x⁺ − x)` with `θ² = (1 − θ)·θ_prev² + q·θ` and
//! `β = θ_prev·(1 − θ_prev) / (θ_prev² + θ)`. A restart resets `θ = 1` and
//! `y = x⁺`, dropping the accumulated momentum.
use std::fmt;

use crate::optimization::{
    function::Function, numerics::LearningRate, state::SolverState,
    stochastic::run::StochRule, types::Vector,
};

/// When to drop the accumulated momentum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgRestart {
    /// Never restart.
    None,
    /// Restart when the (stochastic) value at the new iterate increases.
    Function,
    /// Restart when the step points uphill: `∇f(y)·(x⁺ − x) > 0`.
    Gradient,
}

impl fmt::Display for AgRestart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgRestart::None => "none",
            AgRestart::Function => "function",
            AgRestart::Gradient => "gradient",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone)]
pub struct Ag {
    restart: AgRestart,
    lrate: LearningRate,
    q: f64,
    theta: f64,
    y: Option<Vector>,
    fx_prev: f64,
}

impl Ag {
    pub fn new(restart: AgRestart, alpha0: f64, decay: f64, q: f64) -> Self {
        Self {
            restart,
            lrate: LearningRate::new(alpha0, decay),
            q,
            theta: 1.0,
            y: None,
            fx_prev: f64::INFINITY,
        }
    }

    /// Positive root of `θ² + (θ_prev² − q)·θ − θ_prev² = 0`.
    fn next_theta(&self) -> f64 {
        let tp2 = self.theta * self.theta;
        let b = tp2 - self.q;
        0.5 * (-b + (b * b + 4.0 * tp2).sqrt())
    }
}

impl StochRule for Ag {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        let y = self.y.take().unwrap_or_else(|| state.x.clone());
        let mut gy = Vector::zeros(y.len());
        let fy = function.stoch_eval_grad(&y, &mut gy);

        let alpha = self.lrate.next();
        let mut x_next = y;
        x_next.scaled_add(-alpha, &gy);
        let step = &x_next - &state.x;

        let restart = match self.restart {
            AgRestart::None => false,
            AgRestart::Function => {
                let fx = function.stoch_eval(&x_next);
                let increased = fx > self.fx_prev;
                self.fx_prev = fx;
                increased
            }
            AgRestart::Gradient => gy.dot(&step) > 0.0,
        };

        if restart {
            self.theta = 1.0;
            self.y = Some(x_next.clone());
        } else {
            let theta_prev = self.theta;
            let theta = self.next_theta();
            let beta = theta_prev * (1.0 - theta_prev) / (theta_prev * theta_prev + theta);
            let mut y_next = x_next.clone();
            y_next.scaled_add(beta, &step);
            self.theta = theta;
            self.y = Some(y_next);
        }

        state.x = x_next;
        state.f = fy;
        state.g = gy;
    }
}
