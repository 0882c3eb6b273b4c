//! Decaying learning-rate schedule for stochastic solvers.
//!
//! `alpha(k) = alpha0 / (k + 1)^decay`, with `k` the number of values already
//! drawn. `decay = 0` gives a constant rate, `decay = 1` the classic `1/k`
//! Robbins–Monro schedule.

/// Stateful learning-rate schedule; each call to [`LearningRate::next`]
/// returns the rate for the current inner iteration and advances `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningRate {
    alpha0: f64,
    decay: f64,
    iteration: usize,
}

impl LearningRate {
    /// Create a schedule starting at `k = 0`.
    ///
    /// Parameters are validated by the solver configuration layer
    /// (`alpha0 > 0`, `decay ∈ [0, 1]`); this constructor does not re-check.
    pub fn new(alpha0: f64, decay: f64) -> Self {
        Self { alpha0, decay, iteration: 0 }
    }

    /// Rate at the current iteration, without advancing.
    pub fn get(&self) -> f64 {
        self.alpha0 / ((self.iteration + 1) as f64).powf(self.decay)
    }

    /// Rate at the current iteration; advances the iteration counter.
    pub fn next(&mut self) -> f64 {
        let alpha = self.get();
        self.iteration += 1;
        alpha
    }
}
