//! Plain, momentum, normalized and averaged stochastic gradient steps.
use argmin_math::ArgminL2Norm;

use crate::optimization::{
    function::Function,
    numerics::{LearningRate, MomentumVector},
    state::SolverState,
    stochastic::run::StochRule,
    types::Vector,
};

/// `x ← x − alpha(k)·g`.
#[derive(Debug, Clone)]
pub struct Sg {
    lrate: LearningRate,
}

impl Sg {
    pub fn new(alpha0: f64, decay: f64) -> Self {
        Self { lrate: LearningRate::new(alpha0, decay) }
    }
}

impl StochRule for Sg {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        let alpha = self.lrate.next();
        state.x.scaled_add(-alpha, &state.g);
    }
}

/// `x ← x − alpha(k)·m̂`, with `m` an EMA of the gradients.
#[derive(Debug, Clone)]
pub struct Sgm {
    lrate: LearningRate,
    momentum: MomentumVector,
}

impl Sgm {
    pub fn new(alpha0: f64, decay: f64, momentum: f64, size: usize) -> Self {
        Self {
            lrate: LearningRate::new(alpha0, decay),
            momentum: MomentumVector::new(momentum, size),
        }
    }
}

impl StochRule for Sgm {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        self.momentum.update(&state.g);
        let alpha = self.lrate.next();
        state.x.scaled_add(-alpha, &self.momentum.corrected());
    }
}

/// `x ← x − alpha(k)·g / ‖g‖₂`; a zero gradient leaves `x` in place.
#[derive(Debug, Clone)]
pub struct Ngd {
    lrate: LearningRate,
}

impl Ngd {
    pub fn new(alpha0: f64, decay: f64) -> Self {
        Self { lrate: LearningRate::new(alpha0, decay) }
    }
}

impl StochRule for Ngd {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        let alpha = self.lrate.next();
        let norm = state.g.l2_norm();
        if norm > 0.0 {
            state.x.scaled_add(-alpha / norm, &state.g);
        }
    }
}

/// SG steps whose epoch snapshot is the bias-corrected EMA of the iterates.
#[derive(Debug, Clone)]
pub struct Asgd {
    lrate: LearningRate,
    average: MomentumVector,
}

impl Asgd {
    pub fn new(alpha0: f64, decay: f64, momentum: f64, size: usize) -> Self {
        Self {
            lrate: LearningRate::new(alpha0, decay),
            average: MomentumVector::new(momentum, size),
        }
    }
}

impl StochRule for Asgd {
    fn step(&mut self, function: &dyn Function, state: &mut SolverState) {
        state.stoch_refresh(function);
        let alpha = self.lrate.next();
        state.x.scaled_add(-alpha, &state.g);
        self.average.update(&state.x);
    }

    fn snapshot(&self, _state: &SolverState) -> Vector {
        self.average.corrected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::function::catalog::Sphere;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Single steps of each rule on the sphere, checked by hand.
    // - The averaged snapshot of ASGD.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // SG and SGM take the textbook first step.
    //
    // Given
    // -----
    // - Sphere at `(1, -2)` (`g = (2, -4)`), `alpha0 = 0.25`.
    //
    // Expect
    // ------
    // - Both move to `(0.5, -1)` (SGM's corrected momentum equals `g` after
    //   one update).
    fn sg_and_sgm_first_step() {
        // Arrange
        let sphere = Sphere::new(2);
        let mut a = SolverState::stoch_new(&sphere, array![1.0, -2.0]);
        let mut b = a.clone();

        // Act
        Sg::new(0.25, 0.5).step(&sphere, &mut a);
        Sgm::new(0.25, 0.5, 0.9, 2).step(&sphere, &mut b);

        // Assert
        assert_relative_eq!(a.x[0], 0.5);
        assert_relative_eq!(a.x[1], -1.0);
        assert_relative_eq!(b.x[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(b.x[1], -1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // NGD moves exactly `alpha` in Euclidean distance and ignores a zero
    // gradient.
    //
    // Given
    // -----
    // - Sphere at `(3, 4)`, `alpha0 = 0.5`; then the origin.
    //
    // Expect
    // ------
    // - `(2.7, 3.6)`; the origin stays put.
    fn ngd_steps_unit_length() {
        // Arrange
        let sphere = Sphere::new(2);
        let mut state = SolverState::stoch_new(&sphere, array![3.0, 4.0]);
        let mut origin = SolverState::stoch_new(&sphere, array![0.0, 0.0]);
        let mut ngd = Ngd::new(0.5, 0.0);

        // Act
        ngd.step(&sphere, &mut state);
        ngd.step(&sphere, &mut origin);

        // Assert
        assert_relative_eq!(state.x[0], 2.7, epsilon = 1e-12);
        assert_relative_eq!(state.x[1], 3.6, epsilon = 1e-12);
        assert_eq!(origin.x, array![0.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // ASGD reports the average of visited iterates, not the last one.
    //
    // Given
    // -----
    // - 1-d sphere at `x = 1`, `alpha = 0.25` constant, momentum 0.5, two
    //   steps (`x = 0.5`, then `0.25`).
    //
    // Expect
    // ------
    // - Snapshot is the corrected EMA `0.25 / (1 - 0.5²) = 1/3`; the
    //   iterate is 0.25.
    fn asgd_snapshot_is_corrected_average() {
        // Arrange
        let sphere = Sphere::new(1);
        let mut state = SolverState::stoch_new(&sphere, array![1.0]);
        let mut asgd = Asgd::new(0.25, 0.0, 0.5, 1);

        // Act
        asgd.step(&sphere, &mut state);
        asgd.step(&sphere, &mut state);
        let snapshot = asgd.snapshot(&state);

        // Assert
        assert_relative_eq!(state.x[0], 0.25);
        assert_relative_eq!(snapshot[0], 1.0 / 3.0, epsilon = 1e-12);
    }
}
