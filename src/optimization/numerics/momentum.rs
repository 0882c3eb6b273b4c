//! Exponential moving averages ("momentum") over vectors.
//!
//! The accumulator starts at zero and follows
//! `v_t = decay · v_{t-1} + (1 - decay) · value_t`. Because of the zero start
//! the raw average is biased towards zero for the first few updates; the
//! `corrected` read-out divides by `1 - decay^t` to undo this.
use crate::optimization::types::Vector;

/// Element-wise exponential moving average over a `Vector`.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumVector {
    decay: f64,
    value: Vector,
    decay_power: f64,
}

impl MomentumVector {
    /// Zero-initialized accumulator of dimension `size`.
    pub fn new(decay: f64, size: usize) -> Self {
        Self { decay, value: Vector::zeros(size), decay_power: 1.0 }
    }

    pub fn update(&mut self, value: &Vector) {
        let decay = self.decay;
        self.value.zip_mut_with(value, |v, &x| *v = decay * *v + (1.0 - decay) * x);
        self.decay_power *= self.decay;
    }

    /// Same as [`MomentumVector::update`] with each entry of `value` squared.
    pub fn update_squared(&mut self, value: &Vector) {
        let decay = self.decay;
        self.value.zip_mut_with(value, |v, &x| *v = decay * *v + (1.0 - decay) * x * x);
        self.decay_power *= self.decay;
    }

    /// Raw (biased) average.
    pub fn value(&self) -> &Vector {
        &self.value
    }

    /// Bias-corrected average.
    pub fn corrected(&self) -> Vector {
        let correction = 1.0 - self.decay_power;
        if correction > 0.0 { &self.value / correction } else { self.value.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The EMA recurrence of the vector accumulator.
    // - Bias correction: a constant input is recovered exactly.
    //
    // They intentionally DO NOT cover:
    // - How individual solvers combine accumulators (see `stochastic::rules`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Bias correction recovers a constant signal from the first update on.
    //
    // Given
    // -----
    // - `decay = 0.9`, the constant vector `[3, -1]` fed three times.
    //
    // Expect
    // ------
    // - `corrected()` equals `[3, -1]` after every update while the raw value
    //   is shrunk towards zero.
    fn vector_bias_correction_recovers_constant_input() {
        // Arrange
        let mut m = MomentumVector::new(0.9, 2);
        let input = array![3.0, -1.0];

        // Act & Assert
        for _ in 0..3 {
            m.update(&input);
            let c = m.corrected();
            assert_relative_eq!(c[0], 3.0, epsilon = 1e-12);
            assert_relative_eq!(c[1], -1.0, epsilon = 1e-12);
        }
        assert!(m.value()[0].abs() < 3.0);
    }

    #[test]
    // Purpose
    // -------
    // `update_squared` accumulates squared entries.
    //
    // Given
    // -----
    // - `decay = 0`, input `[2, -3]`.
    //
    // Expect
    // ------
    // - Raw value `[4, 9]`.
    fn update_squared_squares_entries() {
        // Arrange
        let mut m = MomentumVector::new(0.0, 2);

        // Act
        m.update_squared(&array![2.0, -3.0]);

        // Assert
        assert_relative_eq!(m.value()[0], 4.0);
        assert_relative_eq!(m.value()[1], 9.0);
    }
}
