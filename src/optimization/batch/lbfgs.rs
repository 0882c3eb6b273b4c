//! Limited-memory BFGS direction via the two-loop recursion.
use std::collections::VecDeque;

use crate::optimization::{
    numerics::all_finite,
    types::{EPSILON, Vector},
};

/// Bounded FIFO of curvature pairs `(s, y)`.
///
/// Pairs with `s·y ≤ ε·y·y` are rejected so the implicit Hessian
/// approximation stays positive definite.
#[derive(Debug, Clone, PartialEq)]
pub struct LbfgsMemory {
    capacity: usize,
    pairs: VecDeque<(Vector, Vector)>,
}

impl LbfgsMemory {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, pairs: VecDeque::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Store `(s, y)`, evicting the oldest pair when full.
    ///
    /// Returns `false` (and stores nothing) when the curvature condition fails.
    pub fn push(&mut self, s: Vector, y: Vector) -> bool {
        let sy = s.dot(&y);
        let yy = y.dot(&y);
        if !(sy > EPSILON * yy) || !sy.is_finite() {
            return false;
        }
        if self.pairs.len() == self.capacity {
            self.pairs.pop_front();
        }
        self.pairs.push_back((s, y));
        true
    }

    /// `-H·g` with `H` the implicit inverse-Hessian approximation.
    pub fn direction(&self, g: &Vector) -> Vector {
        let mut q = g.clone();
        let mut alphas = Vec::with_capacity(self.pairs.len());
        for (s, y) in self.pairs.iter().rev() {
            let alpha = s.dot(&q) / y.dot(s);
            q.scaled_add(-alpha, y);
            alphas.push(alpha);
        }

        let gamma = match self.pairs.back() {
            Some((s, y)) => s.dot(y) / y.dot(y),
            None => 1.0,
        };
        let mut r = q * gamma;

        for ((s, y), alpha) in self.pairs.iter().zip(alphas.iter().rev()) {
            let beta = y.dot(&r) / y.dot(s);
            r.scaled_add(alpha - beta, s);
        }
        -r
    }
}

/// Quasi-Newton direction for the current gradient, falling back to `-g`
/// (and clearing the memory) when the result is not a finite descent
/// direction.
pub fn lbfgs_direction(memory: &mut LbfgsMemory, g: &Vector) -> Vector {
    let d = memory.direction(g);
    if all_finite(&d) && g.dot(&d) < 0.0 {
        d
    } else {
        memory.clear();
        -g
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
    // - Curvature filtering and FIFO eviction.
    // - The two-loop recursion on a quadratic where it is exact.
    //
    // They intentionally DO NOT cover:
    // - Full L-BFGS runs (see `batch::api`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pairs violating `s·y > ε·y·y` are skipped; the oldest pair is evicted.
    //
    // Given
    // -----
    // - Capacity 2, a negative-curvature pair, then three valid pairs.
    //
    // Expect
    // ------
    // - The bad pair is rejected; the memory never exceeds two pairs.
    fn push_filters_and_evicts() {
        // Arrange
        let mut memory = LbfgsMemory::new(2);

        // Act & Assert
        assert!(!memory.push(array![1.0, 0.0], array![-1.0, 0.0]));
        assert!(memory.is_empty());
        for k in 1..=3 {
            assert!(memory.push(array![k as f64, 0.0], array![1.0, 0.0]));
        }
        assert_eq!(memory.len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Without history the direction is steepest descent.
    //
    // Given
    // -----
    // - Empty memory, `g = (1, -2)`.
    //
    // Expect
    // ------
    // - `d = (-1, 2)`.
    fn empty_memory_gives_steepest_descent() {
        // Arrange
        let mut memory = LbfgsMemory::new(3);

        // Act
        let d = lbfgs_direction(&mut memory, &array![1.0, -2.0]);

        // Assert
        assert_eq!(d, array![-1.0, 2.0]);
    }

    #[test]
    // Purpose
    // -------
    // On a diagonal quadratic with pairs along both axes, the recursion
    // recovers the Newton direction.
    //
    // Given
    // -----
    // - `H = diag(1, 4)`; pairs `s = e1, y = e1` and `s = e2, y = 4·e2`.
    //
    // Expect
    // ------
    // - `d = -H⁻¹·g` for `g = (2, 8)`, i.e. `(-2, -2)`.
    fn two_loop_recovers_newton_step_on_quadratic() {
        // Arrange
        let mut memory = LbfgsMemory::new(4);
        memory.push(array![1.0, 0.0], array![1.0, 0.0]);
        memory.push(array![0.0, 1.0], array![0.0, 4.0]);

        // Act
        let d = memory.direction(&array![2.0, 8.0]);

        // Assert
        assert_relative_eq!(d[0], -2.0, epsilon = 1e-12);
        assert_relative_eq!(d[1], -2.0, epsilon = 1e-12);
    }
}
