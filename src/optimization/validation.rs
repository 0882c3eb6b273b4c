//! Validation helpers shared by solver parameter bundles and entry points.
//!
//! - **Tolerance checks**: [`verify_epsilon`] ensures convergence tolerances
//!   are finite and strictly positive.
//! - **Budget checks**: [`verify_max_iter`], [`verify_epoch_size`].
//! - **Line-search coefficients**: [`verify_wolfe_coefficients`] enforces
//!   `0 < c1 < c2 < 1`.
//! - **Inputs**: [`validate_initial_point`] and [`validate_grad`] enforce
//!   matching dimension and finite entries.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`OptError`] variants.
use crate::optimization::{
    errors::{OptError, OptResult},
    types::Vector,
};

/// Validate a convergence tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidEpsilon`] if the value is non-finite or ≤ 0.0.
pub fn verify_epsilon(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidEpsilon { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidEpsilon { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate an iteration (or epoch) budget.
///
/// # Errors
/// Returns [`OptError::InvalidMaxIter`] if `max_iter == 0`.
pub fn verify_max_iter(max_iter: usize) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate the number of inner iterations per stochastic epoch.
///
/// # Errors
/// Returns [`OptError::InvalidEpochSize`] if `size == 0`.
pub fn verify_epoch_size(size: usize) -> OptResult<()> {
    if size == 0 {
        return Err(OptError::InvalidEpochSize {
            size,
            reason: "Epoch size must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate the sufficient-decrease and curvature coefficients.
///
/// # Errors
/// Returns [`OptError::InvalidLineSearchCoefficients`] unless
/// `0 < c1 < c2 < 1` with both values finite.
pub fn verify_wolfe_coefficients(c1: f64, c2: f64) -> OptResult<()> {
    if !c1.is_finite() || !c2.is_finite() {
        return Err(OptError::InvalidLineSearchCoefficients {
            c1,
            c2,
            reason: "Coefficients must be finite.",
        });
    }
    if !(0.0 < c1 && c1 < c2 && c2 < 1.0) {
        return Err(OptError::InvalidLineSearchCoefficients {
            c1,
            c2,
            reason: "Coefficients must satisfy 0 < c1 < c2 < 1.",
        });
    }
    Ok(())
}

/// Validate a starting point against the function dimension.
///
/// # Errors
/// - [`OptError::DimensionMismatch`] if `x0.len() != dim`.
/// - [`OptError::InvalidInitialPoint`] for the first non-finite element.
pub fn validate_initial_point(x0: &Vector, dim: usize) -> OptResult<()> {
    if x0.len() != dim {
        return Err(OptError::DimensionMismatch { expected: dim, found: x0.len() });
    }
    for (index, &value) in x0.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidInitialPoint { index, value });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Vector, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Acceptance/rejection rules of every validation helper.
    // - The specific `OptError` variant each helper reports.
    //
    // They intentionally DO NOT cover:
    // - How parameter bundles compose these helpers (see `batch::params`
    //   and `stochastic::params`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Reject non-positive and non-finite tolerances.
    //
    // Given
    // -----
    // - Tolerances 0.0, -1.0, NaN and a valid 1e-6.
    //
    // Expect
    // ------
    // - Invalid inputs return `InvalidEpsilon`; 1e-6 passes.
    fn verify_epsilon_rejects_invalid_values() {
        // Arrange
        let bad = [0.0, -1.0, f64::NAN, f64::INFINITY];

        // Act & Assert
        for tol in bad {
            assert!(matches!(verify_epsilon(tol), Err(OptError::InvalidEpsilon { .. })));
        }
        assert!(verify_epsilon(1e-6).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Enforce the ordering `0 < c1 < c2 < 1`.
    //
    // Given
    // -----
    // - Coefficient pairs violating each side of the ordering.
    //
    // Expect
    // ------
    // - All violations fail; the textbook pair (1e-4, 0.9) passes.
    fn verify_wolfe_coefficients_enforces_ordering() {
        // Arrange
        let bad = [(0.0, 0.9), (0.5, 0.5), (0.9, 0.1), (1e-4, 1.0), (f64::NAN, 0.9)];

        // Act & Assert
        for (c1, c2) in bad {
            assert!(verify_wolfe_coefficients(c1, c2).is_err(), "({c1}, {c2}) accepted");
        }
        assert!(verify_wolfe_coefficients(1e-4, 0.9).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Check dimension and finiteness checks on the starting point.
    //
    // Given
    // -----
    // - A 2-vector checked against dims 3 and 2, and a vector with NaN.
    //
    // Expect
    // ------
    // - `DimensionMismatch`, then success, then `InvalidInitialPoint`.
    fn validate_initial_point_checks_dimension_and_finiteness() {
        // Arrange
        let x = array![1.0, 2.0];
        let bad = array![1.0, f64::NAN];

        // Act & Assert
        assert_eq!(
            validate_initial_point(&x, 3),
            Err(OptError::DimensionMismatch { expected: 3, found: 2 })
        );
        assert!(validate_initial_point(&x, 2).is_ok());
        assert!(matches!(
            validate_initial_point(&bad, 2),
            Err(OptError::InvalidInitialPoint { index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Confirm that zero budgets are rejected.
    //
    // Given
    // -----
    // - `max_iter = 0` and `epoch_size = 0`.
    //
    // Expect
    // ------
    // - `InvalidMaxIter` and `InvalidEpochSize` respectively.
    fn zero_budgets_are_rejected() {
        // Act & Assert
        assert!(matches!(verify_max_iter(0), Err(OptError::InvalidMaxIter { .. })));
        assert!(matches!(verify_epoch_size(0), Err(OptError::InvalidEpochSize { .. })));
        assert!(verify_max_iter(1).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Reject gradients with wrong length or non-finite entries.
    //
    // Given
    // -----
    // - Gradients of length 1 and with an infinite entry, checked for dim 2.
    //
    // Expect
    // ------
    // - `GradientDimMismatch` and `InvalidGradient`.
    fn validate_grad_rejects_bad_gradients() {
        // Act & Assert
        assert!(matches!(
            validate_grad(&array![1.0], 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            validate_grad(&array![1.0, f64::INFINITY], 2),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
    }
}
