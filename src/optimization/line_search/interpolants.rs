//! Candidate step lengths for shrinking a bracket `[a, b]`.
//!
//! Each function returns the location of an extremum of a model fitted to
//! the two trial points; the result may be non-finite (degenerate model), in
//! which case callers discard it.
use crate::optimization::line_search::step::LineSearchStep;

/// Midpoint of the bracket.
pub fn bisection(a: &LineSearchStep, b: &LineSearchStep) -> f64 {
    0.5 * (a.alpha + b.alpha)
}

/// Extremum of the quadratic matching `phi(a)`, `phi'(a)` and `phi(b)`.
pub fn quadratic(a: &LineSearchStep, b: &LineSearchStep) -> f64 {
    let dx = b.alpha - a.alpha;
    let curvature = (b.phi - a.phi - a.gphi * dx) / (dx * dx);
    a.alpha - a.gphi / (2.0 * curvature)
}

/// Stationary points of the cubic matching `phi` and `phi'` at both ends.
///
/// The first value is the cubic's local minimizer (Nocedal & Wright,
/// eq. 3.59); the second is the other stationary point. Both are `NaN`
/// when the cubic has no real stationary point.
pub fn cubic(a: &LineSearchStep, b: &LineSearchStep) -> (f64, f64) {
    let d1 = a.gphi + b.gphi - 3.0 * (a.phi - b.phi) / (a.alpha - b.alpha);
    let disc = d1 * d1 - a.gphi * b.gphi;
    if !(disc >= 0.0) {
        return (f64::NAN, f64::NAN);
    }
    let d2 = (b.alpha - a.alpha).signum() * disc.sqrt();
    let span = b.alpha - a.alpha;
    let min = b.alpha - span * (b.gphi + d2 - d1) / (b.gphi - a.gphi + 2.0 * d2);
    let other = b.alpha - span * (b.gphi - d2 - d1) / (b.gphi - a.gphi - 2.0 * d2);
    (min, other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exactness of the quadratic and cubic models on `phi(t) = (t - 1)²`.
    // - Degenerate input producing non-finite candidates.
    // -------------------------------------------------------------------------

    fn point(alpha: f64) -> LineSearchStep {
        let phi = (alpha - 1.0).powi(2);
        let gphi = 2.0 * (alpha - 1.0);
        LineSearchStep { alpha, phi, gphi, g: Array1::zeros(1) }
    }

    #[test]
    // Purpose
    // -------
    // Both models recover the minimizer of a quadratic exactly.
    //
    // Given
    // -----
    // - Trial points at `t = 0` and `t = 3` on `(t - 1)²`.
    //
    // Expect
    // ------
    // - Quadratic and cubic minimizers at `t = 1`; bisection at 1.5.
    fn models_are_exact_on_quadratics() {
        // Arrange
        let (a, b) = (point(0.0), point(3.0));

        // Act
        let q = quadratic(&a, &b);
        let (c, _) = cubic(&a, &b);

        // Assert
        assert_relative_eq!(q, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c, 1.0, epsilon = 1e-12);
        assert_relative_eq!(bisection(&a, &b), 1.5);
    }

    #[test]
    // Purpose
    // -------
    // A flat bracket gives no usable quadratic extremum.
    //
    // Given
    // -----
    // - Two points with equal values and zero slope at `a`.
    //
    // Expect
    // ------
    // - The quadratic candidate is non-finite.
    fn degenerate_quadratic_is_not_finite() {
        // Arrange
        let a = LineSearchStep { alpha: 0.0, phi: 1.0, gphi: 0.0, g: Array1::zeros(1) };
        let b = LineSearchStep { alpha: 1.0, phi: 1.0, gphi: 0.0, g: Array1::zeros(1) };

        // Act
        let q = quadratic(&a, &b);

        // Assert
        assert!(!q.is_finite());
    }
}
