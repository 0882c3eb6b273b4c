//! Epsilon thresholds and vector guards.
//!
//! `epsilon1 = sqrt(ε)` is the collapse threshold shared by the bracketing
//! line searches.
use crate::optimization::types::{EPSILON, Vector};

/// `sqrt(ε)`: relative width below which a bracket is considered collapsed.
pub fn epsilon1() -> f64 {
    EPSILON.sqrt()
}

/// Clamp `value` into `[lo, hi]`, passing `NaN` through unchanged.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Infinity norm `max_i |v_i|`; `NaN` if any entry is `NaN`.
pub fn norm_inf(v: &Vector) -> f64 {
    let mut acc = 0.0_f64;
    for &x in v {
        if x.is_nan() {
            return f64::NAN;
        }
        acc = acc.max(x.abs());
    }
    acc
}

/// `true` if every entry is finite.
pub fn all_finite(v: &Vector) -> bool {
    v.iter().all(|x| x.is_finite())
}
