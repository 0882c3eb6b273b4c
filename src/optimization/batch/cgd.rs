//! Nonlinear conjugate gradient update rules.
//!
//! Each variant computes `β` from the previous state `(g_prev, d_prev)` and
//! the current gradient `g`; the new direction is `d = -g + β·d_prev`.
//! The direction falls back to `-g` on the first iteration and whenever the
//! combination is non-finite or not a strict descent direction.
use std::fmt;
use std::str::FromStr;

use argmin_math::ArgminL2Norm;
use serde::{Deserialize, Serialize};

use crate::optimization::{
    errors::OptError,
    numerics::all_finite,
    state::SolverState,
    types::Vector,
};

/// `β` formula of a nonlinear conjugate gradient method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CgdVariant {
    /// Hestenes–Stiefel.
    Hs,
    /// Fletcher–Reeves.
    Fr,
    /// Polak–Ribière–Polyak.
    Prp,
    /// Conjugate descent (Fletcher).
    Cd,
    /// Liu–Storey.
    Ls,
    /// Dai–Yuan.
    Dy,
    /// Hager–Zhang, with the lower truncation `η`.
    N,
    /// Hybrid Dai–Yuan / conjugate descent.
    Dycd,
    /// Hybrid Dai–Yuan / Hestenes–Stiefel.
    Dyhs,
}

impl CgdVariant {
    /// All variants, in registry order.
    pub const ALL: [CgdVariant; 9] = [
        CgdVariant::N,
        CgdVariant::Hs,
        CgdVariant::Fr,
        CgdVariant::Prp,
        CgdVariant::Cd,
        CgdVariant::Ls,
        CgdVariant::Dy,
        CgdVariant::Dycd,
        CgdVariant::Dyhs,
    ];

    /// Short lowercase tag, e.g. `"prp"`.
    pub fn tag(&self) -> &'static str {
        match self {
            CgdVariant::Hs => "hs",
            CgdVariant::Fr => "fr",
            CgdVariant::Prp => "prp",
            CgdVariant::Cd => "cd",
            CgdVariant::Ls => "ls",
            CgdVariant::Dy => "dy",
            CgdVariant::N => "n",
            CgdVariant::Dycd => "dycd",
            CgdVariant::Dyhs => "dyhs",
        }
    }

    /// Conjugacy coefficient for the step from `prev` to `curr`.
    pub fn beta(&self, prev: &SolverState, curr: &SolverState) -> f64 {
        let g = &curr.g;
        let gp = &prev.g;
        let dp = &prev.d;
        let y = g - gp;
        match self {
            CgdVariant::Hs => g.dot(&y) / dp.dot(&y),
            CgdVariant::Fr => g.dot(g) / gp.dot(gp),
            CgdVariant::Prp => g.dot(&y) / gp.dot(gp),
            CgdVariant::Cd => -g.dot(g) / dp.dot(gp),
            CgdVariant::Ls => -g.dot(&y) / dp.dot(gp),
            CgdVariant::Dy => g.dot(g) / dp.dot(&y),
            CgdVariant::N => {
                let dy = dp.dot(&y);
                let yy = y.dot(&y);
                let beta = (&y - &(dp * (2.0 * yy / dy))).dot(g) / dy;
                let eta = -1.0 / (dp.l2_norm() * gp.l2_norm().min(0.01));
                beta.max(eta)
            }
            CgdVariant::Dycd => g.dot(g) / dp.dot(&y).max(-dp.dot(gp)),
            CgdVariant::Dyhs => {
                let dy = CgdVariant::Dy.beta(prev, curr);
                let hs = CgdVariant::Hs.beta(prev, curr);
                dy.min(hs).max(0.0)
            }
        }
    }
}

impl fmt::Display for CgdVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for CgdVariant {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        CgdVariant::ALL.into_iter().find(|v| v.tag() == lower).ok_or_else(|| {
            OptError::UnknownSolver { name: format!("cgd-{s}") }
        })
    }
}

/// Conjugate direction for `curr`, restarting along `-g` when needed.
pub fn cgd_direction(variant: CgdVariant, prev: Option<&SolverState>, curr: &SolverState) -> Vector {
    let steepest = -&curr.g;
    let Some(prev) = prev else {
        return steepest;
    };
    let beta = variant.beta(prev, curr);
    if !beta.is_finite() {
        return steepest;
    }
    let mut d = steepest.clone();
    d.scaled_add(beta, &prev.d);
    if all_finite(&d) && curr.g.dot(&d) < 0.0 { d } else { steepest }
}
