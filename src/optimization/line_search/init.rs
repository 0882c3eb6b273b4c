//! Initial step-length proposals for batch line searches.
//!
//! Variants:
//! - `Unit`: always `1` (natural for quasi-Newton directions).
//! - `Quadratic`: `t_prev · (g_prev · d_prev) / (g · d)`, assuming the
//!   first-order change along consecutive directions stays the same.
//! - `Consistent`: `min(1, 1.01 · 2 · (f - f_prev) / (g · d))`, the minimizer
//!   of the quadratic through the last decrease.
//!
//! The first iteration and any non-finite or too-small proposal fall back
//! to `1`.
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::optimization::{
    errors::OptError,
    line_search::step::{STEP_MAX, STEP_MIN},
    state::SolverState,
};

/// Strategy for the line search's first trial step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSearchInit {
    Unit,
    Quadratic,
    Consistent,
}

impl FromStr for LineSearchInit {
    type Err = OptError;

    /// Parse an initializer name (case-insensitive): `"unit"`,
    /// `"quadratic"` or `"consistent"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unit" => Ok(LineSearchInit::Unit),
            "quadratic" => Ok(LineSearchInit::Quadratic),
            "consistent" => Ok(LineSearchInit::Consistent),
            _ => Err(OptError::InvalidLineSearchInit {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'unit', 'quadratic' or 'consistent'.",
            }),
        }
    }
}

/// Memory of the previous iteration needed by the proposals.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Previous {
    f: f64,
    dg: f64,
    t: f64,
}

/// Stateful initializer; one per solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInitializer {
    kind: LineSearchInit,
    prev: Option<Previous>,
}

impl StepInitializer {
    pub fn new(kind: LineSearchInit) -> Self {
        Self { kind, prev: None }
    }

    /// Propose `t0` for the line search from `state` (with its new direction).
    pub fn initial(&self, state: &SolverState) -> f64 {
        let Some(prev) = self.prev else {
            return 1.0;
        };
        let dg = state.dg();
        let t0 = match self.kind {
            LineSearchInit::Unit => 1.0,
            LineSearchInit::Quadratic => prev.t * prev.dg / dg,
            LineSearchInit::Consistent => (1.01 * 2.0 * (state.f - prev.f) / dg).min(1.0),
        };
        if t0.is_finite() && t0 > STEP_MIN { t0.min(STEP_MAX) } else { 1.0 }
    }

    /// Remember the state a line search started from and the accepted step.
    pub fn record(&mut self, before: &SolverState, t: f64) {
        self.prev = Some(Previous { f: before.f, dg: before.dg(), t });
    }
}
