//! Configuration shared by the full-batch solvers.
use serde::{Deserialize, Serialize};

use crate::optimization::{
    errors::{OptError, OptResult},
    line_search::{LineSearchInit, LineSearchStrategy},
    types::DEFAULT_LBFGS_MEM,
    validation::{verify_epsilon, verify_max_iter, verify_wolfe_coefficients},
};

/// Optimizer-level configuration for GD, CGD and L-BFGS.
///
/// Fields:
/// - `max_iterations`: hard cap on outer iterations (`> 0`).
/// - `epsilon`: stop when `‖g‖_∞ / (1 + |f|) < epsilon` (finite, `> 0`).
/// - `ls_init`, `ls_strategy`: line-search choices; `None` selects the
///   solver's default.
/// - `c1`, `c2`: sufficient-decrease and curvature coefficients; `None`
///   selects the solver's default. When both are given, `0 < c1 < c2 < 1`.
/// - `history_size`: L-BFGS memory `m` (`> 0`; ignored by other solvers).
/// - `verbose`: attach a terminal logger (behind the `obs_slog` feature).
///
/// Default:
/// - `max_iterations = 1000`, `epsilon = 1e-6`, line-search defaults,
///   `history_size = DEFAULT_LBFGS_MEM`, `verbose = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchParams {
    pub max_iterations: usize,
    pub epsilon: f64,
    #[serde(default)]
    pub ls_init: Option<LineSearchInit>,
    #[serde(default)]
    pub ls_strategy: Option<LineSearchStrategy>,
    #[serde(default)]
    pub c1: Option<f64>,
    #[serde(default)]
    pub c2: Option<f64>,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    #[serde(default)]
    pub verbose: bool,
}

fn default_history_size() -> usize {
    DEFAULT_LBFGS_MEM
}

impl BatchParams {
    /// Create validated parameters with solver-default line searches.
    ///
    /// # Errors
    /// - [`OptError::InvalidMaxIter`] if `max_iterations == 0`.
    /// - [`OptError::InvalidEpsilon`] if `epsilon` is non-finite or `≤ 0`.
    pub fn new(max_iterations: usize, epsilon: f64) -> OptResult<Self> {
        let params = Self {
            max_iterations,
            epsilon,
            ls_init: None,
            ls_strategy: None,
            c1: None,
            c2: None,
            history_size: DEFAULT_LBFGS_MEM,
            verbose: false,
        };
        params.validate()?;
        Ok(params)
    }

    /// Override the line-search initializer and strategy.
    pub fn with_line_search(mut self, init: LineSearchInit, strategy: LineSearchStrategy) -> Self {
        self.ls_init = Some(init);
        self.ls_strategy = Some(strategy);
        self
    }

    /// Override the Wolfe coefficients.
    ///
    /// # Errors
    /// [`OptError::InvalidLineSearchCoefficients`] unless `0 < c1 < c2 < 1`.
    pub fn with_coefficients(mut self, c1: f64, c2: f64) -> OptResult<Self> {
        verify_wolfe_coefficients(c1, c2)?;
        self.c1 = Some(c1);
        self.c2 = Some(c2);
        Ok(self)
    }

    /// Override the L-BFGS history size.
    ///
    /// # Errors
    /// [`OptError::InvalidLBFGSMem`] if `history_size == 0`.
    pub fn with_history_size(mut self, history_size: usize) -> OptResult<Self> {
        self.history_size = history_size;
        self.validate()?;
        Ok(self)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Re-check every invariant (used after deserialization).
    ///
    /// # Errors
    /// Any of the errors documented on the constructors.
    pub fn validate(&self) -> OptResult<()> {
        verify_max_iter(self.max_iterations)?;
        verify_epsilon(self.epsilon)?;
        if self.history_size == 0 {
            return Err(OptError::InvalidLBFGSMem {
                mem: self.history_size,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        if let (Some(c1), Some(c2)) = (self.c1, self.c2) {
            verify_wolfe_coefficients(c1, c2)?;
        }
        Ok(())
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    /// [`OptError::ConfigParse`] if serialization fails.
    pub fn to_json(&self) -> OptResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate parameters from JSON.
    ///
    /// # Errors
    /// [`OptError::ConfigParse`] for malformed text, or any validation error.
    pub fn from_json(text: &str) -> OptResult<Self> {
        let params: Self = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            epsilon: 1e-6,
            ls_init: None,
            ls_strategy: None,
            c1: None,
            c2: None,
            history_size: DEFAULT_LBFGS_MEM,
            verbose: false,
        }
    }
}
