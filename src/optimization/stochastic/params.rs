//! Configuration shared by the stochastic solvers.
use serde::{Deserialize, Serialize};

use crate::optimization::{
    errors::{OptError, OptResult},
    validation::{verify_epoch_size, verify_epsilon, verify_max_iter},
};

/// Epoch budget and stopping rule of a stochastic run.
///
/// Fields:
/// - `max_epochs`: number of epochs of the full run (`> 0`).
/// - `epoch_size`: inner steps per epoch (`> 0`).
/// - `epsilon`: convergence tolerance on the epoch snapshot, and the minimum
///   decrease of the snapshot value between epochs (finite, `> 0`).
/// - `tune_epochs`: epochs per trial while tuning (`> 0`, `≤ max_epochs`).
/// - `verbose`: attach a terminal logger (behind the `obs_slog` feature).
///
/// Default:
/// - `max_epochs = 100`, `epoch_size = 20`, `epsilon = 1e-6`,
///   `tune_epochs = 2`, `verbose = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochParams {
    pub max_epochs: usize,
    pub epoch_size: usize,
    pub epsilon: f64,
    #[serde(default = "default_tune_epochs")]
    pub tune_epochs: usize,
    #[serde(default)]
    pub verbose: bool,
}

fn default_tune_epochs() -> usize {
    2
}

impl StochParams {
    /// # Errors
    /// - [`OptError::InvalidMaxIter`] if `max_epochs == 0`.
    /// - [`OptError::InvalidEpochSize`] if `epoch_size == 0`.
    /// - [`OptError::InvalidEpsilon`] if `epsilon` is non-finite or `≤ 0`.
    pub fn new(max_epochs: usize, epoch_size: usize, epsilon: f64) -> OptResult<Self> {
        let params = Self {
            max_epochs,
            epoch_size,
            epsilon,
            tune_epochs: default_tune_epochs().min(max_epochs),
            verbose: false,
        };
        params.validate()?;
        Ok(params)
    }

    /// # Errors
    /// [`OptError::InvalidMaxIter`] unless `0 < tune_epochs ≤ max_epochs`.
    pub fn with_tune_epochs(mut self, tune_epochs: usize) -> OptResult<Self> {
        self.tune_epochs = tune_epochs;
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
        verify_max_iter(self.max_epochs)?;
        verify_epoch_size(self.epoch_size)?;
        verify_epsilon(self.epsilon)?;
        if self.tune_epochs == 0 || self.tune_epochs > self.max_epochs {
            return Err(OptError::InvalidMaxIter {
                max_iter: self.tune_epochs,
                reason: "Tuning epochs must be positive and at most the epoch budget.",
            });
        }
        Ok(())
    }

    /// # Errors
    /// [`OptError::ConfigParse`] if serialization fails.
    pub fn to_json(&self) -> OptResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    /// [`OptError::ConfigParse`] for malformed text, or any validation error.
    pub fn from_json(text: &str) -> OptResult<Self> {
        let params: Self = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }
}

impl Default for StochParams {
    fn default() -> Self {
        Self { max_epochs: 100, epoch_size: 20, epsilon: 1e-6, tune_epochs: 2, verbose: false }
    }
}
