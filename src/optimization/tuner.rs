//! Grid search over solver hyperparameters.
//!
//! [`tune`] evaluates every point of the Cartesian product of the given
//! [`TuneSpace`]s and keeps the configuration whose terminal state ranks
//! first under [`SolverState::tuning_cmp`] (non-failed before failed, then
//! lowest `f`, non-finite values last). Ties keep the earliest candidate.
use crate::optimization::{
    config::SolverConfig,
    errors::{OptError, OptResult},
    state::SolverState,
};

/// Finite set of candidate values for one hyperparameter.
#[derive(Debug, Clone, PartialEq)]
pub struct TuneSpace {
    pub name: String,
    pub values: Vec<f64>,
}

impl TuneSpace {
    /// # Errors
    /// [`OptError::InvalidTuneSpace`] for an empty name, no values, or a
    /// non-finite value.
    pub fn new(name: &str, values: &[f64]) -> OptResult<Self> {
        let space = Self { name: name.to_string(), values: values.to_vec() };
        space.validate()?;
        Ok(space)
    }

    /// Check the invariants of [`TuneSpace::new`] on a space that may have
    /// been built field by field.
    ///
    /// # Errors
    /// [`OptError::InvalidTuneSpace`] with the first violated rule.
    pub fn validate(&self) -> OptResult<()> {
        let reason = if self.name.is_empty() {
            "Tuning spaces need a parameter name."
        } else if self.values.is_empty() {
            "Tuning spaces need at least one value."
        } else if self.values.iter().any(|v| !v.is_finite()) {
            "Tuning values must be finite."
        } else {
            return Ok(());
        };
        Err(OptError::InvalidTuneSpace { name: self.name.clone(), reason })
    }
}

/// Best configuration found and the bookkeeping of the search.
#[derive(Debug, Clone, PartialEq)]
pub struct TuneOutcome {
    pub config: SolverConfig,
    pub state: SolverState,
    /// Number of configurations evaluated.
    pub trials: usize,
    /// Evaluations summed over all trials.
    pub fcalls: usize,
    pub gcalls: usize,
}

/// Evaluate `op` on every configuration of the grid and keep the best.
///
/// With no spaces, `op` runs once on an empty configuration.
///
/// # Errors
/// - [`OptError::InvalidTuneSpace`] if any space is invalid; `op` is not
///   called.
/// - The first error returned by `op`.
pub fn tune<F>(spaces: &[TuneSpace], mut op: F) -> OptResult<TuneOutcome>
where
    F: FnMut(&SolverConfig) -> OptResult<SolverState>,
{
    for space in spaces {
        space.validate()?;
    }
    let mut index = vec![0usize; spaces.len()];
    let mut best: Option<(SolverConfig, SolverState)> = None;
    let (mut trials, mut fcalls, mut gcalls) = (0, 0, 0);

    loop {
        let config: SolverConfig = spaces
            .iter()
            .zip(&index)
            .map(|(space, &i)| (space.name.clone(), space.values[i]))
            .collect();
        let state = op(&config)?;
        trials += 1;
        fcalls += state.fcalls;
        gcalls += state.gcalls;
        let better = match &best {
            None => true,
            Some((_, current)) => state.tuning_cmp(current).is_lt(),
        };
        if better {
            best = Some((config, state));
        }

        // Odometer increment over the grid.
        let mut axis = 0;
        while axis < spaces.len() {
            index[axis] += 1;
            if index[axis] < spaces[axis].values.len() {
                break;
            }
            index[axis] = 0;
            axis += 1;
        }
        if axis == spaces.len() {
            break;
        }
    }

    match best {
        Some((config, state)) => Ok(TuneOutcome { config, state, trials, fcalls, gcalls }),
        None => Err(OptError::UnknownError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        function::catalog::Sphere,
        state::{FailureReason, SolverState},
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exhaustive enumeration of the Cartesian product.
    // - Selection by tuning order, including failed candidates.
    // - Space validation and error propagation.
    // -------------------------------------------------------------------------

    fn state_with(f: f64) -> SolverState {
        let mut state = SolverState::new(&Sphere::new(1), array![0.0]);
        state.f = f;
        state.fcalls = 1;
        state
    }

    #[test]
    // Purpose
    // -------
    // Every grid point is visited exactly once and the minimum is kept.
    //
    // Given
    // -----
    // - `a ∈ {1, 2, 3}`, `b ∈ {10, 20}`, objective `(a − 2)² + b`.
    //
    // Expect
    // ------
    // - 6 trials, best `{a: 2, b: 10}`, summed counters.
    fn visits_full_grid_and_keeps_best() {
        // Arrange
        let spaces = [
            TuneSpace::new("a", &[1.0, 2.0, 3.0]).expect("valid space"),
            TuneSpace::new("b", &[10.0, 20.0]).expect("valid space"),
        ];
        let mut seen = Vec::new();

        // Act
        let outcome = tune(&spaces, |config| {
            let (a, b) = (config.get("a").unwrap_or(0.0), config.get("b").unwrap_or(0.0));
            seen.push((a, b));
            Ok(state_with((a - 2.0).powi(2) + b))
        })
        .expect("tuning succeeds");

        // Assert
        assert_eq!(outcome.trials, 6);
        assert_eq!(outcome.fcalls, 6);
        assert_eq!(seen.len(), 6);
        assert_eq!(outcome.config, SolverConfig::new().with("a", 2.0).with("b", 10.0));
    }

    #[test]
    // Purpose
    // -------
    // Failed and NaN candidates lose to any finite, non-failed candidate.
    //
    // Given
    // -----
    // - `k ∈ {0, 1, 2}` producing a failed state with `f = -1`, a NaN state
    //   and a plain state with `f = 5`.
    //
    // Expect
    // ------
    // - The plain state (`k = 2`) wins.
    fn failed_and_nan_candidates_lose() {
        // Arrange
        let spaces = [TuneSpace::new("k", &[0.0, 1.0, 2.0]).expect("valid space")];

        // Act
        let outcome = tune(&spaces, |config| {
            let k = config.get("k").unwrap_or(0.0);
            let mut state = state_with(5.0);
            if k == 0.0 {
                state.f = -1.0;
                state.fail(FailureReason::Stagnated);
            } else if k == 1.0 {
                state.f = f64::NAN;
            }
            Ok(state)
        })
        .expect("tuning succeeds");

        // Assert
        assert_eq!(outcome.config.get("k"), Some(2.0));
    }

    #[test]
    // Purpose
    // -------
    // Empty spaces are rejected and operation errors propagate.
    //
    // Given
    // -----
    // - A space without values; an operation that always errors.
    //
    // Expect
    // ------
    // - `InvalidTuneSpace`; the operation's error.
    fn validation_and_errors() {
        // Act & Assert
        assert!(matches!(TuneSpace::new("alpha0", &[]), Err(OptError::InvalidTuneSpace { .. })));
        assert!(TuneSpace::new("", &[1.0]).is_err());
        let result = tune(&[], |_| Err(OptError::UnknownError));
        assert_eq!(result, Err(OptError::UnknownError));
    }

    #[test]
    // Purpose
    // -------
    // Spaces assembled field by field are validated before any trial runs.
    //
    // Given
    // -----
    // - A literal `TuneSpace` with no values, and one with a NaN value.
    //
    // Expect
    // ------
    // - `InvalidTuneSpace` for both and the operation is never called.
    fn hand_built_invalid_spaces_are_rejected_without_trials() {
        // Arrange
        let empty = TuneSpace { name: "alpha0".to_string(), values: Vec::new() };
        let nan = TuneSpace { name: "decay".to_string(), values: vec![0.5, f64::NAN] };
        let mut calls = 0;

        // Act
        let empty_result = tune(&[empty], |_| {
            calls += 1;
            Ok(state_with(1.0))
        });
        let nan_result = tune(&[nan], |_| {
            calls += 1;
            Ok(state_with(1.0))
        });

        // Assert
        assert!(matches!(empty_result, Err(OptError::InvalidTuneSpace { .. })));
        assert!(matches!(nan_result, Err(OptError::InvalidTuneSpace { .. })));
        assert_eq!(calls, 0);
    }
}
