//! Shared epoch loop of the stochastic solvers.
//!
//! Two states are tracked. The *current* state follows the rule's inner
//! steps on stochastic samples; the *snapshot* state is a full evaluation at
//! the rule's representative point after each epoch and is what the run
//! reports. Stopping decisions are made on snapshots only.
use crate::optimization::{
    errors::OptResult,
    function::{Counted, Function},
    state::{FailureReason, SolverState, Status},
    stochastic::params::StochParams,
    types::{Logger, Vector},
    validation::validate_initial_point,
};
#[cfg(feature = "obs_slog")]
use crate::optimization::observer::SlogObserver;

/// Inner update rule of a stochastic solver.
pub trait StochRule {
    /// Called before the first inner step of every epoch.
    fn epoch_start(&mut self, _function: &dyn Function, _state: &SolverState) {}

    /// One inner step. The rule evaluates whatever it needs on the current
    /// sample and moves `state.x`; it never calls `stoch_next`.
    fn step(&mut self, function: &dyn Function, state: &mut SolverState);

    /// Point evaluated (fully) at the end of an epoch.
    fn snapshot(&self, state: &SolverState) -> Vector {
        state.x.clone()
    }
}

/// Run `rule` for up to `epochs` epochs from `x0`.
///
/// Per epoch: `epoch_start`, then `params.epoch_size` inner steps each
/// followed by `stoch_next()`, then a full evaluation at the snapshot point.
/// The run ends with:
/// - `Failed(Diverged)` as soon as the current or snapshot state is
///   non-finite;
/// - `Converged` when the snapshot meets `params.epsilon`;
/// - `Failed(Stagnated)` when the snapshot value does not drop by more than
///   `params.epsilon` compared with the previous snapshot;
/// - `Stopped` when `logger` returns `false` on an otherwise running epoch;
/// - `MaxIterations` otherwise.
///
/// `logger` sees the returned state once per epoch, including the epoch
/// that ends the run. The returned state is the last accepted snapshot;
/// `iterations` counts completed epochs.
///
/// # Errors
/// Parameter validation errors and a bad `x0`.
#[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
pub fn run_stoch(
    name: &str, function: &dyn Function, x0: &Vector, params: &StochParams, epochs: usize,
    rule: &mut dyn StochRule, mut logger: Option<Logger<'_>>,
) -> OptResult<SolverState> {
    params.validate()?;
    validate_initial_point(x0, function.size())?;
    let counted = Counted::new(function);

    #[cfg(feature = "obs_slog")]
    let observer = params.verbose.then(|| SlogObserver::term(name));

    let mut current = SolverState::stoch_new(&counted, x0.clone());
    let mut best = SolverState::new(&counted, x0.clone());
    #[cfg(feature = "obs_slog")]
    if let Some(obs) = &observer {
        obs.initial(&best);
    }
    if !best.is_valid() {
        best.fail(FailureReason::Diverged);
    } else if best.converged(params.epsilon) {
        best.status = Status::Converged;
    }

    let mut epoch = 0;
    while best.status == Status::Running && epoch < epochs {
        epoch += 1;
        rule.epoch_start(&counted, &current);
        let mut diverged = false;
        for _ in 0..params.epoch_size {
            rule.step(&counted, &mut current);
            counted.stoch_next();
            if !current.is_valid() {
                diverged = true;
                break;
            }
        }
        if diverged {
            best.iterations = epoch;
            best.fail(FailureReason::Diverged);
        } else {
            let mut snapshot = SolverState::new(&counted, rule.snapshot(&current));
            snapshot.iterations = epoch;
            #[cfg(feature = "obs_slog")]
            if let Some(obs) = &observer {
                obs.iteration(&snapshot);
            }
            if !snapshot.is_valid() {
                best.iterations = epoch;
                best.fail(FailureReason::Diverged);
            } else if snapshot.converged(params.epsilon) {
                snapshot.status = Status::Converged;
                best = snapshot;
            } else if !(snapshot.f < best.f - params.epsilon) {
                best.iterations = epoch;
                best.fail(FailureReason::Stagnated);
            } else {
                best = snapshot;
            }
        }

        // Once per epoch, terminal epochs included.
        if let Some(log) = logger.as_mut() {
            if !log(&best) && best.status == Status::Running {
                best.status = Status::Stopped;
            }
        }
    }
    if best.status == Status::Running {
        best.status = Status::MaxIterations;
    }

    best.fcalls = counted.counter().fcalls();
    best.gcalls = counted.counter().gcalls();
    #[cfg(feature = "obs_slog")]
    if let Some(obs) = &observer {
        obs.finished(&best);
    }
    Ok(best)
}
