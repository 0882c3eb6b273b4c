//! Shared driving loop of the full-batch solvers.
//!
//! Every batch solver is "pick a descent direction, then line-search along
//! it"; only the direction differs. [`run_batch`] owns everything else:
//! input validation, evaluation counting, the step initializer, the line
//! search, status transitions and the per-iteration callback.
use crate::optimization::{
    batch::{
        cgd::{CgdVariant, cgd_direction},
        lbfgs::{LbfgsMemory, lbfgs_direction},
        params::BatchParams,
    },
    errors::OptResult,
    function::{Counted, Function},
    line_search::{LineSearch, LineSearchInit, LineSearchStrategy, StepInitializer},
    state::{FailureReason, SolverState, Status},
    types::{Logger, Vector},
    validation::validate_initial_point,
};
#[cfg(feature = "obs_slog")]
use crate::optimization::observer::SlogObserver;

/// Strategy computing the search direction of one batch iteration.
pub trait BatchDirection {
    /// Direction for `curr`; `prev` is the state the last line search
    /// started from (with the direction it used), `None` on the first
    /// iteration.
    fn direction(&mut self, prev: Option<&SolverState>, curr: &SolverState) -> Vector;
}

/// Steepest descent.
#[derive(Debug, Clone, Copy, Default)]
pub struct GdDirection;

impl BatchDirection for GdDirection {
    fn direction(&mut self, _prev: Option<&SolverState>, curr: &SolverState) -> Vector {
        -&curr.g
    }
}

/// Nonlinear conjugate gradient with a fixed `β` formula.
#[derive(Debug, Clone, Copy)]
pub struct CgdDirection {
    pub variant: CgdVariant,
}

impl BatchDirection for CgdDirection {
    fn direction(&mut self, prev: Option<&SolverState>, curr: &SolverState) -> Vector {
        cgd_direction(self.variant, prev, curr)
    }
}

/// L-BFGS; stores the newest curvature pair before computing the direction.
#[derive(Debug, Clone)]
pub struct LbfgsDirection {
    memory: LbfgsMemory,
}

impl LbfgsDirection {
    pub fn new(history_size: usize) -> Self {
        Self { memory: LbfgsMemory::new(history_size) }
    }
}

impl BatchDirection for LbfgsDirection {
    fn direction(&mut self, prev: Option<&SolverState>, curr: &SolverState) -> Vector {
        if let Some(prev) = prev {
            self.memory.push(&curr.x - &prev.x, &curr.g - &prev.g);
        }
        lbfgs_direction(&mut self.memory, &curr.g)
    }
}

/// Fully resolved line-search choice of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSearchSetup {
    pub init: LineSearchInit,
    pub strategy: LineSearchStrategy,
    pub c1: f64,
    pub c2: f64,
}

/// Run a batch solver from `x0`.
///
/// Per iteration: check convergence, take a direction from `direction`,
/// propose `t0`, line-search, commit the step, report to `logger`.
///
/// # Returns
/// The terminal state. On line-search failure this is the last accepted
/// state with `status = Failed` and the line-search reason.
///
/// # Errors
/// - Parameter validation errors from [`BatchParams::validate`].
/// - [`crate::optimization::errors::OptError::DimensionMismatch`] or
///   `InvalidInitialPoint` for a bad `x0`.
/// - Invalid line-search coefficients in `setup`.
#[cfg_attr(not(feature = "obs_slog"), allow(unused_variables))]
pub fn run_batch(
    name: &str, function: &dyn Function, x0: &Vector, params: &BatchParams,
    setup: &LineSearchSetup, direction: &mut dyn BatchDirection, mut logger: Option<Logger<'_>>,
) -> OptResult<SolverState> {
    params.validate()?;
    validate_initial_point(x0, function.size())?;
    let mut line_search = LineSearch::new(setup.strategy, setup.c1, setup.c2)?;
    let mut initializer = StepInitializer::new(setup.init);
    let counted = Counted::new(function);

    #[cfg(feature = "obs_slog")]
    let observer = params.verbose.then(|| SlogObserver::term(name));

    let mut state = SolverState::new(&counted, x0.clone());
    #[cfg(feature = "obs_slog")]
    if let Some(obs) = &observer {
        obs.initial(&state);
    }
    if !state.is_valid() {
        state.fail(FailureReason::Diverged);
    }

    let mut prev: Option<SolverState> = None;
    while state.status == Status::Running {
        if state.converged(params.epsilon) {
            state.status = Status::Converged;
            break;
        }
        if state.iterations >= params.max_iterations {
            state.status = Status::MaxIterations;
            break;
        }

        state.d = direction.direction(prev.as_ref(), &state);
        let t0 = initializer.initial(&state);
        let step = match line_search.search(&counted, &state, t0) {
            Ok(step) => step,
            Err(err) => {
                state.fail(FailureReason::LineSearch(err));
                break;
            }
        };
        initializer.record(&state, step.alpha);
        let before = state.clone();
        state.update_with(step.alpha, step.phi, &step.g);
        prev = Some(before);
        state.iterations += 1;

        #[cfg(feature = "obs_slog")]
        if let Some(obs) = &observer {
            obs.iteration(&state);
        }
        if !state.is_valid() {
            state.fail(FailureReason::Diverged);
        } else if let Some(log) = logger.as_mut() {
            if !log(&state) {
                state.status = Status::Stopped;
            }
        }
    }

    state.fcalls = counted.counter().fcalls();
    state.gcalls = counted.counter().gcalls();
    #[cfg(feature = "obs_slog")]
    if let Some(obs) = &observer {
        obs.finished(&state);
    }
    Ok(state)
}
