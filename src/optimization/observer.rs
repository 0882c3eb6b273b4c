//! Optional terminal progress logging for solver runs.
//!
//! Only compiled with the `obs_slog` feature; solvers attach an observer when
//! their parameter bundle has `verbose = true`. Without the feature, solvers
//! perform no I/O at all.
use slog::{Drain, Logger, info, o};

use crate::optimization::state::SolverState;

/// Asynchronous terminal logger tagged with the solver name.
pub struct SlogObserver {
    logger: Logger,
}

impl SlogObserver {
    /// Build a non-blocking terminal logger.
    pub fn term(solver: &str) -> Self {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        let logger = Logger::root(drain, o!("solver" => solver.to_string()));
        Self { logger }
    }

    /// Log the state a run starts from.
    pub fn initial(&self, state: &SolverState) {
        info!(self.logger, "init";
            "f" => state.f,
            "criterion" => state.convergence_criterion(),
        );
    }

    /// Log one outer iteration (batch) or epoch (stochastic).
    pub fn iteration(&self, state: &SolverState) {
        info!(self.logger, "iter";
            "iter" => state.iterations,
            "f" => state.f,
            "criterion" => state.convergence_criterion(),
        );
    }

    /// Log the terminal status.
    pub fn finished(&self, state: &SolverState) {
        let failure = state.failure.map(|r| r.to_string()).unwrap_or_default();
        info!(self.logger, "done";
            "status" => state.status.to_string(),
            "failure" => failure,
            "iterations" => state.iterations,
            "f" => state.f,
            "fcalls" => state.fcalls,
            "gcalls" => state.gcalls,
        );
    }
}
