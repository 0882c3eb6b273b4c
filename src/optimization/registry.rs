//! Name-based solver construction.
//!
//! [`SolverRegistry`] is an ordinary value mapping registry names to
//! constructor closures. Build one with [`SolverRegistry::with_defaults`],
//! pass it by reference to whatever needs to instantiate solvers by name,
//! and extend it with [`SolverRegistry::register`].
use std::collections::BTreeMap;
use std::fmt;

use crate::optimization::{
    batch::{BatchParams, BatchSolver, BatchSolverKind, CgdVariant},
    config::{ParamSpec, SolverConfig},
    errors::{OptError, OptResult},
    function::Function,
    state::SolverState,
    stochastic::{StochParams, StochSolver, StochSolverKind},
    types::{Logger, Vector},
};

/// Either solver family behind one interface.
#[derive(Debug, Clone, PartialEq)]
pub enum Solver {
    Batch(BatchSolver),
    Stoch(StochSolver),
}

impl Solver {
    pub fn name(&self) -> String {
        match self {
            Solver::Batch(solver) => solver.name(),
            Solver::Stoch(solver) => solver.name().to_string(),
        }
    }

    /// Hyperparameters accepted by [`Solver::configure`].
    pub fn param_specs(&self) -> Vec<ParamSpec> {
        match self {
            Solver::Batch(solver) => solver.kind().param_specs(),
            Solver::Stoch(solver) => solver.kind().param_specs(),
        }
    }

    /// # Errors
    /// [`OptError::UnknownParameter`], [`OptError::ParameterOutOfRange`] or
    /// invalid line-search coefficients.
    pub fn configure(self, config: &SolverConfig) -> OptResult<Self> {
        Ok(match self {
            Solver::Batch(solver) => Solver::Batch(solver.configure(config)?),
            Solver::Stoch(solver) => Solver::Stoch(solver.configure(config)?),
        })
    }

    /// Minimize with the family's default procedure (stochastic solvers
    /// tune first).
    ///
    /// # Errors
    /// Configuration and input errors.
    pub fn minimize(
        &self, function: &dyn Function, x0: &Vector, logger: Option<Logger<'_>>,
    ) -> OptResult<SolverState> {
        match self {
            Solver::Batch(solver) => solver.minimize(function, x0, logger),
            Solver::Stoch(solver) => solver.minimize(function, x0, logger),
        }
    }
}

type Factory = Box<dyn Fn() -> OptResult<Solver>>;

/// Explicit `name → constructor` map.
pub struct SolverRegistry {
    factories: BTreeMap<String, Factory>,
}

impl SolverRegistry {
    /// Registry without any entries.
    pub fn empty() -> Self {
        Self { factories: BTreeMap::new() }
    }

    /// Every built-in method with default parameters.
    pub fn with_defaults() -> Self {
        Self::with_params(BatchParams::default(), StochParams::default())
    }

    /// Every built-in method, constructed with the given parameter bundles.
    pub fn with_params(batch: BatchParams, stoch: StochParams) -> Self {
        let mut registry = Self::empty();
        for kind in BatchSolverKind::all() {
            let params = batch.clone();
            registry.register(&kind.name(), move || {
                Ok(Solver::Batch(BatchSolver::new(kind, params.clone())?))
            });
        }
        // "cgd" alone names the Hager–Zhang variant.
        let params = batch.clone();
        registry.register("cgd", move || {
            let kind = BatchSolverKind::Cgd(CgdVariant::N);
            Ok(Solver::Batch(BatchSolver::new(kind, params.clone())?))
        });
        for kind in StochSolverKind::ALL {
            let params = stoch.clone();
            registry.register(kind.name(), move || {
                Ok(Solver::Stoch(StochSolver::new(kind, params.clone())?))
            });
        }
        registry
    }

    /// Add or replace a constructor.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> OptResult<Solver> + 'static,
    {
        self.factories.insert(name.to_ascii_lowercase(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_ascii_lowercase())
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Construct the solver registered under `name` (case-insensitive).
    ///
    /// # Errors
    /// [`OptError::UnknownSolver`] if nothing is registered under `name`,
    /// or the constructor's own error.
    pub fn get(&self, name: &str) -> OptResult<Solver> {
        match self.factories.get(&name.to_ascii_lowercase()) {
            Some(factory) => factory(),
            None => Err(OptError::UnknownSolver { name: name.to_string() }),
        }
    }

    /// [`SolverRegistry::get`] followed by [`Solver::configure`].
    ///
    /// # Errors
    /// As for `get` and `configure`.
    pub fn get_configured(&self, name: &str, config: &SolverConfig) -> OptResult<Solver> {
        self.get(name)?.configure(config)
    }
}

impl Default for SolverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for SolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverRegistry").field("names", &self.factories.keys()).finish()
    }
}
