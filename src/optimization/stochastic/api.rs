//! Public entry points of the stochastic solvers.
use std::fmt;
use std::str::FromStr;

use crate::optimization::{
    config::{ParamSpec, SolverConfig},
    errors::{OptError, OptResult},
    function::Function,
    state::SolverState,
    stochastic::{
        params::StochParams,
        rules::{AdaDelta, AdaGrad, Adam, Ag, AgRestart, Asgd, Cocob, Ngd, RmsProp, Sg, Sgm, Svrg},
        run::{StochRule, run_stoch},
    },
    tuner::{TuneOutcome, TuneSpace, tune},
    types::{Logger, Vector},
};

const OPEN_ONE: f64 = 1.0 - 1e-6;

const ALPHA0: ParamSpec = ParamSpec::new("alpha0", 1e-1, 1e-6, 10.0);
const DECAY: ParamSpec = ParamSpec::new("decay", 0.5, 0.0, 1.0);
const MOMENTUM: ParamSpec = ParamSpec::new("momentum", 0.9, 0.0, OPEN_ONE);
const EPSILON: ParamSpec = ParamSpec::new("epsilon", 1e-6, 1e-12, 1.0);
const Q: ParamSpec = ParamSpec::new("q", 0.0, 0.0, OPEN_ONE);
const ADADELTA_MOMENTUM: ParamSpec = ParamSpec::new("momentum", 0.95, 0.0, OPEN_ONE);
const ADAM_ALPHA0: ParamSpec = ParamSpec::new("alpha0", 1e-2, 1e-6, 10.0);
const ADAM_EPSILON: ParamSpec = ParamSpec::new("epsilon", 1e-8, 1e-12, 1.0);
const BETA1: ParamSpec = ParamSpec::new("beta1", 0.9, 0.0, OPEN_ONE);
const BETA2: ParamSpec = ParamSpec::new("beta2", 0.999, 0.0, OPEN_ONE);
const COCOB_ALPHA: ParamSpec = ParamSpec::new("alpha", 100.0, 1.0, 1e4);

const ALPHA0_GRID: [f64; 4] = [1e-3, 1e-2, 1e-1, 1e0];
const DECAY_GRID: [f64; 5] = [0.1, 0.2, 0.5, 0.75, 1.0];
const MOMENTUM_GRID: [f64; 3] = [0.1, 0.5, 0.9];
const EPSILON_GRID: [f64; 3] = [1e-6, 1e-5, 1e-4];
const Q_GRID: [f64; 4] = [0.05, 0.10, 0.15, 0.20];

/// Which stochastic method to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StochSolverKind {
    Sg,
    Sgm,
    Ngd,
    Ag,
    Agfr,
    Aggr,
    AdaGrad,
    AdaDelta,
    RmsProp,
    Adam,
    AmsGrad,
    Asgd,
    Svrg,
    Cocob,
}

impl StochSolverKind {
    /// Every stochastic method, in registry order.
    pub const ALL: [StochSolverKind; 14] = [
        StochSolverKind::Sg,
        StochSolverKind::Sgm,
        StochSolverKind::Ngd,
        StochSolverKind::Ag,
        StochSolverKind::Agfr,
        StochSolverKind::Aggr,
        StochSolverKind::AdaGrad,
        StochSolverKind::AdaDelta,
        StochSolverKind::RmsProp,
        StochSolverKind::Adam,
        StochSolverKind::AmsGrad,
        StochSolverKind::Asgd,
        StochSolverKind::Svrg,
        StochSolverKind::Cocob,
    ];

    /// Registry name, e.g. `"sgm"`, `"agfr"`, `"amsgrad"`.
    pub fn name(&self) -> &'static str {
        match self {
            StochSolverKind::Sg => "sg",
            StochSolverKind::Sgm => "sgm",
            StochSolverKind::Ngd => "ngd",
            StochSolverKind::Ag => "ag",
            StochSolverKind::Agfr => "agfr",
            StochSolverKind::Aggr => "aggr",
            StochSolverKind::AdaGrad => "adagrad",
            StochSolverKind::AdaDelta => "adadelta",
            StochSolverKind::RmsProp => "rmsprop",
            StochSolverKind::Adam => "adam",
            StochSolverKind::AmsGrad => "amsgrad",
            StochSolverKind::Asgd => "asgd",
            StochSolverKind::Svrg => "svrg",
            StochSolverKind::Cocob => "cocob",
        }
    }

    /// Hyperparameter schema, in the order [`StochSolverKind::build_rule`]
    /// expects the values.
    pub fn param_specs(&self) -> Vec<ParamSpec> {
        match self {
            StochSolverKind::Sg | StochSolverKind::Ngd | StochSolverKind::Svrg => {
                vec![ALPHA0, DECAY]
            }
            StochSolverKind::Sgm | StochSolverKind::Asgd => vec![ALPHA0, DECAY, MOMENTUM],
            StochSolverKind::Ag | StochSolverKind::Agfr | StochSolverKind::Aggr => {
                vec![ALPHA0, DECAY, Q]
            }
            StochSolverKind::AdaGrad => vec![ALPHA0, EPSILON],
            StochSolverKind::AdaDelta => vec![ADADELTA_MOMENTUM, EPSILON],
            StochSolverKind::RmsProp => vec![ALPHA0, MOMENTUM, EPSILON],
            StochSolverKind::Adam | StochSolverKind::AmsGrad => {
                vec![ADAM_ALPHA0, ADAM_EPSILON, BETA1, BETA2]
            }
            StochSolverKind::Cocob => vec![COCOB_ALPHA],
        }
    }

    /// Grid explored by [`StochSolver::tune`]; empty for parameter-free
    /// methods.
    pub fn tune_spaces(&self) -> Vec<TuneSpace> {
        let space =
            |name: &str, values: &[f64]| TuneSpace { name: name.to_string(), values: values.to_vec() };
        let alpha0 = space("alpha0", &ALPHA0_GRID);
        let decay = space("decay", &DECAY_GRID);
        let momentum = space("momentum", &MOMENTUM_GRID);
        let epsilon = space("epsilon", &EPSILON_GRID);
        match self {
            StochSolverKind::Sg | StochSolverKind::Ngd | StochSolverKind::Svrg => {
                vec![alpha0, decay]
            }
            StochSolverKind::Sgm | StochSolverKind::Asgd => vec![alpha0, decay, momentum],
            StochSolverKind::Ag | StochSolverKind::Agfr | StochSolverKind::Aggr => {
                vec![alpha0, decay, space("q", &Q_GRID)]
            }
            StochSolverKind::AdaGrad => vec![alpha0, epsilon],
            StochSolverKind::AdaDelta => vec![momentum, epsilon],
            StochSolverKind::RmsProp => vec![alpha0, momentum, epsilon],
            StochSolverKind::Adam | StochSolverKind::AmsGrad => vec![alpha0],
            StochSolverKind::Cocob => Vec::new(),
        }
    }

    /// Instantiate the update rule from values resolved against
    /// [`StochSolverKind::param_specs`].
    fn build_rule(&self, v: &[f64], size: usize) -> Box<dyn StochRule> {
        match self {
            StochSolverKind::Sg => Box::new(Sg::new(v[0], v[1])),
            StochSolverKind::Sgm => Box::new(Sgm::new(v[0], v[1], v[2], size)),
            StochSolverKind::Ngd => Box::new(Ngd::new(v[0], v[1])),
            StochSolverKind::Ag => Box::new(Ag::new(AgRestart::None, v[0], v[1], v[2])),
            StochSolverKind::Agfr => Box::new(Ag::new(AgRestart::Function, v[0], v[1], v[2])),
            StochSolverKind::Aggr => Box::new(Ag::new(AgRestart::Gradient, v[0], v[1], v[2])),
            StochSolverKind::AdaGrad => Box::new(AdaGrad::new(v[0], v[1], size)),
            StochSolverKind::AdaDelta => Box::new(AdaDelta::new(v[0], v[1], size)),
            StochSolverKind::RmsProp => Box::new(RmsProp::new(v[0], v[1], v[2], size)),
            StochSolverKind::Adam => Box::new(Adam::new(v[0], v[1], v[2], v[3], size)),
            StochSolverKind::AmsGrad => Box::new(Adam::amsgrad(v[0], v[1], v[2], v[3], size)),
            StochSolverKind::Asgd => Box::new(Asgd::new(v[0], v[1], v[2], size)),
            StochSolverKind::Svrg => Box::new(Svrg::new(v[0], v[1], size)),
            StochSolverKind::Cocob => Box::new(Cocob::new(v[0], size)),
        }
    }
}

impl fmt::Display for StochSolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StochSolverKind {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        StochSolverKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| OptError::UnknownSolver { name: s.to_string() })
    }
}

/// A configured stochastic solver.
///
/// Hyperparameters set through [`StochSolver::configure`] are held fixed;
/// the remaining ones are tuned by [`StochSolver::minimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct StochSolver {
    kind: StochSolverKind,
    params: StochParams,
    config: SolverConfig,
}

impl StochSolver {
    /// # Errors
    /// Any validation error of [`StochParams::validate`].
    pub fn new(kind: StochSolverKind, params: StochParams) -> OptResult<Self> {
        params.validate()?;
        Ok(Self { kind, params, config: SolverConfig::new() })
    }

    pub fn kind(&self) -> StochSolverKind {
        self.kind
    }

    pub fn params(&self) -> &StochParams {
        &self.params
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Fix hyperparameters; they are excluded from tuning.
    ///
    /// # Errors
    /// [`OptError::UnknownParameter`] / [`OptError::ParameterOutOfRange`].
    pub fn configure(mut self, config: &SolverConfig) -> OptResult<Self> {
        let merged = self.config.merged(config);
        merged.resolve(self.name(), &self.kind.param_specs())?;
        self.config = merged;
        Ok(self)
    }

    /// Run the full epoch budget with `config` (merged over the fixed
    /// hyperparameters; defaults fill the rest). No tuning.
    ///
    /// # Errors
    /// Configuration errors and a bad `x0`.
    pub fn minimize_with(
        &self, config: &SolverConfig, function: &dyn Function, x0: &Vector,
        logger: Option<Logger<'_>>,
    ) -> OptResult<SolverState> {
        self.run(config, self.params.max_epochs, function, x0, logger)
    }

    /// Grid-search the free hyperparameters with `tune_epochs` epochs per
    /// trial.
    ///
    /// # Errors
    /// Configuration errors and a bad `x0`.
    pub fn tune(&self, function: &dyn Function, x0: &Vector) -> OptResult<TuneOutcome> {
        let spaces: Vec<TuneSpace> = self
            .kind
            .tune_spaces()
            .into_iter()
            .filter(|space| !self.config.contains(&space.name))
            .collect();
        tune(&spaces, |trial| self.run(trial, self.params.tune_epochs, function, x0, None))
    }

    /// Tune the free hyperparameters, then run the full epoch budget from
    /// the tuned optimum with the best configuration. Parameter-free
    /// methods (and fully configured solvers) skip tuning.
    ///
    /// The returned counters include the evaluations spent tuning.
    ///
    /// # Errors
    /// Configuration errors and a bad `x0`.
    pub fn minimize(
        &self, function: &dyn Function, x0: &Vector, logger: Option<Logger<'_>>,
    ) -> OptResult<SolverState> {
        let needs_tuning =
            self.kind.tune_spaces().iter().any(|space| !self.config.contains(&space.name));
        if !needs_tuning {
            return self.minimize_with(&SolverConfig::new(), function, x0, logger);
        }
        let tuned = self.tune(function, x0)?;
        let mut state = self.minimize_with(&tuned.config, function, &tuned.state.x, logger)?;
        state.fcalls += tuned.fcalls;
        state.gcalls += tuned.gcalls;
        Ok(state)
    }

    fn run(
        &self, config: &SolverConfig, epochs: usize, function: &dyn Function, x0: &Vector,
        logger: Option<Logger<'_>>,
    ) -> OptResult<SolverState> {
        let values = self.config.merged(config).resolve(self.name(), &self.kind.param_specs())?;
        let mut rule = self.kind.build_rule(&values, x0.len());
        run_stoch(self.name(), function, x0, &self.params, epochs, rule.as_mut(), logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        function::catalog::{Sphere, StochasticLeastSquares},
        state::{FailureReason, Status},
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Name parsing, schemas and tuning grids per method.
    // - Divergent learning rates failing within one epoch.
    // - Tuned runs decreasing the objective for every method.
    // - Fixed hyperparameters being excluded from tuning.
    //
    // They intentionally DO NOT cover:
    // - The update formulas themselves (see `stochastic::rules`).
    // -------------------------------------------------------------------------

    fn params() -> StochParams {
        StochParams::new(20, 20, 1e-6).expect("valid params")
    }

    #[test]
    // Purpose
    // -------
    // Every method parses from its name; schemas and grids line up.
    //
    // Given
    // -----
    // - All fourteen kinds.
    //
    // Expect
    // ------
    // - Name round trip; every tuned name appears in the schema; only COCOB
    //   has no grid.
    fn names_schemas_and_grids_are_consistent() {
        // Act & Assert
        for kind in StochSolverKind::ALL {
            assert_eq!(kind.name().to_uppercase().parse::<StochSolverKind>(), Ok(kind));
            let specs = kind.param_specs();
            for space in kind.tune_spaces() {
                let spec =
                    specs.iter().find(|s| s.name == space.name).expect("tuned name in schema");
                assert!(
                    space.values.iter().all(|&v| spec.check(v).is_ok()),
                    "{kind}: {}",
                    space.name
                );
            }
            assert_eq!(kind.tune_spaces().is_empty(), kind == StochSolverKind::Cocob);
        }
        assert!(matches!(
            "lion".parse::<StochSolverKind>(),
            Err(OptError::UnknownSolver { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // SG with a learning rate far too large fails within one epoch.
    //
    // Given
    // -----
    // - 2-d sphere from `(1, 1)`, `alpha0 = 10`, `decay = 0`.
    //
    // Expect
    // ------
    // - `Failed` after one epoch (the snapshot value does not decrease).
    fn sg_with_huge_learning_rate_fails_in_first_epoch() {
        // Arrange
        let sg = StochSolver::new(StochSolverKind::Sg, params()).expect("valid solver");
        let config = SolverConfig::new().with("alpha0", 10.0).with("decay", 0.0);

        // Act
        let state = sg
            .minimize_with(&config, &Sphere::new(2), &array![1.0, 1.0], None)
            .expect("valid run");

        // Assert
        assert_eq!(state.status, Status::Failed);
        assert_eq!(state.failure, Some(FailureReason::Stagnated));
        assert_eq!(state.iterations, 1);
    }

    #[test]
    // Purpose
    // -------
    // Every method, tuned, ends at a finite value no worse than the start.
    //
    // Given
    // -----
    // - Noise-free least squares (3 coefficients, 128 rows, minibatch 16).
    //
    // Expect
    // ------
    // - Finite `f ≤ f(x0)` for all fourteen methods.
    fn every_method_decreases_least_squares() {
        // Arrange
        let problem = StochasticLeastSquares::synthetic(&array![1.0, -0.5, 2.0], 128, 16, 3)
            .expect("valid problem");
        let x0 = array![0.0, 0.0, 0.0];
        let f0 = problem.eval(&x0);

        for kind in StochSolverKind::ALL {
            let solver = StochSolver::new(kind, params()).expect("valid solver");

            // Act
            let state = solver.minimize(&problem, &x0, None).expect("valid run");

            // Assert
            assert!(state.f.is_finite() && state.f <= f0, "{kind}: {} > {f0}", state.f);
            assert_ne!(state.status, Status::Running, "{kind}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Configured hyperparameters are not tuned; tuning covers the rest.
    //
    // Given
    // -----
    // - SG with `decay = 0.5` fixed.
    //
    // Expect
    // ------
    // - Four trials (the `alpha0` grid), each keeping `decay = 0.5`.
    fn fixed_hyperparameters_are_not_tuned() {
        // Arrange
        let sg = StochSolver::new(StochSolverKind::Sg, params())
            .expect("valid solver")
            .configure(&SolverConfig::new().with("decay", 0.5))
            .expect("valid config");

        // Act
        let outcome = sg.tune(&Sphere::new(2), &array![1.0, 1.0]).expect("valid tuning");

        // Assert
        assert_eq!(outcome.trials, 4);
        assert_eq!(outcome.config.get("decay"), None);
        assert!(outcome.config.get("alpha0").is_some());
        assert_eq!(sg.config().get("decay"), Some(0.5));
    }

    #[test]
    // Purpose
    // -------
    // Unknown and out-of-range hyperparameters are rejected up front.
    //
    // Given
    // -----
    // - `beta1` for SG; `momentum = 1` for SGM.
    //
    // Expect
    // ------
    // - `UnknownParameter`; `ParameterOutOfRange`.
    fn configure_validates() {
        // Arrange
        let sg = StochSolver::new(StochSolverKind::Sg, params()).expect("valid solver");
        let sgm = StochSolver::new(StochSolverKind::Sgm, params()).expect("valid solver");

        // Act & Assert
        assert!(matches!(
            sg.configure(&SolverConfig::new().with("beta1", 0.9)),
            Err(OptError::UnknownParameter { .. })
        ));
        assert!(matches!(
            sgm.configure(&SolverConfig::new().with("momentum", 1.0)),
            Err(OptError::ParameterOutOfRange { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // AG exposes its learning-rate decay as a tunable hyperparameter.
    //
    // Given
    // -----
    // - An AG solver configured with `decay = 0.5`.
    //
    // Expect
    // ------
    // - The configuration is accepted and stored; `decay` is in the tune grid.
    fn ag_accepts_decay() {
        // Arrange
        let ag = StochSolver::new(StochSolverKind::Ag, params()).expect("valid solver");

        // Act
        let ag = ag.configure(&SolverConfig::new().with("decay", 0.5)).expect("valid config");

        // Assert
        assert_eq!(ag.config().get("decay"), Some(0.5));
        assert!(StochSolverKind::Ag.tune_spaces().iter().any(|s| s.name == "decay"));
    }
}
