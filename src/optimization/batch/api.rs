//! Public entry points of the full-batch solvers.
use std::fmt;
use std::str::FromStr;

use crate::optimization::{
    batch::{
        cgd::CgdVariant,
        params::BatchParams,
        run::{
            BatchDirection, CgdDirection, GdDirection, LbfgsDirection, LineSearchSetup, run_batch,
        },
    },
    config::{ParamSpec, SolverConfig},
    errors::{OptError, OptResult},
    function::Function,
    line_search::{LineSearchInit, LineSearchStrategy},
    state::SolverState,
    types::{DEFAULT_LBFGS_MEM, Logger, Vector},
};

/// Sufficient-decrease coefficient used unless overridden.
pub const DEFAULT_C1: f64 = 1e-4;

/// Which batch method to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchSolverKind {
    Gd,
    Cgd(CgdVariant),
    Lbfgs,
}

impl BatchSolverKind {
    /// Every batch method, in registry order.
    pub fn all() -> Vec<BatchSolverKind> {
        let mut kinds = vec![BatchSolverKind::Gd];
        kinds.extend(CgdVariant::ALL.into_iter().map(BatchSolverKind::Cgd));
        kinds.push(BatchSolverKind::Lbfgs);
        kinds
    }

    /// Registry name, e.g. `"gd"`, `"cgd-prp"`, `"lbfgs"`.
    pub fn name(&self) -> String {
        match self {
            BatchSolverKind::Gd => "gd".to_string(),
            BatchSolverKind::Cgd(variant) => format!("cgd-{variant}"),
            BatchSolverKind::Lbfgs => "lbfgs".to_string(),
        }
    }

    /// Line search used when [`BatchParams`] does not override it.
    ///
    /// - GD: quadratic initializer, backtracking to the Wolfe conditions.
    /// - CGD: quadratic initializer, interpolation; DY-type variants
    ///   backtrack to the Wolfe conditions instead.
    /// - L-BFGS: unit initializer, interpolation.
    ///
    /// `c1 = 1e-4`; `c2 = 0.1` for CGD and `0.9` otherwise.
    pub fn default_line_search(&self) -> LineSearchSetup {
        let (init, strategy, c2) = match self {
            BatchSolverKind::Gd => {
                (LineSearchInit::Quadratic, LineSearchStrategy::BacktrackWolfe, 0.9)
            }
            BatchSolverKind::Cgd(CgdVariant::Dy | CgdVariant::Dycd | CgdVariant::Dyhs) => {
                (LineSearchInit::Quadratic, LineSearchStrategy::BacktrackWolfe, 0.1)
            }
            BatchSolverKind::Cgd(_) => {
                (LineSearchInit::Quadratic, LineSearchStrategy::Interpolation, 0.1)
            }
            BatchSolverKind::Lbfgs => {
                (LineSearchInit::Unit, LineSearchStrategy::Interpolation, 0.9)
            }
        };
        LineSearchSetup { init, strategy, c1: DEFAULT_C1, c2 }
    }

    /// Hyperparameter schema accepted by [`BatchSolver::configure`].
    pub fn param_specs(&self) -> Vec<ParamSpec> {
        let setup = self.default_line_search();
        let mut specs = vec![
            ParamSpec::new("c1", setup.c1, 1e-6, 0.5),
            ParamSpec::new("c2", setup.c2, 1e-4, 0.99),
        ];
        if *self == BatchSolverKind::Lbfgs {
            specs.push(ParamSpec::new("history", DEFAULT_LBFGS_MEM as f64, 1.0, 1000.0));
        }
        specs
    }

    fn direction(&self, params: &BatchParams) -> Box<dyn BatchDirection> {
        match self {
            BatchSolverKind::Gd => Box::new(GdDirection),
            BatchSolverKind::Cgd(variant) => Box::new(CgdDirection { variant: *variant }),
            BatchSolverKind::Lbfgs => Box::new(LbfgsDirection::new(params.history_size)),
        }
    }
}

impl fmt::Display for BatchSolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BatchSolverKind {
    type Err = OptError;

    /// Parse a registry name; `"cgd"` alone selects the Hager–Zhang variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "gd" => Ok(BatchSolverKind::Gd),
            "lbfgs" => Ok(BatchSolverKind::Lbfgs),
            "cgd" => Ok(BatchSolverKind::Cgd(CgdVariant::N)),
            other => match other.strip_prefix("cgd-") {
                Some(tag) => tag.parse().map(BatchSolverKind::Cgd),
                None => Err(OptError::UnknownSolver { name: s.to_string() }),
            },
        }
    }
}

/// A configured batch solver.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSolver {
    kind: BatchSolverKind,
    params: BatchParams,
}

impl BatchSolver {
    /// # Errors
    /// Any validation error of [`BatchParams::validate`].
    pub fn new(kind: BatchSolverKind, params: BatchParams) -> OptResult<Self> {
        params.validate()?;
        Ok(Self { kind, params })
    }

    pub fn kind(&self) -> BatchSolverKind {
        self.kind
    }

    pub fn params(&self) -> &BatchParams {
        &self.params
    }

    pub fn name(&self) -> String {
        self.kind.name()
    }

    /// Apply `c1`, `c2` and (L-BFGS) `history` from a flat config.
    ///
    /// # Errors
    /// - [`OptError::UnknownParameter`] / [`OptError::ParameterOutOfRange`].
    /// - [`OptError::InvalidLineSearchCoefficients`] unless `c1 < c2`.
    pub fn configure(mut self, config: &SolverConfig) -> OptResult<Self> {
        let values = config.resolve(&self.name(), &self.kind.param_specs())?;
        self.params = self.params.with_coefficients(values[0], values[1])?;
        if let Some(history) = values.get(2) {
            self.params = self.params.with_history_size(history.round() as usize)?;
        }
        Ok(self)
    }

    /// Solver defaults overridden by whatever [`BatchParams`] specifies.
    pub fn line_search_setup(&self) -> LineSearchSetup {
        let default = self.kind.default_line_search();
        LineSearchSetup {
            init: self.params.ls_init.unwrap_or(default.init),
            strategy: self.params.ls_strategy.unwrap_or(default.strategy),
            c1: self.params.c1.unwrap_or(default.c1),
            c2: self.params.c2.unwrap_or(default.c2),
        }
    }

    /// Minimize `function` from `x0`.
    ///
    /// `logger` is called after every iteration; returning `false` stops the
    /// run with `Status::Stopped`.
    ///
    /// # Errors
    /// Configuration and input errors only (see [`run_batch`]); numerical
    /// trouble is reported through the returned state's status.
    pub fn minimize(
        &self, function: &dyn Function, x0: &Vector, logger: Option<Logger<'_>>,
    ) -> OptResult<SolverState> {
        let setup = self.line_search_setup();
        let mut direction = self.kind.direction(&self.params);
        run_batch(&self.name(), function, x0, &self.params, &setup, direction.as_mut(), logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        function::catalog::{Ellipsoid, Rosenbrock, Sphere},
        line_search::LineSearchError,
        state::{FailureReason, Status},
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Name parsing and default line-search selection.
    // - Convergence of GD, every CGD variant and L-BFGS on convex quadratics.
    // - Monotone decrease, early stopping via the logger, the iteration
    //   budget, and entry-point validation.
    //
    // They intentionally DO NOT cover:
    // - The individual line searches (see `line_search`).
    // -------------------------------------------------------------------------

    fn solver(kind: BatchSolverKind) -> BatchSolver {
        BatchSolver::new(kind, BatchParams::new(1000, 1e-8).expect("valid params"))
            .expect("valid solver")
    }

    #[test]
    // Purpose
    // -------
    // Registry names parse back to their kinds.
    //
    // Given
    // -----
    // - Every kind's name, plus `"cgd"`, `"CGD-PRP"` and `"newton"`.
    //
    // Expect
    // ------
    // - Round trip for all kinds; `"cgd"` is Hager–Zhang; `"newton"` fails.
    fn names_round_trip() {
        // Act & Assert
        for kind in BatchSolverKind::all() {
            assert_eq!(kind.name().parse::<BatchSolverKind>(), Ok(kind));
        }
        assert_eq!("cgd".parse(), Ok(BatchSolverKind::Cgd(CgdVariant::N)));
        assert_eq!("CGD-PRP".parse(), Ok(BatchSolverKind::Cgd(CgdVariant::Prp)));
        assert!(matches!(
            "newton".parse::<BatchSolverKind>(),
            Err(OptError::UnknownSolver { .. })
        ));
        assert_eq!(BatchSolverKind::all().len(), 11);
    }

    #[test]
    // Purpose
    // -------
    // Defaults follow the per-method table and can be overridden.
    //
    // Given
    // -----
    // - CGD-DY, CGD-PRP and L-BFGS with default params; GD with a CG_DESCENT
    //   override.
    //
    // Expect
    // ------
    // - Backtracking for DY, interpolation for PRP and L-BFGS, the override
    //   for GD.
    fn default_line_searches_per_method() {
        // Arrange
        let gd = BatchSolver::new(
            BatchSolverKind::Gd,
            BatchParams::default()
                .with_line_search(LineSearchInit::Consistent, LineSearchStrategy::CgDescent),
        )
        .expect("valid solver");

        // Act & Assert
        let dy = BatchSolverKind::Cgd(CgdVariant::Dy).default_line_search();
        assert_eq!(dy.strategy, LineSearchStrategy::BacktrackWolfe);
        assert_relative_eq!(dy.c2, 0.1);
        let prp = BatchSolverKind::Cgd(CgdVariant::Prp).default_line_search();
        assert_eq!(prp.strategy, LineSearchStrategy::Interpolation);
        let lbfgs = BatchSolverKind::Lbfgs.default_line_search();
        assert_eq!(lbfgs.init, LineSearchInit::Unit);
        assert_eq!(lbfgs.strategy, LineSearchStrategy::Interpolation);
        assert_relative_eq!(lbfgs.c2, 0.9);
        assert_eq!(gd.line_search_setup().strategy, LineSearchStrategy::CgDescent);
    }

    #[test]
    // Purpose
    // -------
    // Gradient descent with backtracking-Wolfe solves the 2-d sphere.
    //
    // Given
    // -----
    // - `f = x1² + x2²`, `x0 = (3, 3)`, `epsilon = 1e-8`.
    //
    // Expect
    // ------
    // - `Converged` within a few hundred iterations at `x ≈ 0`, `f ≈ 0`.
    fn gd_converges_on_sphere() {
        // Arrange
        let sphere = Sphere::new(2);

        // Act
        let state = solver(BatchSolverKind::Gd)
            .minimize(&sphere, &array![3.0, 3.0], None)
            .expect("valid run");

        // Assert
        assert_eq!(state.status, Status::Converged);
        assert!(state.iterations < 300);
        assert!(state.f < 1e-12);
        assert_relative_eq!(state.x[0], 0.0, epsilon = 1e-6);
        assert!(state.fcalls > 0 && state.gcalls > 0);
    }

    #[test]
    // Purpose
    // -------
    // L-BFGS with a longer history converges in very few iterations.
    //
    // Given
    // -----
    // - The 2-d sphere from `(3, 3)`, `history_size = 10`.
    //
    // Expect
    // ------
    // - `Converged` in under 20 iterations.
    fn lbfgs_converges_fast_on_sphere() {
        // Arrange
        let sphere = Sphere::new(2);
        let params = BatchParams::new(100, 1e-8)
            .expect("valid params")
            .with_history_size(10)
            .expect("valid history");
        let lbfgs = BatchSolver::new(BatchSolverKind::Lbfgs, params).expect("valid solver");

        // Act
        let state = lbfgs.minimize(&sphere, &array![3.0, 3.0], None).expect("valid run");

        // Assert
        assert_eq!(state.status, Status::Converged);
        assert!(state.iterations < 20);
        assert!(state.converged(1e-8));
    }

    #[test]
    // Purpose
    // -------
    // Every CGD variant reaches the minimum of an ill-conditioned quadratic.
    //
    // Given
    // -----
    // - The 4-d ellipsoid `Σ (i+1)·x_i²` from `(1, 1, 1, 1)`.
    //
    // Expect
    // ------
    // - `Converged` for all nine variants.
    fn every_cgd_variant_converges_on_ellipsoid() {
        // Arrange
        let ellipsoid = Ellipsoid::new(4);
        let x0 = array![1.0, 1.0, 1.0, 1.0];

        for variant in CgdVariant::ALL {
            // Act
            let state = solver(BatchSolverKind::Cgd(variant))
                .minimize(&ellipsoid, &x0, None)
                .expect("valid run");

            // Assert
            assert_eq!(state.status, Status::Converged, "cgd-{variant}: {state:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Accepted iterates never increase `f` on a convex function.
    //
    // Given
    // -----
    // - Every batch method on the ellipsoid, recording `f` in the logger.
    //
    // Expect
    // ------
    // - The recorded sequence is non-increasing, starting below `f(x0)`.
    fn batch_iterates_decrease_monotonically() {
        // Arrange
        let ellipsoid = Ellipsoid::new(3);
        let x0 = array![2.0, -1.0, 0.5];
        let f0 = ellipsoid.eval(&x0);

        for kind in BatchSolverKind::all() {
            let mut values = vec![f0];
            let mut record = |s: &SolverState| {
                values.push(s.f);
                true
            };

            // Act
            solver(kind).minimize(&ellipsoid, &x0, Some(&mut record)).expect("valid run");

            // Assert
            assert!(values.windows(2).all(|w| w[1] <= w[0]), "{kind}: {values:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // L-BFGS solves the 2-d Rosenbrock valley.
    //
    // Given
    // -----
    // - `x0 = (-1.2, 1)`, 500 iterations, `epsilon = 1e-6`.
    //
    // Expect
    // ------
    // - `Converged` near `(1, 1)`.
    fn lbfgs_solves_rosenbrock() {
        // Arrange
        let rosenbrock = Rosenbrock::new(2);
        let lbfgs = BatchSolver::new(
            BatchSolverKind::Lbfgs,
            BatchParams::new(500, 1e-6).expect("valid params"),
        )
        .expect("valid solver");

        // Act
        let state = lbfgs.minimize(&rosenbrock, &array![-1.2, 1.0], None).expect("valid run");

        // Assert
        assert_eq!(state.status, Status::Converged);
        assert_relative_eq!(state.x[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(state.x[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // The logger can stop a run and the budget caps it.
    //
    // Given
    // -----
    // - GD on the ellipsoid with a logger returning `false`; then a budget of
    //   one iteration.
    //
    // Expect
    // ------
    // - `Stopped` after one iteration; `MaxIterations` after one iteration.
    fn logger_stops_and_budget_caps() {
        // Arrange
        let ellipsoid = Ellipsoid::new(3);
        let x0 = array![2.0, -1.0, 0.5];
        let budget = BatchParams::new(1, 1e-12).expect("valid params");
        let short = BatchSolver::new(BatchSolverKind::Gd, budget).expect("valid solver");

        // Act
        let stopped = solver(BatchSolverKind::Gd)
            .minimize(&ellipsoid, &x0, Some(&mut |_: &SolverState| false))
            .expect("valid run");
        let capped = short.minimize(&ellipsoid, &x0, None).expect("valid run");

        // Assert
        assert_eq!((stopped.status, stopped.iterations), (Status::Stopped, 1));
        assert_eq!((capped.status, capped.iterations), (Status::MaxIterations, 1));
    }

    #[test]
    // Purpose
    // -------
    // Entry-point validation and line-search failure reporting.
    //
    // Given
    // -----
    // - A 3-vector for the 2-d sphere; a linear function with no minimum.
    //
    // Expect
    // ------
    // - `DimensionMismatch`; the unbounded run fails with a line-search
    //   reason rather than an error.
    fn validation_and_line_search_failure() {
        // Arrange
        struct Linear;
        impl Function for Linear {
            fn size(&self) -> usize {
                1
            }
            fn eval(&self, x: &Vector) -> f64 {
                -x[0]
            }
            fn eval_grad(&self, x: &Vector, g: &mut Vector) -> f64 {
                g[0] = -1.0;
                -x[0]
            }
        }
        let sphere = Sphere::new(2);

        // Act
        let mismatch =
            solver(BatchSolverKind::Gd).minimize(&sphere, &array![1.0, 2.0, 3.0], None);
        let unbounded = solver(BatchSolverKind::Gd)
            .minimize(&Linear, &array![0.0], None)
            .expect("valid run");

        // Assert
        assert_eq!(mismatch, Err(OptError::DimensionMismatch { expected: 2, found: 3 }));
        assert_eq!(unbounded.status, Status::Failed);
        assert_eq!(
            unbounded.failure,
            Some(FailureReason::LineSearch(LineSearchError::Exhausted))
        );
    }

    #[test]
    // Purpose
    // -------
    // Flat configs set the line-search coefficients and L-BFGS memory.
    //
    // Given
    // -----
    // - `{c1: 1e-3, c2: 0.5, history: 12}` for L-BFGS; `{history: 3}` for GD.
    //
    // Expect
    // ------
    // - Applied values for L-BFGS; `UnknownParameter` for GD.
    fn configure_applies_flat_config() {
        // Arrange
        let config = SolverConfig::new().with("c1", 1e-3).with("c2", 0.5).with("history", 12.0);

        // Act
        let lbfgs = solver(BatchSolverKind::Lbfgs).configure(&config).expect("valid config");
        let gd = solver(BatchSolverKind::Gd).configure(&SolverConfig::new().with("history", 3.0));

        // Assert
        assert_eq!(lbfgs.params().history_size, 12);
        assert_eq!(lbfgs.line_search_setup().c2, 0.5);
        assert!(matches!(gd, Err(OptError::UnknownParameter { .. })));
    }
}
