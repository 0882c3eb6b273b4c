use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

/// Configuration and entry-point errors.
///
/// In-loop numerical trouble (line-search failure, divergence, stagnation)
/// is reported through [`crate::optimization::state::Status`] instead; an
/// `OptError` means a run was never attempted.
#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- Solver parameters ----
    /// Convergence tolerance needs to be positive and finite.
    InvalidEpsilon {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations (or epochs) needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// Epoch size needs to be positive.
    InvalidEpochSize {
        size: usize,
        reason: &'static str,
    },
    /// Line-search coefficients must satisfy `0 < c1 < c2 < 1`.
    InvalidLineSearchCoefficients {
        c1: f64,
        c2: f64,
        reason: &'static str,
    },
    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },
    /// Invalid step-length initializer name.
    InvalidLineSearchInit {
        name: String,
        reason: &'static str,
    },
    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Solver selection & hyperparameters ----
    /// No solver registered under this name.
    UnknownSolver {
        name: String,
    },
    /// The solver does not recognize this hyperparameter.
    UnknownParameter {
        solver: String,
        name: String,
    },
    /// A hyperparameter value lies outside its admissible range.
    ParameterOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
    /// A tuning space has no name or no candidate values.
    InvalidTuneSpace {
        name: String,
        reason: &'static str,
    },
    /// Structured configuration text could not be parsed.
    ConfigParse {
        text: String,
    },

    // ---- Inputs ----
    /// Starting point dimension differs from the function dimension.
    DimensionMismatch {
        expected: usize,
        found: usize,
    },
    /// Starting point elements need to be finite.
    InvalidInitialPoint {
        index: usize,
        value: f64,
    },
    /// Function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- Solver parameters ----
            OptError::InvalidEpsilon { tol, reason } => {
                write!(f, "Invalid convergence tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidEpochSize { size, reason } => {
                write!(f, "Invalid epoch size {size}: {reason}")
            }
            OptError::InvalidLineSearchCoefficients { c1, c2, reason } => {
                write!(f, "Invalid line-search coefficients (c1 = {c1}, c2 = {c2}): {reason}")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLineSearchInit { name, reason } => {
                write!(f, "Invalid step-length initializer '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Solver selection & hyperparameters ----
            OptError::UnknownSolver { name } => {
                write!(f, "Unknown solver '{name}'")
            }
            OptError::UnknownParameter { solver, name } => {
                write!(f, "Solver '{solver}' has no parameter named '{name}'")
            }
            OptError::ParameterOutOfRange { name, value, min, max } => {
                write!(f, "Parameter '{name}' = {value} is outside [{min}, {max}]")
            }
            OptError::InvalidTuneSpace { name, reason } => {
                write!(f, "Invalid tuning space '{name}': {reason}")
            }
            OptError::ConfigParse { text } => {
                write!(f, "Failed to parse solver configuration: {text}")
            }

            // ---- Inputs ----
            OptError::DimensionMismatch { expected, found } => {
                write!(f, "Starting point dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidInitialPoint { index, value } => {
                write!(f, "Invalid starting point at index {index}: {value}, must be finite")
            }
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast::<ArgminError>() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                _ => OptError::UnknownError,
            },
            Err(err) => match err.downcast::<OptError>() {
                Ok(opt_err) => opt_err,
                Err(err) => OptError::BackendError { text: err.to_string() },
            },
        }
    }
}

impl From<serde_json::Error> for OptError {
    fn from(err: serde_json::Error) -> Self {
        OptError::ConfigParse { text: err.to_string() }
    }
}
