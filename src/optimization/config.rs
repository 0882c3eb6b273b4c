//! config — flat hyperparameter maps and their per-solver schemas.
//!
//! Purpose
//! -------
//! Describe each solver's tunable hyperparameters with a [`ParamSpec`]
//! (name, default, closed admissible range) and carry user choices in a
//! [`SolverConfig`], a flat `name → f64` map that serializes to JSON.
//!
//! Key behaviors
//! -------------
//! - `SolverConfig::resolve` turns a config into a full value vector in
//!   schema order, filling defaults and rejecting unknown names and
//!   out-of-range values.
//! - `ParamSpec` renders as `name -> default[min, max]` for listings.
//!
//! Invariants & assumptions
//! ------------------------
//! - Ranges are closed: `min ≤ value ≤ max`. Half-open mathematical ranges
//!   such as momentum `[0, 1)` are encoded with a `max` just below the bound.
//! - Validation happens once, when a solver is configured; nothing here is
//!   consulted inside an optimization loop.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::optimization::errors::{OptError, OptResult};

/// Schema entry for one hyperparameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

impl ParamSpec {
    pub const fn new(name: &'static str, default: f64, min: f64, max: f64) -> Self {
        Self { name, default, min, max }
    }

    /// # Errors
    /// [`OptError::ParameterOutOfRange`] if `value` is non-finite or outside
    /// `[min, max]`.
    pub fn check(&self, value: f64) -> OptResult<()> {
        if value.is_finite() && self.min <= value && value <= self.max {
            Ok(())
        } else {
            Err(OptError::ParameterOutOfRange {
                name: self.name.to_string(),
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}[{}, {}]", self.name, self.default, self.min, self.max)
    }
}

/// Flat `name → value` hyperparameter map.
///
/// Serializes as a plain JSON object, e.g. `{"alpha0": 0.1, "decay": 0.5}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolverConfig {
    values: BTreeMap<String, f64>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`SolverConfig::set`].
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Overlay `other` on top of `self` (entries of `other` win).
    pub fn merged(&self, other: &SolverConfig) -> SolverConfig {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (k.clone(), *v)));
        SolverConfig { values }
    }

    /// Validate against `specs` and return values in schema order.
    ///
    /// # Errors
    /// - [`OptError::UnknownParameter`] for a name not in `specs`.
    /// - [`OptError::ParameterOutOfRange`] for a value outside its range.
    pub fn resolve(&self, solver: &str, specs: &[ParamSpec]) -> OptResult<Vec<f64>> {
        if let Some(name) = self.values.keys().find(|k| !specs.iter().any(|s| s.name == *k)) {
            return Err(OptError::UnknownParameter {
                solver: solver.to_string(),
                name: name.clone(),
            });
        }
        specs
            .iter()
            .map(|spec| {
                let value = self.get(spec.name).unwrap_or(spec.default);
                spec.check(value)?;
                Ok(value)
            })
            .collect()
    }

    /// # Errors
    /// [`OptError::ConfigParse`] if serialization fails.
    pub fn to_json(&self) -> OptResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    /// [`OptError::ConfigParse`] for malformed JSON or non-numeric values.
    pub fn from_json(text: &str) -> OptResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl FromIterator<(String, f64)> for SolverConfig {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}
