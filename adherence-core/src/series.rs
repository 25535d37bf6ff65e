//! Daily measurement series and observation shapes.
//!
//! A series is owned and appended to by the caller; strategies only read it.
//! Scalar strategies consume `MeasurementSeries<f64>`, while composite and
//! categorical goals consume richer per-day observations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, EvaluationError};

/// Window length used by every documented goal.
pub const DEFAULT_WINDOW_DAYS: usize = 7;

/// Serde default for `window_days` fields.
#[must_use]
pub const fn default_window_days() -> usize {
    DEFAULT_WINDOW_DAYS
}

/// Reject a zero-day evaluation window.
///
/// # Errors
/// Returns [`ConfigurationError::EmptyWindow`] when `window_days` is zero.
pub const fn validate_window(window_days: usize) -> Result<usize, ConfigurationError> {
    if window_days == 0 {
        Err(ConfigurationError::EmptyWindow)
    } else {
        Ok(window_days)
    }
}

/// Ordered daily observations for one evaluation window.
///
/// # Examples
/// ```
/// use adherence_core::MeasurementSeries;
///
/// let mut series = MeasurementSeries::new(vec![4_000.0, 6_500.0]);
/// series.push(8_000.0);
/// assert_eq!(series.len(), 3);
/// assert!(series.require_window(7).is_err());
/// assert!(series.require_within_window(7).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementSeries<T = f64> {
    values: Vec<T>,
}

impl<T> MeasurementSeries<T> {
    /// Wrap a vector of daily observations.
    #[must_use]
    pub const fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Append the next day's observation.
    pub fn push(&mut self, value: T) {
        self.values.push(value);
    }

    /// Borrow the observations in day order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of days recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Report whether no days are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the observations in day order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// Require exactly `window` days, as period scores do.
    ///
    /// # Errors
    /// Returns [`EvaluationError::WindowMismatch`] on any other length.
    pub fn require_window(&self, window: usize) -> Result<(), EvaluationError> {
        if self.values.len() == window {
            Ok(())
        } else {
            Err(EvaluationError::WindowMismatch {
                expected: window,
                actual: self.values.len(),
            })
        }
    }

    /// Require at most `window` days, as progressive scores do mid-period.
    ///
    /// # Errors
    /// Returns [`EvaluationError::SeriesTooLong`] when the series runs past
    /// the window.
    pub fn require_within_window(&self, window: usize) -> Result<(), EvaluationError> {
        if self.values.len() <= window {
            Ok(())
        } else {
            Err(EvaluationError::SeriesTooLong {
                window,
                actual: self.values.len(),
            })
        }
    }

    /// Transform every observation, stopping at the first failure.
    ///
    /// # Errors
    /// Propagates the first error returned by `f`.
    pub fn try_map<U, E, F>(&self, f: F) -> Result<MeasurementSeries<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        self.values
            .iter()
            .map(f)
            .collect::<Result<Vec<_>, _>>()
            .map(MeasurementSeries::new)
    }
}

impl MeasurementSeries<f64> {
    /// Build a series from yes/no days, mapping `true` to `1.0`.
    #[must_use]
    pub fn from_flags(flags: &[bool]) -> Self {
        flags.iter().map(|&flag| f64::from(u8::from(flag))).collect()
    }

    /// Borrow the values after checking each one is finite.
    ///
    /// # Errors
    /// Returns [`EvaluationError::NonFiniteValue`] naming the first bad day.
    pub fn finite_values(&self) -> Result<&[f64], EvaluationError> {
        self.values
            .iter()
            .position(|value| !value.is_finite())
            .map_or(Ok(&self.values), |day| {
                Err(EvaluationError::NonFiniteValue { day })
            })
    }
}

/// Check a single reading is finite, naming its zero-based `day`.
///
/// # Errors
/// Returns [`EvaluationError::NonFiniteValue`] for NaN or infinite values.
pub fn finite_reading(value: f64, day: usize) -> Result<f64, EvaluationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::NonFiniteValue { day })
    }
}

impl<T> From<Vec<T>> for MeasurementSeries<T> {
    fn from(values: Vec<T>) -> Self {
        Self::new(values)
    }
}

impl<T> FromIterator<T> for MeasurementSeries<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a MeasurementSeries<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Per-component values for one composite day, keyed by field name.
pub type ComponentValues = BTreeMap<String, f64>;

/// One labelled measurement for a categorical goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryObservation {
    /// Category label, e.g. `"leafy_greens"`.
    pub category: String,
    /// Measured amount for the category.
    pub value: f64,
}

impl CategoryObservation {
    /// Build an observation from a label and value.
    #[must_use]
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self {
            category: category.into(),
            value,
        }
    }
}

/// A day's observation whose shape depends on the goal being scored.
///
/// Deserialises untagged from JSON: booleans, numbers, objects of
/// field → number, or arrays of category observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Observation {
    /// A yes/no day.
    Flag(bool),
    /// A single numeric measurement.
    Value(f64),
    /// Named measurements for a composite goal.
    Components(ComponentValues),
    /// Labelled measurements for a categorical goal.
    Categories(Vec<CategoryObservation>),
}

impl Observation {
    /// Return the numeric reading for flag and value observations.
    #[must_use]
    pub fn as_value(&self) -> Option<f64> {
        match self {
            Self::Flag(flag) => Some(f64::from(u8::from(*flag))),
            Self::Value(value) => Some(*value),
            Self::Components(_) | Self::Categories(_) => None,
        }
    }

    /// Describe the observation's shape for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Flag(_) => "boolean",
            Self::Value(_) => "numeric",
            Self::Components(_) => "component map",
            Self::Categories(_) => "category list",
        }
    }
}

impl From<f64> for Observation {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Observation {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<ComponentValues> for Observation {
    fn from(values: ComponentValues) -> Self {
        Self::Components(values)
    }
}

impl From<Vec<CategoryObservation>> for Observation {
    fn from(observations: Vec<CategoryObservation>) -> Self {
        Self::Categories(observations)
    }
}
