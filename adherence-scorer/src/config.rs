//! Configuration records for every strategy.
//!
//! A configuration file holds one JSON object whose `algorithm_type` field
//! selects the strategy; the remaining fields are that strategy's
//! parameters.
//!
//! ```
//! use adherence_scorer::{AlgorithmConfig, AlgorithmType};
//!
//! let config: AlgorithmConfig = serde_json::from_str(
//!     r#"{"algorithm_type": "binary_threshold", "threshold": 10000, "operator": ">="}"#,
//! )
//! .unwrap();
//! assert_eq!(config.algorithm_type(), AlgorithmType::BinaryThreshold);
//! ```

use std::fmt;
use std::str::FromStr;

use adherence_core::{ConfigurationError, numeric};
use serde::{Deserialize, Serialize};

use crate::{
    BinaryThresholdConfig, CategoricalFilterConfig, CompositeWeightedConfig,
    ConstrainedWeeklyAllowanceConfig, MinimumFrequencyConfig, ProportionalConfig,
    ProportionalFrequencyHybridConfig, WeeklyEliminationConfig, ZoneBasedConfig,
};

/// Parameters for one strategy, tagged by `algorithm_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm_type", rename_all = "snake_case")]
pub enum AlgorithmConfig {
    /// Pass/fail against a single threshold.
    BinaryThreshold(BinaryThresholdConfig),
    /// Percentage of a target, optionally cumulative over the week.
    Proportional(ProportionalConfig),
    /// Best-N-of-M proportional scoring.
    ProportionalFrequencyHybrid(ProportionalFrequencyHybridConfig),
    /// At least N passing days out of the window.
    MinimumFrequency(MinimumFrequencyConfig),
    /// Zero tolerance for violations.
    WeeklyElimination(WeeklyEliminationConfig),
    /// Banded "sweet spot" scoring.
    ZoneBased(ZoneBasedConfig),
    /// Weighted combination of sub-scores.
    CompositeWeighted(CompositeWeightedConfig),
    /// Weekly usage budget with optional rollover.
    ConstrainedWeeklyAllowance(ConstrainedWeeklyAllowanceConfig),
    /// Per-category thresholds.
    CategoricalFilterThreshold(CategoricalFilterConfig),
}

impl AlgorithmConfig {
    /// Strategy this record configures.
    #[must_use]
    pub const fn algorithm_type(&self) -> AlgorithmType {
        match self {
            Self::BinaryThreshold(_) => AlgorithmType::BinaryThreshold,
            Self::Proportional(_) => AlgorithmType::Proportional,
            Self::ProportionalFrequencyHybrid(_) => AlgorithmType::ProportionalFrequencyHybrid,
            Self::MinimumFrequency(_) => AlgorithmType::MinimumFrequency,
            Self::WeeklyElimination(_) => AlgorithmType::WeeklyElimination,
            Self::ZoneBased(_) => AlgorithmType::ZoneBased,
            Self::CompositeWeighted(_) => AlgorithmType::CompositeWeighted,
            Self::ConstrainedWeeklyAllowance(_) => AlgorithmType::ConstrainedWeeklyAllowance,
            Self::CategoricalFilterThreshold(_) => AlgorithmType::CategoricalFilterThreshold,
        }
    }
}

/// Names of the available strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmType {
    /// See [`crate::BinaryThreshold`].
    BinaryThreshold,
    /// See [`crate::Proportional`].
    Proportional,
    /// See [`crate::ProportionalFrequencyHybrid`].
    ProportionalFrequencyHybrid,
    /// See [`crate::MinimumFrequency`].
    MinimumFrequency,
    /// See [`crate::WeeklyElimination`].
    WeeklyElimination,
    /// See [`crate::ZoneBased`].
    ZoneBased,
    /// See [`crate::CompositeWeighted`].
    CompositeWeighted,
    /// See [`crate::ConstrainedWeeklyAllowance`].
    ConstrainedWeeklyAllowance,
    /// See [`crate::CategoricalFilterThreshold`].
    CategoricalFilterThreshold,
}

impl AlgorithmType {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::BinaryThreshold,
        Self::Proportional,
        Self::ProportionalFrequencyHybrid,
        Self::MinimumFrequency,
        Self::WeeklyElimination,
        Self::ZoneBased,
        Self::CompositeWeighted,
        Self::ConstrainedWeeklyAllowance,
        Self::CategoricalFilterThreshold,
    ];

    /// Return the configuration tag as a `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BinaryThreshold => "binary_threshold",
            Self::Proportional => "proportional",
            Self::ProportionalFrequencyHybrid => "proportional_frequency_hybrid",
            Self::MinimumFrequency => "minimum_frequency",
            Self::WeeklyElimination => "weekly_elimination",
            Self::ZoneBased => "zone_based",
            Self::CompositeWeighted => "composite_weighted",
            Self::ConstrainedWeeklyAllowance => "constrained_weekly_allowance",
            Self::CategoricalFilterThreshold => "categorical_filter_threshold",
        }
    }
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown algorithm type '{s}'"))
    }
}

pub(crate) const fn full_score() -> f64 {
    numeric::FULL_SCORE
}

pub(crate) const fn enabled() -> bool {
    true
}

/// Reject NaN and infinite parameters.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonFinite { field, value })
    }
}

/// Reject parameters that are not strictly positive and finite.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::NonPositive { field, value })
    }
}

/// Reject negative or non-finite parameters; zero is allowed.
pub(crate) fn require_non_negative(
    field: &'static str,
    value: f64,
) -> Result<f64, ConfigurationError> {
    if require_finite(field, value)? < 0.0 {
        return Err(ConfigurationError::Negative { field, value });
    }
    Ok(value)
}
