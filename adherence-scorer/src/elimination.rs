//! Zero-tolerance goals.
//!
//! A single violation fails the whole period. The per-day variant checks
//! each day's value; the weekly and monthly variants check the running sum
//! against the limit.

use adherence_core::{
    AdherenceScorer, CalculationMethod, ComparisonOperator, ConfigurationError, EvaluationError,
    EvaluationPeriod, MeasurementSeries, finite_reading, numeric, validate_window,
};
use serde::{Deserialize, Serialize};

use crate::config::{require_finite, require_non_negative};

/// Parameters for [`WeeklyElimination`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyEliminationConfig {
    /// Limit compared against each day, or against the running sum.
    pub elimination_threshold: f64,
    /// Comparison that must hold for the period to stay clean.
    pub elimination_comparison: String,
    /// `daily` checks each day; `weekly` and `monthly` check running sums.
    #[serde(default)]
    pub period: EvaluationPeriod,
    /// Score from the first violation onwards.
    #[serde(default)]
    pub failure_value: f64,
    /// Days per window; defaults to 7, or 30 for monthly limits.
    #[serde(default)]
    pub window_days: Option<usize>,
}

/// Weekly elimination strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyElimination {
    config: WeeklyEliminationConfig,
    operator: ComparisonOperator,
    window_days: usize,
}

impl WeeklyElimination {
    /// Validate `config` and build the strategy.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownOperator`] for an unparseable
    /// comparison and [`ConfigurationError::EmptyWindow`] for a zero-day
    /// window.
    pub fn new(config: WeeklyEliminationConfig) -> Result<Self, ConfigurationError> {
        let window_days = validate_window(
            config
                .window_days
                .unwrap_or_else(|| config.period.default_window_days()),
        )?;
        require_finite("elimination_threshold", config.elimination_threshold)?;
        require_non_negative("failure_value", config.failure_value)?;
        let operator: ComparisonOperator = config.elimination_comparison.parse()?;
        log::debug!(
            "built elimination goal: {} value {operator} {} over {window_days} days",
            config.period,
            config.elimination_threshold
        );
        Ok(Self {
            config,
            operator,
            window_days,
        })
    }

    /// Configuration the strategy was built from.
    #[must_use]
    pub const fn config(&self) -> &WeeklyEliminationConfig {
        &self.config
    }

    /// Report whether a value, or running sum, keeps the period clean.
    #[must_use]
    pub fn complies(&self, value: f64) -> bool {
        self.operator.compare(value, self.config.elimination_threshold)
    }

    /// Score a single value against the limit.
    #[must_use]
    pub fn score_value(&self, value: f64) -> f64 {
        if self.complies(value) {
            numeric::FULL_SCORE
        } else {
            self.config.failure_value
        }
    }

    fn clean_run(&self, values: &[f64]) -> Vec<f64> {
        let checked = if self.config.period.is_cumulative() {
            CalculationMethod::Sum.running(values)
        } else {
            values.to_vec()
        };
        let mut clean = true;
        checked
            .into_iter()
            .enumerate()
            .map(|(day, value)| {
                if clean && !self.complies(value) {
                    log::debug!("elimination goal violated on day {day} ({value})");
                    clean = false;
                }
                if clean {
                    numeric::FULL_SCORE
                } else {
                    self.config.failure_value
                }
            })
            .collect()
    }
}

impl AdherenceScorer for WeeklyElimination {
    type Observation = f64;

    fn score(&self, value: &f64) -> Result<f64, EvaluationError> {
        finite_reading(*value, 0).map(|v| self.score_value(v))
    }

    fn weekly_score(&self, series: &MeasurementSeries) -> Result<f64, EvaluationError> {
        series.require_window(self.window_days)?;
        let run = self.clean_run(series.finite_values()?);
        Ok(run.last().copied().unwrap_or(numeric::FULL_SCORE))
    }

    fn progressive_scores(&self, series: &MeasurementSeries) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.window_days)?;
        Ok(self.clean_run(series.finite_values()?))
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.config.clone()).map(|_| ())
    }

    fn describe(&self) -> String {
        let subject = if self.config.period.is_cumulative() {
            format!("{} running total", self.config.period)
        } else {
            "every day's value".to_owned()
        };
        format!(
            "weekly elimination: {subject} must stay {} {} across {} days; \
             the first violation scores {} for the rest of the period",
            self.operator, self.config.elimination_threshold, self.window_days, self.config.failure_value
        )
    }

    fn window_days(&self) -> usize {
        self.window_days
    }
}
