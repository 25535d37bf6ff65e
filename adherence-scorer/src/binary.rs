//! Pass/fail goals against a single threshold.
//!
//! Buildup goals ("at least 10,000 steps") score each day on its own.
//! Limit goals ("no more than 200 mg of caffeine") are judged as "stay under
//! the limit on N of the window's days", so their progressive score follows
//! the achievability rule and must name `required_days` explicitly.

use adherence_core::{
    AdherenceScorer, ComparisonOperator, ConfigurationError, EvaluationError, FrequencyGoal,
    MeasurementSeries, default_window_days, finite_reading, numeric, validate_window,
};
use serde::{Deserialize, Serialize};

use crate::config::{full_score, require_finite, require_non_negative};

/// Parameters for [`BinaryThreshold`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryThresholdConfig {
    /// Value compared against each day's measurement.
    pub threshold: f64,
    /// Comparison operator string, e.g. `">="`.
    pub operator: String,
    /// Score for a passing day.
    #[serde(default = "full_score")]
    pub success_value: f64,
    /// Score for a failing day.
    #[serde(default)]
    pub failure_value: f64,
    /// Compliant days needed per window; required for limit operators.
    #[serde(default)]
    pub required_days: Option<usize>,
    /// Days per evaluation window.
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

/// Binary threshold strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryThreshold {
    config: BinaryThresholdConfig,
    operator: ComparisonOperator,
    goal: Option<FrequencyGoal>,
}

impl BinaryThreshold {
    /// Validate `config` and build the strategy.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownOperator`] for an unparseable
    /// operator, [`ConfigurationError::MissingRequiredDays`] when a limit
    /// operator lacks `required_days`,
    /// [`ConfigurationError::DaysOutOfRange`] when `required_days` does not
    /// fit the window, and [`ConfigurationError::Negative`] for a negative
    /// success or failure score.
    pub fn new(config: BinaryThresholdConfig) -> Result<Self, ConfigurationError> {
        let window = validate_window(config.window_days)?;
        require_finite("threshold", config.threshold)?;
        require_non_negative("success_value", config.success_value)?;
        require_non_negative("failure_value", config.failure_value)?;
        let operator: ComparisonOperator = config.operator.parse()?;
        let goal = if operator.is_limit() {
            let required = config
                .required_days
                .ok_or(ConfigurationError::MissingRequiredDays { operator })?;
            Some(FrequencyGoal::new(required, window, "required_days")?)
        } else {
            if let Some(days) = config.required_days {
                log::warn!("ignoring required_days={days} for buildup operator '{operator}'");
            }
            None
        };
        log::debug!(
            "built binary threshold goal: value {operator} {} over {window} days",
            config.threshold
        );
        Ok(Self {
            config,
            operator,
            goal,
        })
    }

    /// Configuration the strategy was built from.
    #[must_use]
    pub const fn config(&self) -> &BinaryThresholdConfig {
        &self.config
    }

    /// Report whether the day's value satisfies the threshold.
    #[must_use]
    pub fn passes(&self, value: f64) -> bool {
        self.operator.compare(value, self.config.threshold)
    }

    /// Score a single value.
    #[must_use]
    pub fn score_value(&self, value: f64) -> f64 {
        if self.passes(value) {
            self.config.success_value
        } else {
            self.config.failure_value
        }
    }
}

impl AdherenceScorer for BinaryThreshold {
    type Observation = f64;

    fn score(&self, value: &f64) -> Result<f64, EvaluationError> {
        finite_reading(*value, 0).map(|v| self.score_value(v))
    }

    fn weekly_score(&self, series: &MeasurementSeries) -> Result<f64, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let values = series.finite_values()?;
        let score = self.goal.map_or_else(
            || {
                let daily: Vec<f64> = values.iter().map(|v| self.score_value(*v)).collect();
                numeric::mean(&daily).unwrap_or(self.config.failure_value)
            },
            |goal| {
                goal.outcome(values.iter().map(|v| self.passes(*v)))
                    .score(self.config.success_value, self.config.failure_value)
            },
        );
        Ok(score)
    }

    fn progressive_scores(&self, series: &MeasurementSeries) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.config.window_days)?;
        let values = series.finite_values()?;
        let scores = self.goal.map_or_else(
            || values.iter().map(|v| self.score_value(*v)).collect(),
            |goal| {
                goal.progressive(
                    values.iter().map(|v| self.passes(*v)),
                    self.config.success_value,
                    self.config.failure_value,
                )
            },
        );
        Ok(scores)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.config.clone()).map(|_| ())
    }

    fn describe(&self) -> String {
        let rule = format!(
            "binary threshold: value {} {} scores {}, otherwise {}",
            self.operator,
            self.config.threshold,
            self.config.success_value,
            self.config.failure_value
        );
        self.goal.map_or_else(
            || format!("{rule}; weekly score is the daily mean"),
            |goal| {
                format!(
                    "{rule}; limit met on at least {} of {} days",
                    goal.required(),
                    goal.window()
                )
            },
        )
    }

    fn window_days(&self) -> usize {
        self.config.window_days
    }
}
