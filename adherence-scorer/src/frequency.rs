//! "At least N days a week" goals.

use adherence_core::{
    AdherenceScorer, ComparisonOperator, ConfigurationError, EvaluationError, FrequencyGoal,
    MeasurementSeries, ThresholdValue, default_window_days, finite_reading, validate_window,
};
use serde::{Deserialize, Serialize};

use crate::config::{full_score, require_non_negative};

/// Parameters for [`MinimumFrequency`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumFrequencyConfig {
    /// Daily threshold, either a number or an `"HH:MM"` clock time.
    pub daily_threshold: ThresholdValue,
    /// Comparison a day must satisfy to pass.
    pub daily_comparison: String,
    /// Passing days needed per window.
    pub required_days: usize,
    /// Period score when the frequency is met.
    #[serde(default = "full_score")]
    pub success_value: f64,
    /// Period score when it is not.
    #[serde(default)]
    pub failure_value: f64,
    /// Days per evaluation window.
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

/// Minimum frequency strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumFrequency {
    config: MinimumFrequencyConfig,
    threshold: f64,
    operator: ComparisonOperator,
    goal: FrequencyGoal,
}

impl MinimumFrequency {
    /// Validate `config` and build the strategy.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidTimeOfDay`] for a malformed clock
    /// threshold, [`ConfigurationError::UnknownOperator`] for an unparseable
    /// comparison, and [`ConfigurationError::DaysOutOfRange`] when
    /// `required_days` does not fit the window.
    pub fn new(config: MinimumFrequencyConfig) -> Result<Self, ConfigurationError> {
        let window = validate_window(config.window_days)?;
        let threshold = config.daily_threshold.resolve("daily_threshold")?;
        let operator: ComparisonOperator = config.daily_comparison.parse()?;
        require_non_negative("success_value", config.success_value)?;
        require_non_negative("failure_value", config.failure_value)?;
        let goal = FrequencyGoal::new(config.required_days, window, "required_days")?;
        log::debug!(
            "built minimum frequency goal: value {operator} {threshold} on {} of {window} days",
            goal.required()
        );
        Ok(Self {
            config,
            threshold,
            operator,
            goal,
        })
    }

    /// Configuration the strategy was built from.
    #[must_use]
    pub const fn config(&self) -> &MinimumFrequencyConfig {
        &self.config
    }

    /// Threshold in decimal units, after any clock-time conversion.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Report whether a day passes.
    #[must_use]
    pub fn passes(&self, value: f64) -> bool {
        self.operator.compare(value, self.threshold)
    }

    /// Score a single day as a pass or a fail.
    #[must_use]
    pub fn score_value(&self, value: f64) -> f64 {
        if self.passes(value) {
            self.config.success_value
        } else {
            self.config.failure_value
        }
    }
}

impl AdherenceScorer for MinimumFrequency {
    type Observation = f64;

    fn score(&self, value: &f64) -> Result<f64, EvaluationError> {
        finite_reading(*value, 0).map(|v| self.score_value(v))
    }

    fn weekly_score(&self, series: &MeasurementSeries) -> Result<f64, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let values = series.finite_values()?;
        Ok(self
            .goal
            .outcome(values.iter().map(|v| self.passes(*v)))
            .score(self.config.success_value, self.config.failure_value))
    }

    fn progressive_scores(&self, series: &MeasurementSeries) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.config.window_days)?;
        let values = series.finite_values()?;
        Ok(self.goal.progressive(
            values.iter().map(|v| self.passes(*v)),
            self.config.success_value,
            self.config.failure_value,
        ))
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.config.clone()).map(|_| ())
    }

    fn describe(&self) -> String {
        format!(
            "minimum frequency: value {} {} on at least {} of {} days scores {}, otherwise {}",
            self.operator,
            self.threshold,
            self.goal.required(),
            self.goal.window(),
            self.config.success_value,
            self.config.failure_value
        )
    }

    fn window_days(&self) -> usize {
        self.config.window_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adherence_core::test_support::{assert_close, assert_scores_close, week};
    use rstest::rstest;

    fn bedtime(required_days: usize) -> MinimumFrequencyConfig {
        MinimumFrequencyConfig {
            daily_threshold: ThresholdValue::TimeOfDay("22:30".into()),
            daily_comparison: "<=".into(),
            required_days,
            success_value: 100.0,
            failure_value: 0.0,
            window_days: 7,
        }
    }

    #[test]
    fn converts_clock_threshold() {
        let goal = MinimumFrequency::new(bedtime(5)).expect("valid config");
        assert_close(goal.threshold(), 22.5);
        assert!(goal.passes(22.25));
        assert!(!goal.passes(23.0));
    }

    #[test]
    fn rejects_malformed_clock_threshold() {
        let mut config = bedtime(5);
        config.daily_threshold = ThresholdValue::TimeOfDay("25:99".into());
        let err = MinimumFrequency::new(config).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidTimeOfDay { .. }));
    }

    #[rstest]
    #[case(&[22.0, 23.0, 22.0, 22.0, 23.0, 22.0, 22.0], 100.0)]
    #[case(&[22.0, 23.0, 23.0, 22.0, 23.0, 22.0, 22.0], 0.0)]
    fn weekly_score_is_binary(#[case] values: &[f64], #[case] expected: f64) {
        let goal = MinimumFrequency::new(bedtime(5)).expect("valid config");
        assert_eq!(goal.weekly_score(&week(values)), Ok(expected));
    }

    #[test]
    fn progressive_follows_remaining_days() {
        let goal = MinimumFrequency::new(bedtime(5)).expect("valid config");
        let series = week(&[23.0, 23.0, 22.0, 23.0]);
        let scores = goal.progressive_scores(&series).expect("partial week");
        assert_scores_close(&scores, &[100.0, 100.0, 100.0, 0.0]);
    }

    #[test]
    fn numeric_thresholds_deserialise() {
        let config: MinimumFrequencyConfig = serde_json::from_str(
            r#"{"daily_threshold": 30, "daily_comparison": ">=", "required_days": 3}"#,
        )
        .expect("valid config");
        let goal = MinimumFrequency::new(config).expect("valid config");
        assert_close(goal.threshold(), 30.0);
        assert_eq!(goal.window_days(), 7);
    }
}
