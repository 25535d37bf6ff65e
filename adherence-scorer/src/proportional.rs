//! Percentage-of-target goals.
//!
//! Daily goals score each day independently. Weekly goals compare the
//! week-to-date reduction (a running sum by default) against the target, so
//! the final progressive value is the period score.

use adherence_core::{
    AdherenceScorer, CalculationMethod, ConfigurationError, EvaluationError, EvaluationPeriod,
    MeasurementSeries, default_window_days, finite_reading, numeric, validate_window,
};
use serde::{Deserialize, Serialize};

use crate::config::{enabled, full_score, require_finite, require_non_negative, require_positive};

/// Parameters for [`Proportional`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionalConfig {
    /// Value that earns a score of 100.
    pub target: f64,
    /// Unit label, informational only.
    #[serde(default)]
    pub unit: String,
    /// Scores below this floor collapse to the floor or to zero.
    #[serde(default)]
    pub minimum_threshold: f64,
    /// Upper bound on the score; may exceed 100.
    #[serde(default = "full_score")]
    pub maximum_cap: f64,
    /// Award `minimum_threshold` rather than zero below the floor.
    #[serde(default = "enabled")]
    pub partial_credit: bool,
    /// Whether the target applies per day or to the week-to-date total.
    #[serde(default)]
    pub period: EvaluationPeriod,
    /// Reduction applied to the week-to-date values in cumulative mode.
    #[serde(default)]
    pub calculation_method: CalculationMethod,
    /// Days per evaluation window.
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

/// Proportional strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Proportional {
    config: ProportionalConfig,
}

impl Proportional {
    /// Validate `config` and build the strategy.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::NonPositive`] for a target that is not
    /// positive and finite, and [`ConfigurationError::CapBelowFloor`] when
    /// `maximum_cap` sits below `minimum_threshold`.
    pub fn new(config: ProportionalConfig) -> Result<Self, ConfigurationError> {
        validate_window(config.window_days)?;
        require_positive("target", config.target)?;
        let floor = require_non_negative("minimum_threshold", config.minimum_threshold)?;
        let cap = require_finite("maximum_cap", config.maximum_cap)?;
        if cap < floor {
            return Err(ConfigurationError::CapBelowFloor { cap, floor });
        }
        log::debug!(
            "built proportional goal: {} {} per {} ({})",
            config.target,
            config.unit,
            config.period,
            config.calculation_method
        );
        Ok(Self { config })
    }

    /// Configuration the strategy was built from.
    #[must_use]
    pub const fn config(&self) -> &ProportionalConfig {
        &self.config
    }

    /// Score a single value, or a week-to-date reduction in cumulative mode.
    #[must_use]
    pub fn score_value(&self, value: f64) -> f64 {
        let raw = numeric::percentage_of(value, self.config.target);
        if raw < self.config.minimum_threshold {
            if self.config.partial_credit {
                self.config.minimum_threshold
            } else {
                0.0
            }
        } else {
            raw.min(self.config.maximum_cap)
        }
    }

    fn daily_scores(&self, values: &[f64]) -> Vec<f64> {
        if self.config.period.is_cumulative() {
            self.config
                .calculation_method
                .running(values)
                .into_iter()
                .map(|reduced| self.score_value(reduced))
                .collect()
        } else {
            values.iter().map(|v| self.score_value(*v)).collect()
        }
    }
}

impl AdherenceScorer for Proportional {
    type Observation = f64;

    fn score(&self, value: &f64) -> Result<f64, EvaluationError> {
        finite_reading(*value, 0).map(|v| self.score_value(v))
    }

    fn weekly_score(&self, series: &MeasurementSeries) -> Result<f64, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let scores = self.daily_scores(series.finite_values()?);
        let period = if self.config.period.is_cumulative() {
            scores.last().copied()
        } else {
            numeric::mean(&scores)
        };
        Ok(period.unwrap_or(0.0))
    }

    fn progressive_scores(&self, series: &MeasurementSeries) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.config.window_days)?;
        Ok(self.daily_scores(series.finite_values()?))
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.config.clone()).map(|_| ())
    }

    fn describe(&self) -> String {
        let basis = if self.config.period.is_cumulative() {
            format!("{} of week-to-date values", self.config.calculation_method)
        } else {
            "each day's value".to_owned()
        };
        format!(
            "proportional: {basis} / {} {} x 100, floor {} ({}), cap {}",
            self.config.target,
            self.config.unit,
            self.config.minimum_threshold,
            if self.config.partial_credit {
                "partial credit"
            } else {
                "zero below floor"
            },
            self.config.maximum_cap
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
    use rstest::{fixture, rstest};

    #[fixture]
    fn daily_config() -> ProportionalConfig {
        ProportionalConfig {
            target: 8.0,
            unit: "servings".into(),
            minimum_threshold: 0.0,
            maximum_cap: 100.0,
            partial_credit: true,
            period: EvaluationPeriod::Daily,
            calculation_method: CalculationMethod::Sum,
            window_days: 7,
        }
    }

    #[rstest]
    #[case(4.0, 50.0)]
    #[case(8.0, 100.0)]
    #[case(16.0, 100.0)]
    #[case(0.0, 0.0)]
    fn scores_against_target(daily_config: ProportionalConfig, #[case] value: f64, #[case] expected: f64) {
        let goal = Proportional::new(daily_config).expect("valid config");
        assert_close(goal.score_value(value), expected);
    }

    #[rstest]
    #[case(true, 40.0)]
    #[case(false, 0.0)]
    fn floor_respects_partial_credit(
        mut daily_config: ProportionalConfig,
        #[case] partial_credit: bool,
        #[case] expected: f64,
    ) {
        daily_config.minimum_threshold = 40.0;
        daily_config.partial_credit = partial_credit;
        let goal = Proportional::new(daily_config).expect("valid config");
        assert_close(goal.score_value(2.0), expected);
        assert_close(goal.score_value(4.0), 50.0);
    }

    #[rstest]
    fn cap_may_exceed_one_hundred(mut daily_config: ProportionalConfig) {
        daily_config.maximum_cap = 150.0;
        let goal = Proportional::new(daily_config).expect("valid config");
        assert_close(goal.score_value(10.0), 125.0);
        assert_close(goal.score_value(20.0), 150.0);
    }

    #[rstest]
    fn daily_weekly_score_is_mean(daily_config: ProportionalConfig) {
        let goal = Proportional::new(daily_config).expect("valid config");
        let series = week(&[8.0, 4.0, 8.0, 4.0, 8.0, 4.0, 0.0]);
        let weekly = goal.weekly_score(&series).expect("full week");
        assert_close(weekly, numeric::percentage_of(450.0, 700.0));
    }

    #[rstest]
    fn weekly_target_uses_running_total(mut daily_config: ProportionalConfig) {
        daily_config.target = 150.0;
        daily_config.period = EvaluationPeriod::Weekly;
        let goal = Proportional::new(daily_config).expect("valid config");
        let series = week(&[30.0, 0.0, 45.0, 0.0, 30.0, 45.0, 30.0]);
        let progressive = goal.progressive_scores(&series).expect("full week");
        assert_scores_close(&progressive, &[20.0, 20.0, 50.0, 50.0, 70.0, 100.0, 100.0]);
        assert_eq!(goal.weekly_score(&series), Ok(100.0));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    fn rejects_unusable_targets(mut daily_config: ProportionalConfig, #[case] target: f64) {
        daily_config.target = target;
        let err = Proportional::new(daily_config).unwrap_err();
        assert!(matches!(err, ConfigurationError::NonPositive { .. }));
    }

    #[rstest]
    fn rejects_cap_below_floor(mut daily_config: ProportionalConfig) {
        daily_config.minimum_threshold = 50.0;
        daily_config.maximum_cap = 40.0;
        assert_eq!(
            Proportional::new(daily_config),
            Err(ConfigurationError::CapBelowFloor {
                cap: 40.0,
                floor: 50.0
            })
        );
    }

    #[rstest]
    fn partial_week_progressive_is_allowed(daily_config: ProportionalConfig) {
        let goal = Proportional::new(daily_config).expect("valid config");
        let scores = goal.progressive_scores(&week(&[2.0, 6.0])).expect("partial week");
        assert_scores_close(&scores, &[25.0, 75.0]);
        assert!(goal.progressive_scores(&week(&[1.0; 8])).is_err());
    }
}
