//! Best-N-of-M proportional goals.
//!
//! A user who walks 9,000 steps on five days deserves more than a user who
//! walks 2,000, even though neither hit 10,000 on the required days. The
//! period score therefore averages the best qualifying days instead of
//! gating on a hard frequency.

use adherence_core::{
    AdherenceScorer, ConfigurationError, EvaluationError, FrequencyGoal, MeasurementSeries,
    default_window_days, finite_reading, numeric, validate_window,
};
use serde::{Deserialize, Serialize};

use crate::config::{full_score, require_finite, require_non_negative, require_positive};

/// Parameters for [`ProportionalFrequencyHybrid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionalFrequencyHybridConfig {
    /// Daily value that earns a score of 100.
    pub daily_target: f64,
    /// Number of best qualifying days averaged into the period score.
    pub required_qualifying_days: usize,
    /// Raw value a day must reach to qualify.
    #[serde(default)]
    pub daily_minimum_threshold: f64,
    /// Period score when too few days qualify.
    #[serde(default)]
    pub minimum_score: f64,
    /// Upper bound on a day's score.
    #[serde(default = "full_score")]
    pub maximum_cap: f64,
    /// Progressive score once the frequency can no longer be met.
    #[serde(default)]
    pub failure_value: f64,
    /// Days per evaluation window.
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

/// Proportional frequency hybrid strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionalFrequencyHybrid {
    config: ProportionalFrequencyHybridConfig,
    goal: FrequencyGoal,
}

impl ProportionalFrequencyHybrid {
    /// Validate `config` and build the strategy.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::NonPositive`] for an unusable target or
    /// cap and [`ConfigurationError::DaysOutOfRange`] when the qualifying
    /// day count does not fit the window.
    pub fn new(config: ProportionalFrequencyHybridConfig) -> Result<Self, ConfigurationError> {
        let window = validate_window(config.window_days)?;
        require_positive("daily_target", config.daily_target)?;
        require_finite("daily_minimum_threshold", config.daily_minimum_threshold)?;
        require_non_negative("minimum_score", config.minimum_score)?;
        require_non_negative("maximum_cap", config.maximum_cap)?;
        require_non_negative("failure_value", config.failure_value)?;
        let goal = FrequencyGoal::new(
            config.required_qualifying_days,
            window,
            "required_qualifying_days",
        )?;
        log::debug!(
            "built hybrid goal: best {} of {window} days against {}",
            goal.required(),
            config.daily_target
        );
        Ok(Self { config, goal })
    }

    /// Configuration the strategy was built from.
    #[must_use]
    pub const fn config(&self) -> &ProportionalFrequencyHybridConfig {
        &self.config
    }

    /// Proportional score for a single day.
    #[must_use]
    pub fn score_value(&self, value: f64) -> f64 {
        numeric::percentage_of(value, self.config.daily_target).clamp(0.0, self.config.maximum_cap)
    }

    /// Report whether a day counts towards the frequency requirement.
    #[must_use]
    pub fn qualifies(&self, value: f64) -> bool {
        value >= self.config.daily_minimum_threshold
    }
}

impl AdherenceScorer for ProportionalFrequencyHybrid {
    type Observation = f64;

    fn score(&self, value: &f64) -> Result<f64, EvaluationError> {
        finite_reading(*value, 0).map(|v| self.score_value(v))
    }

    fn weekly_score(&self, series: &MeasurementSeries) -> Result<f64, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let mut qualifying: Vec<f64> = series
            .finite_values()?
            .iter()
            .filter(|v| self.qualifies(**v))
            .map(|v| self.score_value(*v))
            .collect();
        if qualifying.len() < self.goal.required() {
            log::debug!(
                "{} qualifying days, {} required; awarding minimum score",
                qualifying.len(),
                self.goal.required()
            );
            return Ok(self.config.minimum_score);
        }
        qualifying.sort_by(|a, b| b.total_cmp(a));
        qualifying.truncate(self.goal.required());
        Ok(numeric::mean(&qualifying).unwrap_or(self.config.minimum_score))
    }

    fn progressive_scores(&self, series: &MeasurementSeries) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.config.window_days)?;
        let values = series.finite_values()?;
        Ok(self.goal.progressive(
            values.iter().map(|v| self.qualifies(*v)),
            numeric::FULL_SCORE,
            self.config.failure_value,
        ))
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.config.clone()).map(|_| ())
    }

    fn describe(&self) -> String {
        format!(
            "proportional frequency hybrid: mean of the best {} of {} days scored as \
             value / {} x 100 (cap {}); days below {} do not qualify; minimum score {}",
            self.goal.required(),
            self.goal.window(),
            self.config.daily_target,
            self.config.maximum_cap,
            self.config.daily_minimum_threshold,
            self.config.minimum_score
        )
    }

    fn window_days(&self) -> usize {
        self.config.window_days
    }
}
