//! Helpers shared by unit and behaviour tests.

use crate::{
    AdherenceScorer, ConfigurationError, DEFAULT_WINDOW_DAYS, EvaluationError, MeasurementSeries,
    numeric,
};

/// Build a series from daily values.
#[must_use]
pub fn week(values: &[f64]) -> MeasurementSeries {
    MeasurementSeries::new(values.to_vec())
}

/// Build a seven-day series repeating `value`.
#[must_use]
pub fn constant_week(value: f64) -> MeasurementSeries {
    MeasurementSeries::new(vec![value; DEFAULT_WINDOW_DAYS])
}

/// Assert two scores agree within `1e-9`.
///
/// # Panics
/// Panics when the scores diverge.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        numeric::approx_eq(actual, expected),
        "expected {expected}, got {actual}"
    );
}

/// Assert two score sequences agree element-wise within `1e-9`.
///
/// # Panics
/// Panics when the lengths differ or any pair of scores diverges.
pub fn assert_scores_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "score count differs: {actual:?} vs {expected:?}"
    );
    for (day, (got, want)) in actual.iter().zip(expected).enumerate() {
        assert!(
            numeric::approx_eq(*got, *want),
            "day {day}: expected {want}, got {got} in {actual:?}"
        );
    }
}

/// Scorer that awards the same score to every day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScorer {
    /// Score awarded to every observation.
    pub value: f64,
}

impl AdherenceScorer for FixedScorer {
    type Observation = f64;

    fn score(&self, _observation: &f64) -> Result<f64, EvaluationError> {
        Ok(self.value)
    }

    fn weekly_score(&self, series: &MeasurementSeries) -> Result<f64, EvaluationError> {
        series.require_window(DEFAULT_WINDOW_DAYS)?;
        Ok(self.value)
    }

    fn progressive_scores(&self, series: &MeasurementSeries) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(DEFAULT_WINDOW_DAYS)?;
        Ok(vec![self.value; series.len()])
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.value.is_finite() {
            return Err(ConfigurationError::NonFinite {
                field: "value",
                value: self.value,
            });
        }
        if self.value < 0.0 {
            return Err(ConfigurationError::Negative {
                field: "value",
                value: self.value,
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("fixed score of {}", self.value)
    }

    fn window_days(&self) -> usize {
        DEFAULT_WINDOW_DAYS
    }
}
