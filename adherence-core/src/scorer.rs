//! The contract every adherence strategy honours.
//!
//! A strategy is built once from validated configuration and is immutable
//! afterwards, so one instance may score many users' series concurrently.

use crate::{ConfigurationError, EvaluationError, MeasurementSeries};

/// Score daily observations against a configured health goal.
///
/// Scores sit on a `0..=100` scale unless a strategy's configuration raises
/// its cap. Period scores require a full window of observations; progressive
/// scores accept any prefix of the window and return one value per day.
///
/// Implementations must:
/// - Produce finite, non-negative scores, rejecting negative score
///   parameters at construction.
/// - Leave the supplied series untouched.
/// - Be thread-safe (`Send` + `Sync`).
///
/// # Examples
///
/// ```rust
/// use adherence_core::{
///     AdherenceScorer, ConfigurationError, EvaluationError, MeasurementSeries,
/// };
///
/// struct AnyActivity;
///
/// impl AdherenceScorer for AnyActivity {
///     type Observation = f64;
///
///     fn score(&self, value: &f64) -> Result<f64, EvaluationError> {
///         Ok(if *value > 0.0 { 100.0 } else { 0.0 })
///     }
///
///     fn weekly_score(&self, series: &MeasurementSeries) -> Result<f64, EvaluationError> {
///         series.require_window(self.window_days())?;
///         let active = series.iter().any(|value| *value > 0.0);
///         Ok(if active { 100.0 } else { 0.0 })
///     }
///
///     fn progressive_scores(
///         &self,
///         series: &MeasurementSeries,
///     ) -> Result<Vec<f64>, EvaluationError> {
///         series.iter().map(|value| self.score(value)).collect()
///     }
///
///     fn validate(&self) -> Result<(), ConfigurationError> {
///         Ok(())
///     }
///
///     fn describe(&self) -> String {
///         "any activity".into()
///     }
///
///     fn window_days(&self) -> usize {
///         7
///     }
/// }
///
/// let week = MeasurementSeries::new(vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(AnyActivity.weekly_score(&week), Ok(100.0));
/// ```
pub trait AdherenceScorer: Send + Sync {
    /// Shape of one day's observation.
    type Observation;

    /// Score a single day's observation in isolation.
    ///
    /// # Errors
    /// Returns an [`EvaluationError`] when the observation cannot be scored.
    fn score(&self, observation: &Self::Observation) -> Result<f64, EvaluationError>;

    /// Score a complete evaluation window.
    ///
    /// # Errors
    /// Returns [`EvaluationError::WindowMismatch`] unless the series holds
    /// exactly [`AdherenceScorer::window_days`] observations, or any
    /// per-day evaluation failure.
    fn weekly_score(
        &self,
        series: &MeasurementSeries<Self::Observation>,
    ) -> Result<f64, EvaluationError>;

    /// Score each day of a possibly partial window, taking into account
    /// what the remaining days could still achieve.
    ///
    /// # Errors
    /// Returns [`EvaluationError::SeriesTooLong`] when the series runs past
    /// the window, or any per-day evaluation failure.
    fn progressive_scores(
        &self,
        series: &MeasurementSeries<Self::Observation>,
    ) -> Result<Vec<f64>, EvaluationError>;

    /// Re-check the configuration this instance was built from.
    ///
    /// # Errors
    /// Returns the [`ConfigurationError`] construction would have raised.
    fn validate(&self) -> Result<(), ConfigurationError>;

    /// Human-readable summary of the goal for audit output.
    fn describe(&self) -> String;

    /// Number of days in one evaluation window.
    fn window_days(&self) -> usize;
}
