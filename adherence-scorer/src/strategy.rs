//! Strategy factory and the shape-erasing [`Strategy`] enum.
//!
//! Callers that load goals from configuration files do not know the
//! observation shape up front. [`Strategy`] accepts untyped
//! [`Observation`]s and hands each strategy the shape it consumes, failing
//! with [`EvaluationError::UnexpectedObservation`] otherwise.

use adherence_core::{
    AdherenceScorer, CategoryObservation, ComponentValues, ConfigurationError, EvaluationError,
    MeasurementSeries, Observation,
};

use crate::{
    AlgorithmConfig, AlgorithmType, BinaryThreshold, CategoricalFilterThreshold,
    CompositeWeighted, ConstrainedWeeklyAllowance, MinimumFrequency, Proportional,
    ProportionalFrequencyHybrid, WeeklyElimination, ZoneBased,
};

/// One of the nine strategies, built from an [`AlgorithmConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// See [`BinaryThreshold`].
    BinaryThreshold(BinaryThreshold),
    /// See [`Proportional`].
    Proportional(Proportional),
    /// See [`ProportionalFrequencyHybrid`].
    ProportionalFrequencyHybrid(ProportionalFrequencyHybrid),
    /// See [`MinimumFrequency`].
    MinimumFrequency(MinimumFrequency),
    /// See [`WeeklyElimination`].
    WeeklyElimination(WeeklyElimination),
    /// See [`ZoneBased`].
    ZoneBased(ZoneBased),
    /// See [`CompositeWeighted`].
    CompositeWeighted(CompositeWeighted),
    /// See [`ConstrainedWeeklyAllowance`].
    ConstrainedWeeklyAllowance(ConstrainedWeeklyAllowance),
    /// See [`CategoricalFilterThreshold`].
    CategoricalFilterThreshold(CategoricalFilterThreshold),
}

/// Build the strategy a configuration record describes.
///
/// # Errors
/// Returns the [`ConfigurationError`] raised by the selected strategy's
/// constructor.
///
/// # Examples
/// ```
/// use adherence_core::{AdherenceScorer, Observation};
/// use adherence_scorer::{AlgorithmConfig, build_strategy};
///
/// let config: AlgorithmConfig = serde_json::from_str(
///     r#"{"algorithm_type": "proportional", "target": 8}"#,
/// )
/// .unwrap();
/// let strategy = build_strategy(config).unwrap();
/// let day = Observation::Value(4.0);
/// assert_eq!(strategy.score(&day), Ok(50.0));
/// ```
pub fn build_strategy(config: AlgorithmConfig) -> Result<Strategy, ConfigurationError> {
    let kind = config.algorithm_type();
    let strategy = match config {
        AlgorithmConfig::BinaryThreshold(c) => Strategy::BinaryThreshold(BinaryThreshold::new(c)?),
        AlgorithmConfig::Proportional(c) => Strategy::Proportional(Proportional::new(c)?),
        AlgorithmConfig::ProportionalFrequencyHybrid(c) => {
            Strategy::ProportionalFrequencyHybrid(ProportionalFrequencyHybrid::new(c)?)
        }
        AlgorithmConfig::MinimumFrequency(c) => {
            Strategy::MinimumFrequency(MinimumFrequency::new(c)?)
        }
        AlgorithmConfig::WeeklyElimination(c) => {
            Strategy::WeeklyElimination(WeeklyElimination::new(c)?)
        }
        AlgorithmConfig::ZoneBased(c) => Strategy::ZoneBased(ZoneBased::new(c)?),
        AlgorithmConfig::CompositeWeighted(c) => {
            Strategy::CompositeWeighted(CompositeWeighted::new(c)?)
        }
        AlgorithmConfig::ConstrainedWeeklyAllowance(c) => {
            Strategy::ConstrainedWeeklyAllowance(ConstrainedWeeklyAllowance::new(c)?)
        }
        AlgorithmConfig::CategoricalFilterThreshold(c) => {
            Strategy::CategoricalFilterThreshold(CategoricalFilterThreshold::new(c)?)
        }
    };
    log::debug!("built {kind} strategy");
    Ok(strategy)
}

impl TryFrom<AlgorithmConfig> for Strategy {
    type Error = ConfigurationError;

    fn try_from(config: AlgorithmConfig) -> Result<Self, Self::Error> {
        build_strategy(config)
    }
}

/// Borrowed view grouping strategies by observation shape.
enum View<'a> {
    Scalar(&'a dyn AdherenceScorer<Observation = f64>),
    Composite(&'a CompositeWeighted),
    Categorical(&'a CategoricalFilterThreshold),
}

impl Strategy {
    /// Name of the wrapped strategy.
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

    /// Borrow the allowance strategy, if that is what this is.
    #[must_use]
    pub const fn as_allowance(&self) -> Option<&ConstrainedWeeklyAllowance> {
        match self {
            Self::ConstrainedWeeklyAllowance(goal) => Some(goal),
            _ => None,
        }
    }

    /// Mutably borrow the allowance strategy, if that is what this is.
    #[must_use]
    pub const fn as_allowance_mut(&mut self) -> Option<&mut ConstrainedWeeklyAllowance> {
        match self {
            Self::ConstrainedWeeklyAllowance(goal) => Some(goal),
            _ => None,
        }
    }

    const fn view(&self) -> View<'_> {
        match self {
            Self::BinaryThreshold(goal) => View::Scalar(goal),
            Self::Proportional(goal) => View::Scalar(goal),
            Self::ProportionalFrequencyHybrid(goal) => View::Scalar(goal),
            Self::MinimumFrequency(goal) => View::Scalar(goal),
            Self::WeeklyElimination(goal) => View::Scalar(goal),
            Self::ZoneBased(goal) => View::Scalar(goal),
            Self::ConstrainedWeeklyAllowance(goal) => View::Scalar(goal),
            Self::CompositeWeighted(goal) => View::Composite(goal),
            Self::CategoricalFilterThreshold(goal) => View::Categorical(goal),
        }
    }
}

/// Read a flag or numeric observation as a number.
///
/// # Errors
/// Returns [`EvaluationError::UnexpectedObservation`] for component maps and
/// category lists.
pub fn numeric_reading(observation: &Observation) -> Result<f64, EvaluationError> {
    observation
        .as_value()
        .ok_or(EvaluationError::UnexpectedObservation {
            expected: "numeric",
            found: observation.kind(),
        })
}

/// Convert an untyped series into the numeric series scalar strategies
/// consume.
///
/// # Errors
/// Returns [`EvaluationError::UnexpectedObservation`] for the first
/// observation that is not a flag or number.
pub fn numeric_series(
    series: &MeasurementSeries<Observation>,
) -> Result<MeasurementSeries<f64>, EvaluationError> {
    series.try_map(numeric_reading)
}

fn component_reading(observation: &Observation) -> Result<&ComponentValues, EvaluationError> {
    match observation {
        Observation::Components(values) => Ok(values),
        other => Err(EvaluationError::UnexpectedObservation {
            expected: "component map",
            found: other.kind(),
        }),
    }
}

fn category_reading(
    observation: &Observation,
) -> Result<&Vec<CategoryObservation>, EvaluationError> {
    match observation {
        Observation::Categories(items) => Ok(items),
        other => Err(EvaluationError::UnexpectedObservation {
            expected: "category list",
            found: other.kind(),
        }),
    }
}

impl AdherenceScorer for Strategy {
    type Observation = Observation;

    fn score(&self, observation: &Observation) -> Result<f64, EvaluationError> {
        match self.view() {
            View::Scalar(goal) => goal.score(&numeric_reading(observation)?),
            View::Composite(goal) => goal.score(component_reading(observation)?),
            View::Categorical(goal) => goal.score(category_reading(observation)?),
        }
    }

    fn weekly_score(
        &self,
        series: &MeasurementSeries<Observation>,
    ) -> Result<f64, EvaluationError> {
        match self.view() {
            View::Scalar(goal) => goal.weekly_score(&numeric_series(series)?),
            View::Composite(goal) => {
                goal.weekly_score(&series.try_map(|o| component_reading(o).cloned())?)
            }
            View::Categorical(goal) => {
                goal.weekly_score(&series.try_map(|o| category_reading(o).cloned())?)
            }
        }
    }

    fn progressive_scores(
        &self,
        series: &MeasurementSeries<Observation>,
    ) -> Result<Vec<f64>, EvaluationError> {
        match self.view() {
            View::Scalar(goal) => goal.progressive_scores(&numeric_series(series)?),
            View::Composite(goal) => {
                goal.progressive_scores(&series.try_map(|o| component_reading(o).cloned())?)
            }
            View::Categorical(goal) => {
                goal.progressive_scores(&series.try_map(|o| category_reading(o).cloned())?)
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        match self.view() {
            View::Scalar(goal) => goal.validate(),
            View::Composite(goal) => goal.validate(),
            View::Categorical(goal) => goal.validate(),
        }
    }

    fn describe(&self) -> String {
        match self.view() {
            View::Scalar(goal) => goal.describe(),
            View::Composite(goal) => goal.describe(),
            View::Categorical(goal) => goal.describe(),
        }
    }

    fn window_days(&self) -> usize {
        match self.view() {
            View::Scalar(goal) => goal.window_days(),
            View::Composite(goal) => goal.window_days(),
            View::Categorical(goal) => goal.window_days(),
        }
    }
}
