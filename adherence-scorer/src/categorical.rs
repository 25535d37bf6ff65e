//! Goals judged per category, such as "at least 2 servings of vegetables
//! and no more than 1 of fried food".
//!
//! Each day carries labelled observations; every observation is scored by
//! the filter claiming its label and the day's scores are aggregated.

use adherence_core::{
    AdherenceScorer, AggregationMethod, CategoryFilterConfig, CategoryObservation,
    ConfigurationError, DefaultFilterConfig, EvaluationError, FilterSet, MeasurementSeries,
    default_window_days, finite_reading, numeric, validate_window,
};
use serde::{Deserialize, Serialize};

/// Parameters for [`CategoricalFilterThreshold`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalFilterConfig {
    /// Named filters; each label may belong to one filter only.
    pub filters: Vec<CategoryFilterConfig>,
    /// Rule for labels no filter claims.
    #[serde(default)]
    pub default_filter: Option<DefaultFilterConfig>,
    /// How observation scores combine into a day score.
    #[serde(default)]
    pub aggregation: AggregationMethod,
    /// Days per evaluation window.
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

/// Categorical filter threshold strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalFilterThreshold {
    config: CategoricalFilterConfig,
    filters: FilterSet,
}

impl CategoricalFilterThreshold {
    /// Validate `config` and build the strategy.
    ///
    /// # Errors
    /// Propagates filter validation failures from [`FilterSet::new`].
    pub fn new(config: CategoricalFilterConfig) -> Result<Self, ConfigurationError> {
        validate_window(config.window_days)?;
        let filters = FilterSet::new(config.filters.clone(), config.default_filter.clone())?;
        log::debug!(
            "built categorical goal: {} filters, {} aggregation{}",
            filters.filters().len(),
            config.aggregation.as_str(),
            if filters.has_default() {
                ", with default"
            } else {
                ""
            }
        );
        Ok(Self { config, filters })
    }

    /// Configuration the strategy was built from.
    #[must_use]
    pub const fn config(&self) -> &CategoricalFilterConfig {
        &self.config
    }

    /// Validated filter set.
    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    fn day_score(
        &self,
        day: usize,
        observations: &[CategoryObservation],
    ) -> Result<f64, EvaluationError> {
        let scored = observations
            .iter()
            .map(|observation| {
                finite_reading(observation.value, day)?;
                self.filters.score(observation)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.config
            .aggregation
            .aggregate(&scored)
            .ok_or(EvaluationError::NoObservations)
    }

    fn day_scores(
        &self,
        series: &MeasurementSeries<Vec<CategoryObservation>>,
    ) -> Result<Vec<f64>, EvaluationError> {
        series
            .iter()
            .enumerate()
            .map(|(day, observations)| self.day_score(day, observations))
            .collect()
    }
}

impl AdherenceScorer for CategoricalFilterThreshold {
    type Observation = Vec<CategoryObservation>;

    fn score(&self, observations: &Vec<CategoryObservation>) -> Result<f64, EvaluationError> {
        self.day_score(0, observations)
    }

    fn weekly_score(
        &self,
        series: &MeasurementSeries<Vec<CategoryObservation>>,
    ) -> Result<f64, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let scores = self.day_scores(series)?;
        Ok(numeric::mean(&scores).unwrap_or(0.0))
    }

    fn progressive_scores(
        &self,
        series: &MeasurementSeries<Vec<CategoryObservation>>,
    ) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.config.window_days)?;
        self.day_scores(series)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.config.clone()).map(|_| ())
    }

    fn describe(&self) -> String {
        format!(
            "categorical filter threshold ({} of observation scores):\n{}",
            self.config.aggregation.as_str(),
            self.filters.describe()
        )
    }

    fn window_days(&self) -> usize {
        self.config.window_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adherence_core::test_support::assert_close;
    use rstest::{fixture, rstest};

    fn filter(name: &str, values: &[&str], threshold: f64, operator: &str) -> CategoryFilterConfig {
        CategoryFilterConfig {
            category_name: name.into(),
            category_values: values.iter().map(|v| (*v).to_owned()).collect(),
            threshold,
            comparison_operator: operator.into(),
            success_value: 100.0,
            failure_value: 0.0,
            weight: 1.0,
        }
    }

    #[fixture]
    fn diet() -> CategoricalFilterConfig {
        CategoricalFilterConfig {
            filters: vec![
                filter("vegetables", &["broccoli", "Spinach"], 2.0, ">="),
                filter("fried", &["chips", "doughnut"], 1.0, "<="),
            ],
            default_filter: None,
            aggregation: AggregationMethod::Average,
            window_days: 7,
        }
    }

    fn observations(items: &[(&str, f64)]) -> Vec<CategoryObservation> {
        items
            .iter()
            .map(|(label, value)| CategoryObservation::new(*label, *value))
            .collect()
    }

    #[rstest]
    fn labels_match_case_insensitively(diet: CategoricalFilterConfig) {
        let goal = CategoricalFilterThreshold::new(diet).expect("valid config");
        let day = observations(&[("SPINACH", 3.0), ("Chips", 0.0)]);
        assert_eq!(goal.score(&day), Ok(100.0));
    }

    #[rstest]
    #[case(AggregationMethod::Average, 50.0)]
    #[case(AggregationMethod::Minimum, 0.0)]
    #[case(AggregationMethod::Maximum, 100.0)]
    fn aggregation_combines_observations(
        mut diet: CategoricalFilterConfig,
        #[case] aggregation: AggregationMethod,
        #[case] expected: f64,
    ) {
        diet.aggregation = aggregation;
        let goal = CategoricalFilterThreshold::new(diet).expect("valid config");
        let day = observations(&[("broccoli", 2.0), ("doughnut", 2.0)]);
        assert_eq!(goal.score(&day), Ok(expected));
    }

    #[rstest]
    fn weighted_average_uses_filter_weights(mut diet: CategoricalFilterConfig) {
        diet.aggregation = AggregationMethod::WeightedAverage;
        if let Some(first) = diet.filters.first_mut() {
            first.weight = 3.0;
        }
        let goal = CategoricalFilterThreshold::new(diet).expect("valid config");
        let day = observations(&[("broccoli", 2.0), ("doughnut", 2.0)]);
        assert_eq!(goal.score(&day), Ok(75.0));
    }

    #[rstest]
    fn unmapped_label_without_default_is_an_error(diet: CategoricalFilterConfig) {
        let goal = CategoricalFilterThreshold::new(diet).expect("valid config");
        let day = observations(&[("cake", 1.0)]);
        assert_eq!(
            goal.score(&day),
            Err(EvaluationError::UnmappedCategory {
                category: "cake".into()
            })
        );
    }

    #[rstest]
    fn unmapped_label_uses_default(mut diet: CategoricalFilterConfig) {
        diet.default_filter = Some(DefaultFilterConfig {
            threshold: 1.0,
            comparison_operator: "<=".into(),
            success_value: 100.0,
            failure_value: 0.0,
        });
        let goal = CategoricalFilterThreshold::new(diet).expect("valid config");
        assert_eq!(goal.score(&observations(&[("cake", 1.0)])), Ok(100.0));
        assert_eq!(goal.score(&observations(&[("cake", 3.0)])), Ok(0.0));
    }

    #[rstest]
    fn empty_day_is_an_error(diet: CategoricalFilterConfig) {
        let goal = CategoricalFilterThreshold::new(diet).expect("valid config");
        assert_eq!(goal.score(&Vec::new()), Err(EvaluationError::NoObservations));
    }

    #[rstest]
    fn weekly_score_averages_days(diet: CategoricalFilterConfig) {
        let goal = CategoricalFilterThreshold::new(diet).expect("valid config");
        let good = observations(&[("broccoli", 2.0)]);
        let bad = observations(&[("chips", 4.0)]);
        let series = MeasurementSeries::new(vec![
            good.clone(),
            good.clone(),
            good.clone(),
            good.clone(),
            bad.clone(),
            bad,
            good,
        ]);
        let weekly = goal.weekly_score(&series).expect("full week");
        assert_close(weekly, numeric::percentage_of(500.0, 700.0));
    }

    #[rstest]
    fn rejects_overlapping_filters(mut diet: CategoricalFilterConfig) {
        diet.filters
            .push(filter("greens", &["broccoli"], 1.0, ">="));
        let err = CategoricalFilterThreshold::new(diet).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::OverlappingCategories {
                value: "broccoli".into(),
                first: "vegetables".into(),
                second: "greens".into()
            }
        );
    }
}
