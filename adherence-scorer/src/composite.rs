//! Multi-metric goals combined by weight.
//!
//! Each day carries a map of field values. Every component scores its own
//! field and the day score is the weighted mean, bounded by the configured
//! floor and cap.

use std::collections::BTreeSet;

use adherence_core::{
    AdherenceScorer, Component, ComponentConfig, ComponentValues, ConfigurationError,
    EvaluationError, MeasurementSeries, default_window_days, numeric, validate_window,
};
use serde::{Deserialize, Serialize};

use crate::config::{full_score, require_finite, require_non_negative};

/// Parameters for [`CompositeWeighted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeightedConfig {
    /// Weighted sub-scorers; at least one is required.
    pub components: Vec<ComponentConfig>,
    /// Lowest day score awarded.
    #[serde(default)]
    pub minimum_threshold: f64,
    /// Highest day score awarded.
    #[serde(default = "full_score")]
    pub maximum_cap: f64,
    /// Days per evaluation window.
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

/// Composite weighted strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeWeighted {
    config: CompositeWeightedConfig,
    components: Vec<Component>,
}

impl CompositeWeighted {
    /// Validate `config` and build the strategy.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Empty`] without components,
    /// [`ConfigurationError::Duplicate`] when two components share a name,
    /// [`ConfigurationError::CapBelowFloor`] for inverted bounds, and
    /// propagates component validation failures.
    pub fn new(config: CompositeWeightedConfig) -> Result<Self, ConfigurationError> {
        validate_window(config.window_days)?;
        if config.components.is_empty() {
            return Err(ConfigurationError::Empty { what: "components" });
        }
        let floor = require_non_negative("minimum_threshold", config.minimum_threshold)?;
        let cap = require_finite("maximum_cap", config.maximum_cap)?;
        if cap < floor {
            return Err(ConfigurationError::CapBelowFloor { cap, floor });
        }
        let components = config
            .components
            .iter()
            .cloned()
            .map(Component::new)
            .collect::<Result<Vec<_>, _>>()?;
        check_unique(&components)?;
        log::debug!(
            "built composite goal with {} components: {}",
            components.len(),
            components
                .iter()
                .map(Component::name)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self { config, components })
    }

    /// Configuration the strategy was built from.
    #[must_use]
    pub const fn config(&self) -> &CompositeWeightedConfig {
        &self.config
    }

    /// Validated components in configuration order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Per-component scores for one day, in configuration order.
    ///
    /// # Errors
    /// Returns [`EvaluationError::MissingComponentField`] when a component's
    /// field is absent and [`EvaluationError::NonFiniteValue`] when it holds
    /// NaN or infinity.
    pub fn component_scores(
        &self,
        day: usize,
        values: &ComponentValues,
    ) -> Result<Vec<(f64, f64)>, EvaluationError> {
        self.components
            .iter()
            .map(|component| {
                let reading = values.get(component.field_name()).ok_or_else(|| {
                    EvaluationError::MissingComponentField {
                        component: component.name().to_owned(),
                        field: component.field_name().to_owned(),
                    }
                })?;
                if !reading.is_finite() {
                    return Err(EvaluationError::NonFiniteValue { day });
                }
                Ok((component.score(*reading), component.weight()))
            })
            .collect()
    }

    fn day_score(&self, day: usize, values: &ComponentValues) -> Result<f64, EvaluationError> {
        let scored = self.component_scores(day, values)?;
        let combined = numeric::weighted_mean(scored).unwrap_or(0.0);
        Ok(combined.clamp(self.config.minimum_threshold, self.config.maximum_cap))
    }

    fn day_scores(
        &self,
        series: &MeasurementSeries<ComponentValues>,
    ) -> Result<Vec<f64>, EvaluationError> {
        series
            .iter()
            .enumerate()
            .map(|(day, values)| self.day_score(day, values))
            .collect()
    }
}

fn check_unique(components: &[Component]) -> Result<(), ConfigurationError> {
    let mut names = BTreeSet::new();
    for component in components {
        if !names.insert(component.name()) {
            return Err(ConfigurationError::Duplicate {
                what: "component",
                name: component.name().to_owned(),
            });
        }
    }
    Ok(())
}

impl AdherenceScorer for CompositeWeighted {
    type Observation = ComponentValues;

    fn score(&self, values: &ComponentValues) -> Result<f64, EvaluationError> {
        self.day_score(0, values)
    }

    fn weekly_score(
        &self,
        series: &MeasurementSeries<ComponentValues>,
    ) -> Result<f64, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let scores = self.day_scores(series)?;
        Ok(numeric::mean(&scores).unwrap_or(0.0))
    }

    fn progressive_scores(
        &self,
        series: &MeasurementSeries<ComponentValues>,
    ) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.config.window_days)?;
        self.day_scores(series)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.config.clone()).map(|_| ())
    }

    fn describe(&self) -> String {
        let mut text = format!(
            "composite weighted: day score bounded to [{}, {}]\n",
            self.config.minimum_threshold, self.config.maximum_cap
        );
        for component in &self.components {
            text.push_str("  ");
            text.push_str(&component.describe());
            text.push('\n');
        }
        text
    }

    fn window_days(&self) -> usize {
        self.config.window_days
    }
}
