//! Category filters for goals that judge different foods, drinks, or
//! activities against their own thresholds.
//!
//! Labels are matched case-insensitively. Each label may belong to at most
//! one filter; ambiguous configurations are rejected at construction rather
//! than resolved by a runtime tie-break.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::component::score_parameter;
use crate::{CategoryObservation, ComparisonOperator, ConfigurationError, EvaluationError, numeric};

const fn default_success() -> f64 {
    numeric::FULL_SCORE
}

const fn default_weight() -> f64 {
    1.0
}

/// Category filter record as it appears in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryFilterConfig {
    /// Filter name, e.g. `"vegetables"`.
    pub category_name: String,
    /// Labels this filter claims.
    pub category_values: Vec<String>,
    /// Threshold compared against each observation's value.
    pub threshold: f64,
    /// Comparison operator string.
    pub comparison_operator: String,
    /// Score when the comparison holds.
    #[serde(default = "default_success")]
    pub success_value: f64,
    /// Score otherwise.
    #[serde(default)]
    pub failure_value: f64,
    /// Weight used by weighted-average aggregation.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// Fallback applied to labels no filter claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultFilterConfig {
    /// Threshold compared against the observation's value.
    pub threshold: f64,
    /// Comparison operator string.
    pub comparison_operator: String,
    /// Score when the comparison holds.
    #[serde(default = "default_success")]
    pub success_value: f64,
    /// Score otherwise.
    #[serde(default)]
    pub failure_value: f64,
}

/// How a day's per-observation scores combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    /// Mean weighted by each matched filter's weight.
    #[default]
    WeightedAverage,
    /// Unweighted mean.
    Average,
    /// Worst observation.
    Minimum,
    /// Best observation.
    Maximum,
}

impl AggregationMethod {
    /// Return the method as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightedAverage => "weighted_average",
            Self::Average => "average",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
        }
    }

    /// Combine `(score, weight)` pairs, or `None` when there are none.
    #[must_use]
    pub fn aggregate(self, scored: &[(f64, f64)]) -> Option<f64> {
        let scores = scored.iter().map(|&(score, _)| score);
        match self {
            Self::WeightedAverage => numeric::weighted_mean(scored.iter().copied()),
            Self::Average => numeric::mean(&scores.collect::<Vec<_>>()),
            Self::Minimum => scores.reduce(f64::min),
            Self::Maximum => scores.reduce(f64::max),
        }
    }
}

/// A threshold rule shared by named filters and the default fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRule {
    threshold: f64,
    operator: ComparisonOperator,
    success_value: f64,
    failure_value: f64,
}

impl ThresholdRule {
    fn new(
        threshold: f64,
        operator: &str,
        success_value: f64,
        failure_value: f64,
    ) -> Result<Self, ConfigurationError> {
        if !threshold.is_finite() {
            return Err(ConfigurationError::NonFinite {
                field: "threshold",
                value: threshold,
            });
        }
        Ok(Self {
            threshold,
            operator: operator.parse()?,
            success_value: score_parameter("success_value", success_value)?,
            failure_value: score_parameter("failure_value", failure_value)?,
        })
    }

    /// Score a value against the rule.
    #[must_use]
    pub fn score(&self, value: f64) -> f64 {
        if self.operator.compare(value, self.threshold) {
            self.success_value
        } else {
            self.failure_value
        }
    }

    fn describe(&self) -> String {
        format!(
            "{} {} ({}/{})",
            self.operator, self.threshold, self.success_value, self.failure_value
        )
    }
}

/// A validated, named category filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFilter {
    category_name: String,
    category_values: BTreeSet<String>,
    rule: ThresholdRule,
    weight: f64,
}

impl CategoryFilter {
    /// Validate a filter record.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Empty`] when no labels are listed,
    /// [`ConfigurationError::InvalidWeight`] for a non-positive weight, and
    /// propagates operator and threshold failures.
    pub fn new(config: CategoryFilterConfig) -> Result<Self, ConfigurationError> {
        let category_values: BTreeSet<String> = config
            .category_values
            .iter()
            .map(|value| normalise_label(value))
            .filter(|value| !value.is_empty())
            .collect();
        if category_values.is_empty() {
            return Err(ConfigurationError::Empty {
                what: "category_values",
            });
        }
        if !config.weight.is_finite() || config.weight <= 0.0 {
            return Err(ConfigurationError::InvalidWeight {
                name: config.category_name,
                weight: config.weight,
            });
        }
        let rule = ThresholdRule::new(
            config.threshold,
            &config.comparison_operator,
            config.success_value,
            config.failure_value,
        )?;
        Ok(Self {
            category_name: config.category_name,
            category_values,
            rule,
            weight: config.weight,
        })
    }

    /// Filter name.
    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Normalised labels this filter claims.
    #[must_use]
    pub const fn category_values(&self) -> &BTreeSet<String> {
        &self.category_values
    }

    /// Aggregation weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Report whether the filter claims `label`.
    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        self.category_values.contains(&normalise_label(label))
    }

    /// Score a value against the filter's rule.
    #[must_use]
    pub fn score(&self, value: f64) -> f64 {
        self.rule.score(value)
    }
}

/// Filters plus the optional fallback, validated for unambiguous matching.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSet {
    filters: Vec<CategoryFilter>,
    index: BTreeMap<String, usize>,
    default: Option<ThresholdRule>,
}

impl FilterSet {
    /// Validate filters and the optional default.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Empty`] when no filters are supplied,
    /// [`ConfigurationError::OverlappingCategories`] when two filters claim
    /// the same label, [`ConfigurationError::Duplicate`] for repeated filter
    /// names, and propagates per-filter failures.
    pub fn new(
        filters: Vec<CategoryFilterConfig>,
        default: Option<DefaultFilterConfig>,
    ) -> Result<Self, ConfigurationError> {
        if filters.is_empty() {
            return Err(ConfigurationError::Empty { what: "filters" });
        }
        let validated = filters
            .into_iter()
            .map(CategoryFilter::new)
            .collect::<Result<Vec<_>, _>>()?;
        let mut names = BTreeSet::new();
        let mut index = BTreeMap::new();
        for (position, filter) in validated.iter().enumerate() {
            if !names.insert(filter.category_name.as_str()) {
                return Err(ConfigurationError::Duplicate {
                    what: "category filter",
                    name: filter.category_name.clone(),
                });
            }
            for value in &filter.category_values {
                if let Some(&first) = index.get(value) {
                    let first_name = validated
                        .get(first)
                        .map_or_else(String::new, |f: &CategoryFilter| f.category_name.clone());
                    return Err(ConfigurationError::OverlappingCategories {
                        value: value.clone(),
                        first: first_name,
                        second: filter.category_name.clone(),
                    });
                }
                index.insert(value.clone(), position);
            }
        }
        let fallback = default
            .map(|config| {
                ThresholdRule::new(
                    config.threshold,
                    &config.comparison_operator,
                    config.success_value,
                    config.failure_value,
                )
            })
            .transpose()?;
        Ok(Self {
            filters: validated,
            index,
            default: fallback,
        })
    }

    /// Validated filters in configuration order.
    #[must_use]
    pub fn filters(&self) -> &[CategoryFilter] {
        &self.filters
    }

    /// Report whether unmatched labels fall back to a default rule.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Find the filter claiming `label`.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<&CategoryFilter> {
        self.index
            .get(&normalise_label(label))
            .and_then(|&position| self.filters.get(position))
    }

    /// Score one observation, returning `(score, weight)`.
    ///
    /// # Errors
    /// Returns [`EvaluationError::UnmappedCategory`] when no filter claims
    /// the label and no default is configured.
    pub fn score(&self, observation: &CategoryObservation) -> Result<(f64, f64), EvaluationError> {
        self.find(&observation.category)
            .map(|filter| (filter.score(observation.value), filter.weight))
            .or_else(|| {
                self.default
                    .as_ref()
                    .map(|rule| (rule.score(observation.value), 1.0))
            })
            .ok_or_else(|| EvaluationError::UnmappedCategory {
                category: observation.category.clone(),
            })
    }

    /// One line per filter, for audit output.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut lines: Vec<String> = self
            .filters
            .iter()
            .map(|filter| {
                let values: Vec<&str> =
                    filter.category_values.iter().map(String::as_str).collect();
                format!(
                    "  {} {{{}}} weight {}: {}",
                    filter.category_name,
                    values.join(", "),
                    filter.weight,
                    filter.rule.describe()
                )
            })
            .collect();
        if let Some(rule) = &self.default {
            lines.push(format!("  default weight 1: {}", rule.describe()));
        }
        lines.join("\n")
    }
}

/// Normalise a category label for matching.
#[must_use]
pub fn normalise_label(label: &str) -> String {
    label.trim().to_lowercase()
}
