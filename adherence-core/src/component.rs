//! Weighted sub-scorers used by composite goals.
//!
//! Each component reads one field of the day's observation and scores it
//! with an inline method: proportional, binary, or zone-based.

use serde::{Deserialize, Serialize};

use crate::{ComparisonOperator, ConfigurationError, Zone, ZoneSet, numeric};

/// Component record as it appears in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentConfig {
    /// Unique component name.
    pub name: String,
    /// Relative weight; normalised against the other components.
    pub weight: f64,
    /// Target value for proportional scoring, default threshold otherwise.
    pub target: f64,
    /// Unit of the measured field, informational only.
    #[serde(default)]
    pub unit: String,
    /// `"proportional"`, `"binary"`, or `"zone"`.
    pub scoring_method: String,
    /// Field read from the day's values; defaults to `name`.
    #[serde(default)]
    pub field_name: Option<String>,
    /// Method-specific parameters.
    #[serde(default)]
    pub parameters: ComponentParameters,
}

/// Optional parameters consumed by the component scoring methods.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentParameters {
    /// Comparison operator for binary scoring (default `>=`).
    #[serde(default)]
    pub operator: Option<String>,
    /// Binary threshold; defaults to the component target.
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Binary success score (default 100).
    #[serde(default)]
    pub success_value: Option<f64>,
    /// Binary failure score (default 0).
    #[serde(default)]
    pub failure_value: Option<f64>,
    /// Proportional cap (default 100).
    #[serde(default)]
    pub maximum_cap: Option<f64>,
    /// Zones for zone scoring.
    #[serde(default)]
    pub zones: Option<Vec<Zone>>,
    /// Whether zone scoring uses graduated boundaries.
    #[serde(default)]
    pub graduated: bool,
}

/// Validated scoring method for a component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentScoring {
    /// `min(value / target × 100, maximum_cap)`, floored at zero.
    Proportional {
        /// Upper bound on the component score.
        maximum_cap: f64,
    },
    /// Success or failure score depending on a threshold comparison.
    Binary {
        /// Relation the value must hold.
        operator: ComparisonOperator,
        /// Threshold compared against.
        threshold: f64,
        /// Score when the relation holds.
        success_value: f64,
        /// Score otherwise.
        failure_value: f64,
    },
    /// Score of the zone containing the value.
    Zone {
        /// Validated zone set.
        zones: ZoneSet,
        /// Whether to nudge scores by position within the zone.
        graduated: bool,
    },
}

impl ComponentScoring {
    /// Name of the method as written in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Proportional { .. } => "proportional",
            Self::Binary { .. } => "binary",
            Self::Zone { .. } => "zone",
        }
    }
}

/// A named, weighted sub-scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: String,
    weight: f64,
    target: f64,
    unit: String,
    field_name: String,
    scoring: ComponentScoring,
}

impl Component {
    /// Validate a component record.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidWeight`] for a non-positive
    /// weight, [`ConfigurationError::NonPositive`] for a non-positive
    /// proportional target, [`ConfigurationError::Negative`] for a negative
    /// binary score, [`ConfigurationError::UnknownScoringMethod`] or
    /// [`ConfigurationError::MissingParameter`] for an unusable method, and
    /// propagates operator and zone validation failures.
    pub fn new(config: ComponentConfig) -> Result<Self, ConfigurationError> {
        if !config.weight.is_finite() || config.weight <= 0.0 {
            return Err(ConfigurationError::InvalidWeight {
                name: config.name,
                weight: config.weight,
            });
        }
        if !config.target.is_finite() {
            return Err(ConfigurationError::NonFinite {
                field: "target",
                value: config.target,
            });
        }
        let scoring = build_scoring(&config)?;
        let field_name = config.field_name.unwrap_or_else(|| config.name.clone());
        Ok(Self {
            name: config.name,
            weight: config.weight,
            target: config.target,
            unit: config.unit,
            field_name,
            scoring,
        })
    }

    /// Component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Configured target.
    #[must_use]
    pub const fn target(&self) -> f64 {
        self.target
    }

    /// Unit label.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Field read from the day's values.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Validated scoring method.
    #[must_use]
    pub const fn scoring(&self) -> &ComponentScoring {
        &self.scoring
    }

    /// Score a single reading of this component.
    #[must_use]
    pub fn score(&self, value: f64) -> f64 {
        match &self.scoring {
            ComponentScoring::Proportional { maximum_cap } => {
                numeric::percentage_of(value, self.target).clamp(0.0, *maximum_cap)
            }
            ComponentScoring::Binary {
                operator,
                threshold,
                success_value,
                failure_value,
            } => {
                if operator.compare(value, *threshold) {
                    *success_value
                } else {
                    *failure_value
                }
            }
            ComponentScoring::Zone { zones, graduated } => zones.score(value, *graduated),
        }
    }

    /// One-line summary for audit output.
    #[must_use]
    pub fn describe(&self) -> String {
        let method = match &self.scoring {
            ComponentScoring::Proportional { maximum_cap } => format!(
                "proportional to {} {} (cap {maximum_cap})",
                self.target, self.unit
            ),
            ComponentScoring::Binary {
                operator,
                threshold,
                success_value,
                failure_value,
            } => format!(
                "binary {operator} {threshold} {} ({success_value}/{failure_value})",
                self.unit
            ),
            ComponentScoring::Zone { zones, graduated } => format!(
                "zone-based over {} zones{}",
                zones.zones().len(),
                if *graduated { ", graduated" } else { "" }
            ),
        };
        format!(
            "{} [{}] weight {}: {method}",
            self.name, self.field_name, self.weight
        )
    }
}

fn build_scoring(config: &ComponentConfig) -> Result<ComponentScoring, ConfigurationError> {
    let params = &config.parameters;
    match config.scoring_method.trim().to_lowercase().as_str() {
        "proportional" => {
            if config.target <= 0.0 {
                return Err(ConfigurationError::NonPositive {
                    field: "target",
                    value: config.target,
                });
            }
            let maximum_cap = params.maximum_cap.unwrap_or(numeric::FULL_SCORE);
            if !maximum_cap.is_finite() || maximum_cap < 0.0 {
                return Err(ConfigurationError::CapBelowFloor {
                    cap: maximum_cap,
                    floor: 0.0,
                });
            }
            Ok(ComponentScoring::Proportional { maximum_cap })
        }
        "binary" => {
            let operator = params
                .operator
                .as_deref()
                .map_or(Ok(ComparisonOperator::GreaterOrEqual), str::parse)?;
            Ok(ComponentScoring::Binary {
                operator,
                threshold: params.threshold.unwrap_or(config.target),
                success_value: score_parameter(
                    "success_value",
                    params.success_value.unwrap_or(numeric::FULL_SCORE),
                )?,
                failure_value: score_parameter(
                    "failure_value",
                    params.failure_value.unwrap_or(0.0),
                )?,
            })
        }
        "zone" | "zone_based" => {
            let zones = params
                .zones
                .clone()
                .ok_or_else(|| ConfigurationError::MissingParameter {
                    component: config.name.clone(),
                    parameter: "zones",
                })?;
            Ok(ComponentScoring::Zone {
                zones: ZoneSet::new(zones)?,
                graduated: params.graduated,
            })
        }
        _ => Err(ConfigurationError::UnknownScoringMethod {
            component: config.name.clone(),
            method: config.scoring_method.clone(),
        }),
    }
}

/// Reject NaN, infinite and negative score values.
pub(crate) fn score_parameter(field: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(ConfigurationError::Negative { field, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::assert_close;
    use rstest::rstest;

    fn config(method: &str) -> ComponentConfig {
        ComponentConfig {
            name: "sleep".into(),
            weight: 2.0,
            target: 8.0,
            unit: "hours".into(),
            scoring_method: method.into(),
            field_name: None,
            parameters: ComponentParameters::default(),
        }
    }

    #[rstest]
    #[case(4.0, 50.0)]
    #[case(8.0, 100.0)]
    #[case(12.0, 100.0)]
    #[case(-1.0, 0.0)]
    fn proportional_component_caps_score(#[case] value: f64, #[case] expected: f64) {
        let component = Component::new(config("proportional")).expect("valid component");
        assert_close(component.score(value), expected);
        assert_eq!(component.field_name(), "sleep");
    }

    #[test]
    fn binary_component_defaults_threshold_to_target() {
        let component = Component::new(config("binary")).expect("valid component");
        assert_close(component.score(8.0), 100.0);
        assert_close(component.score(7.9), 0.0);
    }

    #[test]
    fn zone_component_requires_zones() {
        let err = Component::new(config("zone")).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingParameter {
                component: "sleep".into(),
                parameter: "zones",
            }
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn rejects_unusable_weights(#[case] weight: f64) {
        let mut record = config("proportional");
        record.weight = weight;
        let err = Component::new(record).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidWeight { .. }));
    }

    #[test]
    fn rejects_negative_binary_scores() {
        let mut record = config("binary");
        record.parameters.failure_value = Some(-25.0);
        assert_eq!(
            Component::new(record),
            Err(ConfigurationError::Negative {
                field: "failure_value",
                value: -25.0
            })
        );
    }

    #[test]
    fn rejects_unknown_method() {
        let err = Component::new(config("logarithmic")).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownScoringMethod { .. }));
    }

    #[test]
    fn rejects_unknown_operator() {
        let mut record = config("binary");
        record.parameters.operator = Some("~".into());
        let err = Component::new(record).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownOperator { .. }));
    }

    #[test]
    fn describe_names_method_and_field() {
        let mut record = config("proportional");
        record.field_name = Some("sleep_hours".into());
        let component = Component::new(record).expect("valid component");
        let text = component.describe();
        assert!(text.contains("sleep [sleep_hours]"));
        assert!(text.contains("proportional"));
    }
}
