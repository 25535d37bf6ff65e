//! Factory and configuration-loading coverage.
#![forbid(unsafe_code)]

use adherence_core::{
    AdherenceScorer, CategoryObservation, ComponentValues, ConfigurationError, EvaluationError,
    MeasurementSeries, Observation, test_support::assert_scores_close,
};
use rstest::rstest;

use crate::{AlgorithmConfig, AlgorithmType, Strategy, build_strategy};

fn strategy(json: &str) -> Strategy {
    let config: AlgorithmConfig = serde_json::from_str(json).expect("parse config");
    build_strategy(config).expect("valid config")
}

fn numeric(values: &[f64]) -> MeasurementSeries<Observation> {
    values.iter().copied().map(Observation::Value).collect()
}

#[rstest]
#[case(r#"{"algorithm_type": "binary_threshold", "threshold": 10000, "operator": ">="}"#, AlgorithmType::BinaryThreshold)]
#[case(r#"{"algorithm_type": "proportional", "target": 8}"#, AlgorithmType::Proportional)]
#[case(
    r#"{"algorithm_type": "proportional_frequency_hybrid", "daily_target": 5000, "required_qualifying_days": 3}"#,
    AlgorithmType::ProportionalFrequencyHybrid
)]
#[case(
    r#"{"algorithm_type": "minimum_frequency", "daily_threshold": "22:30", "daily_comparison": "<=", "required_days": 5}"#,
    AlgorithmType::MinimumFrequency
)]
#[case(
    r#"{"algorithm_type": "weekly_elimination", "elimination_threshold": 0, "elimination_comparison": "=="}"#,
    AlgorithmType::WeeklyElimination
)]
#[case(
    r#"{"algorithm_type": "zone_based", "zones": [
        {"min": 0, "max": 6, "score": 40, "label": "short"},
        {"min": 6, "max": 9, "score": 100, "label": "optimal"},
        {"min": 9, "max": 14, "score": 60, "label": "long"}
    ]}"#,
    AlgorithmType::ZoneBased
)]
#[case(
    r#"{"algorithm_type": "composite_weighted", "components": [
        {"name": "protein", "weight": 2, "target": 120, "scoring_method": "proportional"},
        {"name": "fibre", "weight": 1, "target": 30, "scoring_method": "binary"}
    ]}"#,
    AlgorithmType::CompositeWeighted
)]
#[case(
    r#"{"algorithm_type": "constrained_weekly_allowance", "weekly_allowance": 7, "max_days_per_week": 3}"#,
    AlgorithmType::ConstrainedWeeklyAllowance
)]
#[case(
    r#"{"algorithm_type": "categorical_filter_threshold", "filters": [
        {"category_name": "vegetables", "category_values": ["broccoli"], "threshold": 2, "comparison_operator": ">="}
    ]}"#,
    AlgorithmType::CategoricalFilterThreshold
)]
fn builds_every_strategy(#[case] json: &str, #[case] expected: AlgorithmType) {
    let built = strategy(json);
    assert_eq!(built.algorithm_type(), expected);
    assert_eq!(built.window_days(), 7);
    assert!(built.validate().is_ok());
    assert!(!built.describe().is_empty());
}

#[rstest]
fn limit_without_required_days_is_rejected() {
    let config: AlgorithmConfig = serde_json::from_str(
        r#"{"algorithm_type": "binary_threshold", "threshold": 200, "operator": "<="}"#,
    )
    .expect("parse config");
    let err = build_strategy(config).unwrap_err();
    assert!(matches!(err, ConfigurationError::MissingRequiredDays { .. }));
}

#[rstest]
fn unknown_operator_is_rejected() {
    let config: AlgorithmConfig = serde_json::from_str(
        r#"{"algorithm_type": "binary_threshold", "threshold": 1, "operator": "=>"}"#,
    )
    .expect("parse config");
    assert_eq!(
        Strategy::try_from(config),
        Err(ConfigurationError::UnknownOperator {
            operator: "=>".into()
        })
    );
}

#[rstest]
#[case(
    r#"{"algorithm_type": "binary_threshold", "threshold": 1, "operator": ">=", "failure_value": -10}"#,
    "failure_value"
)]
#[case(
    r#"{"algorithm_type": "proportional", "target": 8, "minimum_threshold": -5}"#,
    "minimum_threshold"
)]
#[case(
    r#"{"algorithm_type": "proportional_frequency_hybrid", "daily_target": 5000, "required_qualifying_days": 3, "minimum_score": -1}"#,
    "minimum_score"
)]
#[case(
    r#"{"algorithm_type": "minimum_frequency", "daily_threshold": 8, "daily_comparison": ">=", "required_days": 5, "success_value": -100}"#,
    "success_value"
)]
#[case(
    r#"{"algorithm_type": "weekly_elimination", "elimination_threshold": 0, "elimination_comparison": "==", "failure_value": -20}"#,
    "failure_value"
)]
#[case(
    r#"{"algorithm_type": "zone_based", "zones": [
        {"min": 0, "max": 6, "score": 40, "label": "short"},
        {"min": 6, "max": 9, "score": 100, "label": "optimal"},
        {"min": 9, "max": 14, "score": 60, "label": "long"}
    ], "frequency_target": {"required_days": 5, "qualifying_score": -1}}"#,
    "qualifying_score"
)]
#[case(
    r#"{"algorithm_type": "composite_weighted", "minimum_threshold": -1, "components": [
        {"name": "protein", "weight": 2, "target": 120, "scoring_method": "proportional"}
    ]}"#,
    "minimum_threshold"
)]
#[case(
    r#"{"algorithm_type": "constrained_weekly_allowance", "weekly_allowance": 7, "max_days_per_week": 3, "failure_value": -50}"#,
    "failure_value"
)]
fn negative_score_parameters_are_rejected(#[case] json: &str, #[case] field: &str) {
    let config: AlgorithmConfig = serde_json::from_str(json).expect("parse config");
    match build_strategy(config) {
        Err(ConfigurationError::Negative { field: rejected, value }) => {
            assert_eq!(rejected, field);
            assert!(value < 0.0);
        }
        other => panic!("expected a negative-parameter error, found {other:?}"),
    }
}

#[rstest]
fn flags_feed_binary_goals() {
    let goal = strategy(r#"{"algorithm_type": "binary_threshold", "threshold": 1, "operator": ">="}"#);
    let series: MeasurementSeries<Observation> = [true, false, true, true, false, true, true]
        .into_iter()
        .map(Observation::Flag)
        .collect();
    let scores = goal.progressive_scores(&series).expect("flags are numeric");
    assert_scores_close(&scores, &[100.0, 0.0, 100.0, 100.0, 0.0, 100.0, 100.0]);
}

#[rstest]
fn scalar_strategy_rejects_component_maps() {
    let goal = strategy(r#"{"algorithm_type": "proportional", "target": 8}"#);
    let day = Observation::Components(ComponentValues::new());
    assert_eq!(
        goal.score(&day),
        Err(EvaluationError::UnexpectedObservation {
            expected: "numeric",
            found: "component map"
        })
    );
}

#[rstest]
fn composite_strategy_rejects_numbers() {
    let goal = strategy(
        r#"{"algorithm_type": "composite_weighted", "components": [
            {"name": "protein", "weight": 1, "target": 100, "scoring_method": "proportional"}
        ]}"#,
    );
    assert_eq!(
        goal.weekly_score(&numeric(&[1.0; 7])),
        Err(EvaluationError::UnexpectedObservation {
            expected: "component map",
            found: "numeric"
        })
    );
}

#[rstest]
fn categorical_strategy_scores_untyped_series() {
    let goal = strategy(
        r#"{"algorithm_type": "categorical_filter_threshold", "filters": [
            {"category_name": "vegetables", "category_values": ["broccoli"], "threshold": 2, "comparison_operator": ">="}
        ]}"#,
    );
    let day = Observation::Categories(vec![CategoryObservation::new("Broccoli", 3.0)]);
    let series = MeasurementSeries::new(vec![day; 3]);
    let scores = goal.progressive_scores(&series).expect("category lists");
    assert_scores_close(&scores, &[100.0, 100.0, 100.0]);
}

#[rstest]
fn untyped_observations_deserialise_by_shape() {
    let series: MeasurementSeries<Observation> = serde_json::from_str(
        r#"[true, 3.5, {"protein": 90}, [{"category": "chips", "value": 1}]]"#,
    )
    .expect("parse series");
    let kinds: Vec<&str> = series.iter().map(Observation::kind).collect();
    assert_eq!(
        kinds,
        ["boolean", "numeric", "component map", "category list"]
    );
}

#[rstest]
fn allowance_is_reachable_through_strategy() {
    let mut goal = strategy(
        r#"{"algorithm_type": "constrained_weekly_allowance", "weekly_allowance": 2, "max_days_per_week": 2}"#,
    );
    assert!(goal.as_allowance().is_some());
    assert!(goal.as_allowance_mut().is_some());
    let other = strategy(r#"{"algorithm_type": "proportional", "target": 8}"#);
    assert!(other.as_allowance().is_none());
}

#[rstest]
fn configurations_round_trip_through_json() {
    let config: AlgorithmConfig = serde_json::from_str(
        r#"{"algorithm_type": "weekly_elimination", "elimination_threshold": 4, "elimination_comparison": "<=", "period": "monthly"}"#,
    )
    .expect("parse config");
    let text = serde_json::to_string(&config).expect("serialise config");
    assert!(text.contains(r#""algorithm_type":"weekly_elimination""#));
    let reparsed: AlgorithmConfig = serde_json::from_str(&text).expect("reparse config");
    assert_eq!(reparsed, config);
    let built = build_strategy(reparsed).expect("valid config");
    assert_eq!(built.window_days(), 30);
}
