//! Facade crate for the adherence scoring engine.
//!
//! This crate re-exports the core domain types and, behind the default
//! `strategies` feature, the nine scoring strategies and their factory.

#![forbid(unsafe_code)]

pub use adherence_core::{
    Achievability, AdherenceScorer, AggregationMethod, CalculationMethod, CategoryObservation,
    ComparisonOperator, ComponentValues, ConfigurationError, EvaluationError, EvaluationPeriod,
    FrequencyGoal, LedgerEntry, MeasurementSeries, Observation, ThresholdValue, WeekId,
    WeeklyAllowanceLedger, Zone, ZoneSet,
};

#[cfg(feature = "strategies")]
pub use adherence_scorer::{
    AlgorithmConfig, AlgorithmType, LedgerFileError, Strategy, build_strategy, read_ledger_file,
    write_ledger_file,
};
