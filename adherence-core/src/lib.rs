//! Core domain types for the adherence engine.
//!
//! Health goals such as "walk 10,000 steps", "no more than two drinks a
//! day", or "sleep between seven and nine hours" are scored by strategies
//! implementing [`AdherenceScorer`]. This crate holds the shared pieces:
//! measurement series and observation shapes, comparison operators, zones,
//! composite components, category filters, the achievability calculation
//! behind progressive scoring, and the weekly allowance ledger.
//!
//! Constructors validate eagerly and return [`ConfigurationError`]; scoring
//! calls return [`EvaluationError`] for data they cannot score.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod achievability;
mod category;
mod component;
mod error;
mod ledger;
pub mod numeric;
mod operator;
mod period;
mod scorer;
mod series;
mod threshold;
mod zone;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use achievability::{Achievability, FrequencyGoal};
pub use category::{
    AggregationMethod, CategoryFilter, CategoryFilterConfig, DefaultFilterConfig, FilterSet,
    ThresholdRule, normalise_label,
};
pub use component::{Component, ComponentConfig, ComponentParameters, ComponentScoring};
pub use error::{ConfigurationError, EvaluationError};
pub use ledger::{LedgerEntry, WeekId, WeeklyAllowanceLedger, weeks_in_year};
pub use operator::{ComparisonOperator, EQUALITY_TOLERANCE};
pub use period::{CalculationMethod, EvaluationPeriod};
pub use scorer::AdherenceScorer;
pub use series::{
    CategoryObservation, ComponentValues, DEFAULT_WINDOW_DAYS, MeasurementSeries, Observation,
    default_window_days, finite_reading, validate_window,
};
pub use threshold::{ThresholdValue, parse_time_of_day};
pub use zone::{ALLOWED_ZONE_COUNTS, GRADUATED_FLOOR, Zone, ZoneSet};
