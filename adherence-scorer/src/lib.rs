//! Adherence scoring strategies.
//!
//! Nine strategies cover the common shapes of health goals:
//! - **Binary threshold**: pass or fail against one threshold, with
//!   "N compliant days" limits for `<=`/`<` goals.
//! - **Proportional**: percentage of a daily or weekly-cumulative target.
//! - **Proportional frequency hybrid**: mean of the best N days.
//! - **Minimum frequency**: at least N passing days.
//! - **Weekly elimination**: any violation fails the rest of the period.
//! - **Zone based**: banded scores for "sweet spot" goals.
//! - **Composite weighted**: weighted combination of sub-scores.
//! - **Constrained weekly allowance**: weekly usage budget with rollover.
//! - **Categorical filter threshold**: per-category thresholds.
//!
//! Each strategy is built from its serde configuration record and
//! implements [`AdherenceScorer`](adherence_core::AdherenceScorer).
//! [`build_strategy`] turns a tagged [`AlgorithmConfig`] into a [`Strategy`]
//! that accepts untyped observations. Allowance ledgers persist with
//! [`write_ledger_file`] and [`read_ledger_file`].
//!
//! # Examples
//!
//! ```no_run
//! use adherence_core::{MeasurementSeries, WeekId};
//! use adherence_scorer::{
//!     ConstrainedWeeklyAllowance, ConstrainedWeeklyAllowanceConfig, RolloverConfig,
//!     read_ledger_file, write_ledger_file,
//! };
//! use camino::Utf8Path;
//!
//! let path = Utf8Path::new("ledgers/drinks.bin");
//! let config = ConstrainedWeeklyAllowanceConfig {
//!     weekly_allowance: 7.0,
//!     max_days_per_week: Some(3),
//!     penalty_for_overage: 25.0,
//!     minimum_usage: None,
//!     rollover: Some(RolloverConfig { max_rollover_percentage: 50.0 }),
//!     failure_value: 0.0,
//!     window_days: 7,
//! };
//! let ledger = read_ledger_file(path).unwrap_or_default();
//! let mut goal = ConstrainedWeeklyAllowance::new(config)
//!     .expect("valid allowance")
//!     .with_ledger(ledger);
//! let week: WeekId = "2025-W14".parse().expect("valid week");
//! let usage = MeasurementSeries::new(vec![0.0, 2.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
//! goal.record_week(week, &usage).expect("score week");
//! write_ledger_file(path, goal.ledger()).expect("persist ledger");
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod allowance;
mod binary;
mod categorical;
mod composite;
mod config;
mod elimination;
mod error;
mod frequency;
mod hybrid;
mod ledger_file;
mod proportional;
mod strategy;
mod zone;

#[cfg(test)]
mod tests;

pub use allowance::{
    ConstrainedWeeklyAllowance, ConstrainedWeeklyAllowanceConfig, MINIMUM_USAGE_PENALTY,
    RolloverConfig,
};
pub use binary::{BinaryThreshold, BinaryThresholdConfig};
pub use categorical::{CategoricalFilterConfig, CategoricalFilterThreshold};
pub use composite::{CompositeWeighted, CompositeWeightedConfig};
pub use config::{AlgorithmConfig, AlgorithmType};
pub use elimination::{WeeklyElimination, WeeklyEliminationConfig};
pub use error::LedgerFileError;
pub use frequency::{MinimumFrequency, MinimumFrequencyConfig};
pub use hybrid::{ProportionalFrequencyHybrid, ProportionalFrequencyHybridConfig};
pub use ledger_file::{read_ledger_file, write_ledger_file};
pub use proportional::{Proportional, ProportionalConfig};
pub use strategy::{Strategy, build_strategy, numeric_reading, numeric_series};
pub use zone::{FrequencyTarget, ZoneBased, ZoneBasedConfig};

/// Bincode options used for ledger files.
pub(crate) fn bincode_options() -> impl bincode::Options {
    bincode::DefaultOptions::new()
}

/// Public helper exposing the bincode configuration used for ledger files.
#[must_use]
pub fn ledger_bincode_options() -> impl bincode::Options {
    bincode_options()
}
