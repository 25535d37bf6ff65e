//! Weekly budgets for "treat" goals such as alcohol or desserts.
//!
//! Usage is summed across the week and compared with the allowance. With
//! rollover enabled, unused allowance from the previous week carries over up
//! to a percentage of the base, read from the strategy's own ledger.

use adherence_core::{
    AdherenceScorer, ConfigurationError, EvaluationError, LedgerEntry, MeasurementSeries, WeekId,
    WeeklyAllowanceLedger, default_window_days, finite_reading, numeric, validate_window,
};
use serde::{Deserialize, Serialize};

use crate::config::{require_non_negative, require_positive};

/// Points deducted from the period score when usage falls below
/// `minimum_usage`.
pub const MINIMUM_USAGE_PENALTY: f64 = 20.0;

const fn default_overage_penalty() -> f64 {
    25.0
}

/// Carry-over of unused allowance into the following week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RolloverConfig {
    /// Largest carry-over as a percentage of the base allowance.
    pub max_rollover_percentage: f64,
}

/// Parameters for [`ConstrainedWeeklyAllowance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstrainedWeeklyAllowanceConfig {
    /// Units allowed per week before penalties apply.
    pub weekly_allowance: f64,
    /// Most days with any usage before the week fails outright.
    #[serde(default)]
    pub max_days_per_week: Option<usize>,
    /// Points deducted per unit of overage.
    #[serde(default = "default_overage_penalty")]
    pub penalty_for_overage: f64,
    /// Usage below this level costs [`MINIMUM_USAGE_PENALTY`] points.
    #[serde(default)]
    pub minimum_usage: Option<f64>,
    /// Optional carry-over of unused allowance.
    #[serde(default)]
    pub rollover: Option<RolloverConfig>,
    /// Score when the day limit is exceeded.
    #[serde(default)]
    pub failure_value: f64,
    /// Days per evaluation window.
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

/// Constrained weekly allowance strategy.
///
/// The only stateful strategy: [`ConstrainedWeeklyAllowance::record_week`]
/// writes into the ledger that later weeks read their rollover from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedWeeklyAllowance {
    config: ConstrainedWeeklyAllowanceConfig,
    ledger: WeeklyAllowanceLedger,
}

impl ConstrainedWeeklyAllowance {
    /// Validate `config` and build the strategy with an empty ledger.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::NonPositive`] for an unusable allowance
    /// or penalty, [`ConfigurationError::DaysOutOfRange`] when the day limit
    /// does not fit the window, and
    /// [`ConfigurationError::RolloverPercentage`] for a percentage outside
    /// `0..=100`.
    pub fn new(config: ConstrainedWeeklyAllowanceConfig) -> Result<Self, ConfigurationError> {
        let window = validate_window(config.window_days)?;
        require_positive("weekly_allowance", config.weekly_allowance)?;
        require_non_negative("penalty_for_overage", config.penalty_for_overage)?;
        require_non_negative("failure_value", config.failure_value)?;
        if let Some(minimum) = config.minimum_usage {
            require_non_negative("minimum_usage", minimum)?;
        }
        if let Some(days) = config.max_days_per_week
            && (days == 0 || days > window)
        {
            return Err(ConfigurationError::DaysOutOfRange {
                field: "max_days_per_week",
                value: days,
                window,
            });
        }
        if let Some(rollover) = config.rollover {
            let pct = rollover.max_rollover_percentage;
            if !pct.is_finite() || !(0.0..=numeric::FULL_SCORE).contains(&pct) {
                return Err(ConfigurationError::RolloverPercentage { value: pct });
            }
        }
        log::debug!(
            "built allowance goal: {} units over {window} days{}",
            config.weekly_allowance,
            config
                .rollover
                .map_or_else(String::new, |r| format!(
                    ", rollover up to {}%",
                    r.max_rollover_percentage
                ))
        );
        Ok(Self {
            config,
            ledger: WeeklyAllowanceLedger::new(),
        })
    }

    /// Replace the ledger, typically with one restored from disk.
    #[must_use]
    pub fn with_ledger(mut self, ledger: WeeklyAllowanceLedger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Configuration the strategy was built from.
    #[must_use]
    pub const fn config(&self) -> &ConstrainedWeeklyAllowanceConfig {
        &self.config
    }

    /// Ledger of recorded weeks.
    #[must_use]
    pub const fn ledger(&self) -> &WeeklyAllowanceLedger {
        &self.ledger
    }

    /// Consume the strategy, returning its ledger for persistence.
    #[must_use]
    pub fn into_ledger(self) -> WeeklyAllowanceLedger {
        self.ledger
    }

    /// Allowance available in `week`: the base plus any rollover from the
    /// previous recorded week.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "rollover adds capped leftover allowance to the base"
    )]
    pub fn available_allowance(&self, week: WeekId) -> f64 {
        self.config.weekly_allowance + self.rollover_into(week)
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "leftover allowance and its cap are simple differences and shares"
    )]
    fn rollover_into(&self, week: WeekId) -> f64 {
        let Some(rollover) = self.config.rollover else {
            return 0.0;
        };
        let cap = self.config.weekly_allowance * rollover.max_rollover_percentage
            / numeric::FULL_SCORE;
        self.ledger
            .get(week.previous())
            .map_or(0.0, |prev| (prev.allowance - prev.usage).max(0.0).min(cap))
    }

    /// Score a week against an explicit allowance.
    ///
    /// `apply_minimum` controls whether the minimum-usage deduction applies;
    /// it only makes sense once the whole week is known.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "overage penalties subtract scaled points from full marks"
    )]
    pub fn score_usage(
        &self,
        usage: f64,
        days_used: usize,
        available: f64,
        apply_minimum: bool,
    ) -> f64 {
        if self
            .config
            .max_days_per_week
            .is_some_and(|limit| days_used > limit)
        {
            return self.config.failure_value;
        }
        let over = overage(usage, available);
        let amount = if over > 0.0 {
            numeric::FULL_SCORE - (over * self.config.penalty_for_overage).min(numeric::FULL_SCORE)
        } else {
            numeric::FULL_SCORE
        };
        let short = self
            .config
            .minimum_usage
            .is_some_and(|minimum| usage < minimum);
        if apply_minimum && short {
            (amount - MINIMUM_USAGE_PENALTY).max(0.0)
        } else {
            amount
        }
    }

    fn entry(&self, values: &[f64], available: f64) -> LedgerEntry {
        let (usage, days_used) = tally(values);
        LedgerEntry {
            usage,
            allowance: available,
            overage: overage(usage, available),
            score: self.score_usage(usage, days_used, available, true),
            days_used,
        }
    }

    fn progressive_with(&self, values: &[f64], available: f64) -> Vec<f64> {
        let complete = values.len() == self.config.window_days;
        let mut usage = 0.0_f64;
        let mut days_used = 0_usize;
        values
            .iter()
            .enumerate()
            .map(|(day, value)| {
                usage = accumulate(usage, *value);
                days_used += usize::from(*value > 0.0);
                let last = complete && day + 1 == values.len();
                self.score_usage(usage, days_used, available, last)
            })
            .collect()
    }

    /// Period score for `week`, including rollover from the ledger.
    ///
    /// # Errors
    /// Returns [`EvaluationError::WindowMismatch`] unless the series covers
    /// the whole window, or [`EvaluationError::NonFiniteValue`].
    pub fn weekly_score_for(
        &self,
        series: &MeasurementSeries,
        week: WeekId,
    ) -> Result<f64, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let values = series.finite_values()?;
        Ok(self.entry(values, self.available_allowance(week)).score)
    }

    /// Progressive scores for `week`, including rollover from the ledger.
    ///
    /// # Errors
    /// Returns [`EvaluationError::SeriesTooLong`] when the series runs past
    /// the window, or [`EvaluationError::NonFiniteValue`].
    pub fn progressive_scores_for(
        &self,
        series: &MeasurementSeries,
        week: WeekId,
    ) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.config.window_days)?;
        let values = series.finite_values()?;
        Ok(self.progressive_with(values, self.available_allowance(week)))
    }

    /// Evaluate `week` and store the outcome in the ledger, replacing any
    /// earlier entry for the same week.
    ///
    /// # Errors
    /// Returns [`EvaluationError::WindowMismatch`] unless the series covers
    /// the whole window, or [`EvaluationError::NonFiniteValue`].
    pub fn record_week(
        &mut self,
        week: WeekId,
        series: &MeasurementSeries,
    ) -> Result<LedgerEntry, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let values = series.finite_values()?;
        let entry = self.entry(values, self.available_allowance(week));
        let replaced = self.ledger.insert(week, entry);
        log::debug!(
            "recorded {week}: usage {} of {} on {} days, score {}{}",
            entry.usage,
            entry.allowance,
            entry.days_used,
            entry.score,
            if replaced.is_some() { " (replaced)" } else { "" }
        );
        Ok(entry)
    }
}

fn tally(values: &[f64]) -> (f64, usize) {
    let usage = values.iter().sum::<f64>();
    let days_used = values.iter().filter(|value| **value > 0.0).count();
    (usage, days_used)
}

#[expect(clippy::float_arithmetic, reason = "running usage total")]
fn accumulate(total: f64, value: f64) -> f64 {
    total + value
}

#[expect(clippy::float_arithmetic, reason = "overage is usage beyond allowance")]
fn overage(usage: f64, available: f64) -> f64 {
    (usage - available).max(0.0)
}

impl AdherenceScorer for ConstrainedWeeklyAllowance {
    type Observation = f64;

    fn score(&self, value: &f64) -> Result<f64, EvaluationError> {
        let usage = finite_reading(*value, 0)?;
        Ok(self.score_usage(
            usage,
            usize::from(usage > 0.0),
            self.config.weekly_allowance,
            false,
        ))
    }

    fn weekly_score(&self, series: &MeasurementSeries) -> Result<f64, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let values = series.finite_values()?;
        Ok(self.entry(values, self.config.weekly_allowance).score)
    }

    fn progressive_scores(&self, series: &MeasurementSeries) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.config.window_days)?;
        let values = series.finite_values()?;
        Ok(self.progressive_with(values, self.config.weekly_allowance))
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.config.clone()).map(|_| ())
    }

    fn describe(&self) -> String {
        let mut text = format!(
            "constrained weekly allowance: {} units per {} days, {} points off per unit over",
            self.config.weekly_allowance, self.config.window_days, self.config.penalty_for_overage
        );
        if let Some(days) = self.config.max_days_per_week {
            text.push_str(&format!(
                "; more than {days} days of use scores {}",
                self.config.failure_value
            ));
        }
        if let Some(minimum) = self.config.minimum_usage {
            text.push_str(&format!(
                "; usage below {minimum} costs {MINIMUM_USAGE_PENALTY} points"
            ));
        }
        if let Some(rollover) = self.config.rollover {
            text.push_str(&format!(
                "; up to {}% of unused allowance rolls over",
                rollover.max_rollover_percentage
            ));
        }
        text
    }

    fn window_days(&self) -> usize {
        self.config.window_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adherence_core::test_support::{assert_close, assert_scores_close, constant_week, week};
    use rstest::{fixture, rstest};

    #[fixture]
    fn drinks() -> ConstrainedWeeklyAllowanceConfig {
        ConstrainedWeeklyAllowanceConfig {
            weekly_allowance: 2.0,
            max_days_per_week: Some(2),
            penalty_for_overage: 25.0,
            minimum_usage: None,
            rollover: None,
            failure_value: 0.0,
            window_days: 7,
        }
    }

    fn week_id(week: u32) -> WeekId {
        WeekId::new(2025, week).expect("valid week")
    }

    #[rstest]
    fn too_many_days_fail_outright(drinks: ConstrainedWeeklyAllowanceConfig) {
        let goal = ConstrainedWeeklyAllowance::new(drinks).expect("valid config");
        let series = week(&[0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        assert_eq!(goal.weekly_score(&series), Ok(0.0));
    }

    #[rstest]
    #[case(&[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0], 100.0)]
    #[case(&[0.0, 2.0, 0.0, 1.0, 0.0, 0.0, 0.0], 75.0)]
    #[case(&[0.0, 4.0, 0.0, 3.0, 0.0, 0.0, 0.0], 0.0)]
    fn overage_costs_points_per_unit(
        drinks: ConstrainedWeeklyAllowanceConfig,
        #[case] values: &[f64],
        #[case] expected: f64,
    ) {
        let goal = ConstrainedWeeklyAllowance::new(drinks).expect("valid config");
        assert_eq!(goal.weekly_score(&week(values)), Ok(expected));
    }

    #[rstest]
    fn progressive_rechecks_after_each_day(drinks: ConstrainedWeeklyAllowanceConfig) {
        let goal = ConstrainedWeeklyAllowance::new(drinks).expect("valid config");
        let series = week(&[1.0, 0.0, 2.0, 0.0, 1.0]);
        let scores = goal.progressive_scores(&series).expect("partial week");
        assert_scores_close(&scores, &[100.0, 100.0, 75.0, 75.0, 0.0]);
    }

    #[rstest]
    fn minimum_usage_applies_to_full_weeks_only(mut drinks: ConstrainedWeeklyAllowanceConfig) {
        drinks.minimum_usage = Some(1.0);
        let goal = ConstrainedWeeklyAllowance::new(drinks).expect("valid config");
        let partial = goal
            .progressive_scores(&week(&[0.0, 0.0, 0.0]))
            .expect("partial week");
        assert_scores_close(&partial, &[100.0, 100.0, 100.0]);
        let full = goal
            .progressive_scores(&constant_week(0.0))
            .expect("full week");
        assert_scores_close(&full, &[100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 80.0]);
        assert_eq!(goal.weekly_score(&constant_week(0.0)), Ok(80.0));
    }

    #[rstest]
    fn rollover_carries_unused_allowance(mut drinks: ConstrainedWeeklyAllowanceConfig) {
        drinks.max_days_per_week = None;
        drinks.rollover = Some(RolloverConfig {
            max_rollover_percentage: 50.0,
        });
        let mut goal = ConstrainedWeeklyAllowance::new(drinks).expect("valid config");
        goal.record_week(week_id(10), &constant_week(0.0))
            .expect("full week");
        assert_close(goal.available_allowance(week_id(11)), 3.0);
        assert_close(goal.available_allowance(week_id(12)), 2.0);

        let heavy = week(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(goal.weekly_score(&heavy), Ok(75.0));
        assert_eq!(goal.weekly_score_for(&heavy, week_id(11)), Ok(100.0));
    }

    #[rstest]
    fn rollover_disabled_ignores_history(drinks: ConstrainedWeeklyAllowanceConfig) {
        let mut goal = ConstrainedWeeklyAllowance::new(drinks).expect("valid config");
        goal.record_week(week_id(10), &constant_week(0.0))
            .expect("full week");
        assert_close(goal.available_allowance(week_id(11)), 2.0);
    }

    #[rstest]
    fn record_week_is_idempotent(mut drinks: ConstrainedWeeklyAllowanceConfig) {
        drinks.rollover = Some(RolloverConfig {
            max_rollover_percentage: 100.0,
        });
        let mut goal = ConstrainedWeeklyAllowance::new(drinks).expect("valid config");
        let series = week(&[0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let first = goal.record_week(week_id(20), &series).expect("full week");
        let second = goal.record_week(week_id(20), &series).expect("full week");
        assert_eq!(first, second);
        assert_eq!(goal.ledger().len(), 1);
    }

    #[rstest]
    fn ledger_round_trips_through_builder(drinks: ConstrainedWeeklyAllowanceConfig) {
        let mut goal = ConstrainedWeeklyAllowance::new(drinks.clone()).expect("valid config");
        goal.record_week(week_id(1), &constant_week(0.0))
            .expect("full week");
        let ledger = goal.into_ledger();
        let restored = ConstrainedWeeklyAllowance::new(drinks)
            .expect("valid config")
            .with_ledger(ledger.clone());
        assert_eq!(restored.ledger(), &ledger);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(150.0)]
    #[case(f64::NAN)]
    fn rejects_bad_rollover(mut drinks: ConstrainedWeeklyAllowanceConfig, #[case] pct: f64) {
        drinks.rollover = Some(RolloverConfig {
            max_rollover_percentage: pct,
        });
        let err = ConstrainedWeeklyAllowance::new(drinks).unwrap_err();
        assert!(matches!(err, ConfigurationError::RolloverPercentage { .. }));
    }

    #[rstest]
    fn rejects_day_limit_beyond_window(mut drinks: ConstrainedWeeklyAllowanceConfig) {
        drinks.max_days_per_week = Some(8);
        assert_eq!(
            ConstrainedWeeklyAllowance::new(drinks),
            Err(ConfigurationError::DaysOutOfRange {
                field: "max_days_per_week",
                value: 8,
                window: 7
            })
        );
    }
}
