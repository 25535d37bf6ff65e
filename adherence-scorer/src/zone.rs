//! "Sweet spot" goals scored by band.
//!
//! Without a frequency target every day stands alone. With one, the period
//! score is the share of required days that reached a qualifying band score.

use adherence_core::{
    AdherenceScorer, Achievability, ConfigurationError, EvaluationError, FrequencyGoal,
    MeasurementSeries, Zone, ZoneSet, default_window_days, finite_reading, numeric,
    validate_window,
};
use serde::{Deserialize, Serialize};

use crate::config::require_non_negative;

/// Frequency requirement layered over zone scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTarget {
    /// Qualifying days needed per window.
    pub required_days: usize,
    /// Minimum band score, before graduation, that counts as qualifying.
    pub qualifying_score: f64,
}

/// Parameters for [`ZoneBased`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBasedConfig {
    /// Three or five contiguous bands.
    pub zones: Vec<Zone>,
    /// Nudge scores from 95% to 100% of the band score across each band.
    #[serde(default)]
    pub graduated: bool,
    /// Optional frequency requirement.
    #[serde(default)]
    pub frequency_target: Option<FrequencyTarget>,
    /// Days per evaluation window.
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

/// Zone-based strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBased {
    config: ZoneBasedConfig,
    zones: ZoneSet,
    goal: Option<(FrequencyGoal, f64)>,
}

impl ZoneBased {
    /// Validate `config` and build the strategy.
    ///
    /// # Errors
    /// Propagates zone validation failures from [`ZoneSet::new`] and returns
    /// [`ConfigurationError::DaysOutOfRange`] when a frequency target does
    /// not fit the window.
    pub fn new(config: ZoneBasedConfig) -> Result<Self, ConfigurationError> {
        let window = validate_window(config.window_days)?;
        let zones = ZoneSet::new(config.zones.clone())?;
        let goal = config
            .frequency_target
            .map(|target| {
                let qualifying = require_non_negative("qualifying_score", target.qualifying_score)?;
                FrequencyGoal::new(target.required_days, window, "required_days")
                    .map(|goal| (goal, qualifying))
            })
            .transpose()?;
        log::debug!(
            "built zone goal: {} zones over [{}, {}]{}",
            zones.zones().len(),
            zones.lower_bound(),
            zones.upper_bound(),
            if config.graduated { ", graduated" } else { "" }
        );
        Ok(Self {
            config,
            zones,
            goal,
        })
    }

    /// Configuration the strategy was built from.
    #[must_use]
    pub const fn config(&self) -> &ZoneBasedConfig {
        &self.config
    }

    /// Validated zones in ascending order.
    #[must_use]
    pub const fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Score a single value by its band.
    #[must_use]
    pub fn score_value(&self, value: f64) -> f64 {
        self.zones.score(value, self.config.graduated)
    }

    /// Report whether `value` falls in a band whose base score reaches
    /// `qualifying`. Graduation never disqualifies a day.
    fn reaches(&self, value: f64, qualifying: f64) -> bool {
        self.zones
            .find(value)
            .is_some_and(|zone| zone.score >= qualifying)
    }
}

impl AdherenceScorer for ZoneBased {
    type Observation = f64;

    fn score(&self, value: &f64) -> Result<f64, EvaluationError> {
        finite_reading(*value, 0).map(|v| self.score_value(v))
    }

    fn weekly_score(&self, series: &MeasurementSeries) -> Result<f64, EvaluationError> {
        series.require_window(self.config.window_days)?;
        let values = series.finite_values()?;
        if let Some((goal, qualifying)) = self.goal {
            let met = values
                .iter()
                .filter(|v| self.reaches(**v, qualifying))
                .count();
            return Ok(numeric::capped_fraction(met, goal.required()));
        }
        let scores: Vec<f64> = values.iter().map(|v| self.score_value(*v)).collect();
        Ok(numeric::mean(&scores).unwrap_or(0.0))
    }

    fn progressive_scores(&self, series: &MeasurementSeries) -> Result<Vec<f64>, EvaluationError> {
        series.require_within_window(self.config.window_days)?;
        let values = series.finite_values()?;
        let Some((goal, qualifying)) = self.goal else {
            return Ok(values.iter().map(|v| self.score_value(*v)).collect());
        };
        let flags: Vec<bool> = values
            .iter()
            .map(|v| self.reaches(*v, qualifying))
            .collect();
        Ok(frequency_progressive(goal, &flags))
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        Self::new(self.config.clone()).map(|_| ())
    }

    fn describe(&self) -> String {
        let mut text = format!(
            "zone based{}:\n{}",
            if self.config.graduated {
                " (graduated)"
            } else {
                ""
            },
            self.zones.describe()
        );
        if let Some((goal, qualifying)) = self.goal {
            text.push_str(&format!(
                "  frequency: {} of {} days scoring at least {qualifying}\n",
                goal.required(),
                goal.window()
            ));
        }
        text
    }

    fn window_days(&self) -> usize {
        self.config.window_days
    }
}

/// Full marks while the frequency is still reachable, then the share of
/// required days met so far.
fn frequency_progressive(goal: FrequencyGoal, flags: &[bool]) -> Vec<f64> {
    let mut met = 0_usize;
    goal.verdicts(flags.iter().copied())
        .into_iter()
        .zip(flags)
        .map(|(verdict, flag)| {
            met += usize::from(*flag);
            match verdict {
                Achievability::Achieved | Achievability::Achievable => numeric::FULL_SCORE,
                Achievability::Impossible => numeric::capped_fraction(met, goal.required()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adherence_core::test_support::{assert_close, assert_scores_close, week};
    use rstest::{fixture, rstest};

    #[fixture]
    fn sleep() -> ZoneBasedConfig {
        ZoneBasedConfig {
            zones: vec![
                Zone::new(0.0, 6.0, 40.0, "short"),
                Zone::new(6.0, 7.0, 70.0, "borderline"),
                Zone::new(7.0, 9.0, 100.0, "optimal"),
                Zone::new(9.0, 10.0, 70.0, "long"),
                Zone::new(10.0, 24.0, 40.0, "very long"),
            ],
            graduated: false,
            frequency_target: None,
            window_days: 7,
        }
    }

    #[rstest]
    #[case(8.0, 100.0)]
    #[case(7.0, 70.0)]
    #[case(9.5, 70.0)]
    #[case(30.0, 0.0)]
    fn scores_by_band(sleep: ZoneBasedConfig, #[case] hours: f64, #[case] expected: f64) {
        let goal = ZoneBased::new(sleep).expect("valid zones");
        assert_close(goal.score_value(hours), expected);
    }

    #[rstest]
    fn weekly_score_is_mean_without_target(sleep: ZoneBasedConfig) {
        let goal = ZoneBased::new(sleep).expect("valid zones");
        let series = week(&[8.0, 8.0, 8.0, 8.0, 5.0, 9.5, 8.0]);
        let weekly = goal.weekly_score(&series).expect("full week");
        assert_close(weekly, numeric::percentage_of(610.0, 700.0));
    }

    #[rstest]
    fn frequency_target_scores_fraction_of_required(mut sleep: ZoneBasedConfig) {
        sleep.frequency_target = Some(FrequencyTarget {
            required_days: 5,
            qualifying_score: 100.0,
        });
        let goal = ZoneBased::new(sleep).expect("valid zones");
        let short_week = week(&[8.0, 5.0, 8.0, 5.0, 8.0, 5.0, 5.0]);
        assert_eq!(goal.weekly_score(&short_week), Ok(60.0));
        let full_week = week(&[8.0; 7]);
        assert_eq!(goal.weekly_score(&full_week), Ok(100.0));
    }

    #[rstest]
    fn frequency_progressive_falls_back_to_fraction(mut sleep: ZoneBasedConfig) {
        sleep.frequency_target = Some(FrequencyTarget {
            required_days: 5,
            qualifying_score: 100.0,
        });
        let goal = ZoneBased::new(sleep).expect("valid zones");
        let series = week(&[8.0, 5.0, 5.0, 5.0]);
        let scores = goal.progressive_scores(&series).expect("partial week");
        assert_scores_close(&scores, &[100.0, 100.0, 100.0, 20.0]);
    }

    #[rstest]
    fn graduated_days_qualify_by_band_score() {
        let config = ZoneBasedConfig {
            zones: vec![
                Zone::new(0.0, 7.0, 40.0, "short"),
                Zone::new(7.0, 9.0, 100.0, "optimal"),
                Zone::new(9.0, 24.0, 40.0, "long"),
            ],
            graduated: true,
            frequency_target: Some(FrequencyTarget {
                required_days: 5,
                qualifying_score: 100.0,
            }),
            window_days: 7,
        };
        let goal = ZoneBased::new(config).expect("valid zones");
        let series = week(&[8.0; 7]);
        assert!(goal.score_value(8.0) < 100.0);
        assert_eq!(goal.weekly_score(&series), Ok(100.0));
        let scores = goal.progressive_scores(&series).expect("full week");
        assert_scores_close(&scores, &[100.0; 7]);
    }

    #[rstest]
    fn graduated_scores_rise_across_band(mut sleep: ZoneBasedConfig) {
        sleep.graduated = true;
        let goal = ZoneBased::new(sleep).expect("valid zones");
        assert_close(goal.score_value(7.0), 70.0);
        assert_close(goal.score_value(9.0), 100.0);
        assert!(goal.score_value(8.0) > 95.0 && goal.score_value(8.0) < 100.0);
    }

    #[rstest]
    fn rejects_four_zones(mut sleep: ZoneBasedConfig) {
        sleep.zones.pop();
        assert_eq!(
            ZoneBased::new(sleep),
            Err(ConfigurationError::ZoneCount { count: 4 })
        );
    }

    #[rstest]
    fn describe_lists_zones_and_target(mut sleep: ZoneBasedConfig) {
        sleep.frequency_target = Some(FrequencyTarget {
            required_days: 4,
            qualifying_score: 70.0,
        });
        let text = ZoneBased::new(sleep).expect("valid zones").describe();
        assert!(text.contains("optimal -> 100"));
        assert!(text.contains("4 of 7 days"));
    }
}
