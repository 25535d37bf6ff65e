//! Forward-looking achievability for "N of M days" goals.
//!
//! A naive per-day pass/fail display swings misleadingly: a user who misses
//! Monday would see 0% even though the week is still winnable. The verdict
//! here is recomputed at every day index from the passes so far plus the
//! number of days left in the window.
//!
//! # Examples
//! ```
//! use adherence_core::{Achievability, FrequencyGoal};
//!
//! let goal = FrequencyGoal::new(5, 7, "required_days").unwrap();
//! // Two misses in the first two days still leave five days to pass.
//! assert_eq!(goal.assess(0, 1), Achievability::Achievable);
//! // A third miss makes five passes impossible.
//! assert_eq!(goal.assess(0, 2), Achievability::Impossible);
//! ```

use crate::ConfigurationError;

/// Verdict on a frequency goal at a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Achievability {
    /// Enough passing days have already been recorded.
    Achieved,
    /// The remaining days could still make up the shortfall.
    Achievable,
    /// Even passing every remaining day would fall short.
    Impossible,
}

impl Achievability {
    /// Report whether the goal has not yet been lost.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Impossible)
    }

    /// Map the verdict onto the strategy's success and failure scores.
    #[must_use]
    pub const fn score(self, success: f64, failure: f64) -> f64 {
        if self.is_open() { success } else { failure }
    }
}

/// Requirement of `required` passing days within a `window`-day period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrequencyGoal {
    required: usize,
    window: usize,
}

impl FrequencyGoal {
    /// Validate and construct a frequency goal.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::EmptyWindow`] for a zero-day window and
    /// [`ConfigurationError::DaysOutOfRange`] when `required` is zero or
    /// longer than the window.
    pub const fn new(
        required: usize,
        window: usize,
        field: &'static str,
    ) -> Result<Self, ConfigurationError> {
        if window == 0 {
            return Err(ConfigurationError::EmptyWindow);
        }
        if required == 0 || required > window {
            return Err(ConfigurationError::DaysOutOfRange {
                field,
                value: required,
                window,
            });
        }
        Ok(Self { required, window })
    }

    /// Passing days needed.
    #[must_use]
    pub const fn required(self) -> usize {
        self.required
    }

    /// Days in the evaluation window.
    #[must_use]
    pub const fn window(self) -> usize {
        self.window
    }

    /// Judge the goal after day `day_index` (zero-based) with `passed`
    /// passing days recorded through that day.
    #[must_use]
    pub const fn assess(self, passed: usize, day_index: usize) -> Achievability {
        let remaining = self.window.saturating_sub(day_index.saturating_add(1));
        if passed >= self.required {
            Achievability::Achieved
        } else if passed.saturating_add(remaining) >= self.required {
            Achievability::Achievable
        } else {
            Achievability::Impossible
        }
    }

    /// Produce one verdict per day from a sequence of pass/fail outcomes.
    pub fn verdicts<I>(self, passes: I) -> Vec<Achievability>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut passed = 0_usize;
        passes
            .into_iter()
            .enumerate()
            .map(|(day, pass)| {
                passed += usize::from(pass);
                let verdict = self.assess(passed, day);
                log::trace!(
                    "day {day}: {passed}/{} passing, verdict {verdict:?}",
                    self.required
                );
                verdict
            })
            .collect()
    }

    /// Produce the progressive score sequence for a run of outcomes.
    pub fn progressive<I>(self, passes: I, success: f64, failure: f64) -> Vec<f64>
    where
        I: IntoIterator<Item = bool>,
    {
        self.verdicts(passes)
            .into_iter()
            .map(|verdict| verdict.score(success, failure))
            .collect()
    }

    /// Final verdict for a complete window of outcomes.
    pub fn outcome<I>(self, passes: I) -> Achievability
    where
        I: IntoIterator<Item = bool>,
    {
        let passed = passes.into_iter().filter(|&pass| pass).count();
        if passed >= self.required {
            Achievability::Achieved
        } else {
            Achievability::Impossible
        }
    }
}
