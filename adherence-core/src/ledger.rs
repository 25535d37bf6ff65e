//! Week-keyed history consumed by allowance goals.
//!
//! Rollover reads the previous ISO week's entry, so week identifiers follow
//! ISO-8601 numbering: week 1 of a year is preceded by week 52 or 53 of the
//! year before.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::EvaluationError;

/// ISO-8601 week identifier, written `YYYY-Www`.
///
/// # Examples
/// ```
/// use adherence_core::WeekId;
///
/// # fn main() -> Result<(), adherence_core::EvaluationError> {
/// let week: WeekId = "2021-W01".parse()?;
/// assert_eq!(week.previous().to_string(), "2020-W53");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekId {
    year: i32,
    week: u32,
}

impl WeekId {
    /// Validate and construct a week identifier.
    ///
    /// # Errors
    /// Returns [`EvaluationError::InvalidWeek`] when `week` is zero or past
    /// the last ISO week of `year`.
    pub fn new(year: i32, week: u32) -> Result<Self, EvaluationError> {
        if week == 0 || week > weeks_in_year(year) {
            return Err(EvaluationError::InvalidWeek { year, week });
        }
        Ok(Self { year, week })
    }

    /// The ISO week containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// ISO week-numbering year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// ISO week number, starting at 1.
    #[must_use]
    pub const fn week(self) -> u32 {
        self.week
    }

    /// The week immediately before this one.
    #[must_use]
    pub fn previous(self) -> Self {
        if self.week > 1 {
            return Self {
                year: self.year,
                week: self.week.saturating_sub(1),
            };
        }
        let year = self.year.saturating_sub(1);
        Self {
            year,
            week: weeks_in_year(year),
        }
    }
}

/// Number of ISO weeks in `year`: 52, or 53 for long years.
#[must_use]
pub fn weeks_in_year(year: i32) -> u32 {
    if NaiveDate::from_isoywd_opt(year, 53, Weekday::Mon).is_some() {
        53
    } else {
        52
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekId {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EvaluationError::MalformedWeek {
            value: s.to_owned(),
        };
        let (year_text, week_text) = s.trim().split_once("-W").ok_or_else(malformed)?;
        let year: i32 = year_text.parse().map_err(|_| malformed())?;
        let week: u32 = week_text.parse().map_err(|_| malformed())?;
        Self::new(year, week)
    }
}

impl TryFrom<String> for WeekId {
    type Error = EvaluationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekId> for String {
    fn from(week: WeekId) -> Self {
        week.to_string()
    }
}

/// One week's allowance outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Total usage recorded across the week.
    pub usage: f64,
    /// Allowance available that week, rollover included.
    pub allowance: f64,
    /// Usage beyond the allowance, zero when within it.
    pub overage: f64,
    /// Period score awarded for the week.
    pub score: f64,
    /// Days with any usage.
    pub days_used: usize,
}

/// Week-indexed allowance history.
///
/// Owned by the allowance strategy that records into it; callers persist it
/// between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAllowanceLedger {
    entries: BTreeMap<WeekId, LedgerEntry>,
}

impl WeeklyAllowanceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Entry for `week`, if recorded.
    #[must_use]
    pub fn get(&self, week: WeekId) -> Option<&LedgerEntry> {
        self.entries.get(&week)
    }

    /// Record `entry` for `week`, returning any entry it replaces.
    pub fn insert(&mut self, week: WeekId, entry: LedgerEntry) -> Option<LedgerEntry> {
        self.entries.insert(week, entry)
    }

    /// Most recent recorded week.
    #[must_use]
    pub fn latest(&self) -> Option<(WeekId, &LedgerEntry)> {
        self.entries.iter().next_back().map(|(week, entry)| (*week, entry))
    }

    /// Number of recorded weeks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether no weeks are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over recorded weeks in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (WeekId, &LedgerEntry)> + '_ {
        self.entries.iter().map(|(week, entry)| (*week, entry))
    }
}
