//! Evaluation periods and window reductions.
//!
//! # Examples
//! ```
//! use adherence_core::{CalculationMethod, EvaluationPeriod};
//!
//! assert_eq!(EvaluationPeriod::Monthly.default_window_days(), 30);
//! assert_eq!(CalculationMethod::Sum.running(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_WINDOW_DAYS, numeric};

/// Span over which a goal is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationPeriod {
    /// Each day is judged on its own value.
    #[default]
    Daily,
    /// Values accumulate across a week.
    Weekly,
    /// Values accumulate across a month.
    Monthly,
}

impl EvaluationPeriod {
    /// Return the period as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Window length used when a configuration does not name one.
    #[must_use]
    pub const fn default_window_days(self) -> usize {
        match self {
            Self::Daily | Self::Weekly => DEFAULT_WINDOW_DAYS,
            Self::Monthly => 30,
        }
    }

    /// Report whether values accumulate across the window.
    #[must_use]
    pub const fn is_cumulative(self) -> bool {
        !matches!(self, Self::Daily)
    }
}

impl std::fmt::Display for EvaluationPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("unknown evaluation period '{s}'")),
        }
    }
}

/// Reduction applied to a run of daily values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// Total of the values.
    #[default]
    Sum,
    /// Arithmetic mean of the values.
    Average,
    /// Largest value.
    Maximum,
    /// Smallest value.
    Minimum,
}

impl CalculationMethod {
    /// Return the method as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Maximum => "maximum",
            Self::Minimum => "minimum",
        }
    }

    /// Reduce `values` to a single number, or `None` when empty.
    #[must_use]
    pub fn reduce(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            Self::Sum => Some(values.iter().sum()),
            Self::Average => numeric::mean(values),
            Self::Maximum => values.iter().copied().reduce(f64::max),
            Self::Minimum => values.iter().copied().reduce(f64::min),
        }
    }

    /// Reduce every prefix of `values`, one result per day.
    #[must_use]
    pub fn running(self, values: &[f64]) -> Vec<f64> {
        (1..=values.len())
            .filter_map(|end| values.get(..end).and_then(|prefix| self.reduce(prefix)))
            .collect()
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "average" | "mean" => Ok(Self::Average),
            "maximum" | "max" => Ok(Self::Maximum),
            "minimum" | "min" => Ok(Self::Minimum),
            _ => Err(format!("unknown calculation method '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::assert_close;
    use rstest::rstest;

    #[rstest]
    #[case(CalculationMethod::Sum, 9.0)]
    #[case(CalculationMethod::Average, 3.0)]
    #[case(CalculationMethod::Maximum, 5.0)]
    #[case(CalculationMethod::Minimum, 1.0)]
    fn reduces_values(#[case] method: CalculationMethod, #[case] expected: f64) {
        let reduced = method.reduce(&[3.0, 1.0, 5.0]).expect("non-empty input");
        assert_close(reduced, expected);
    }

    #[test]
    fn empty_input_has_no_reduction() {
        assert!(CalculationMethod::Sum.reduce(&[]).is_none());
        assert!(CalculationMethod::Average.running(&[]).is_empty());
    }

    #[test]
    fn running_maximum_tracks_prefixes() {
        assert_eq!(
            CalculationMethod::Maximum.running(&[2.0, 1.0, 4.0]),
            vec![2.0, 2.0, 4.0]
        );
    }

    #[test]
    fn period_parsing_rejects_unknown() {
        let err = EvaluationPeriod::from_str("fortnightly").unwrap_err();
        assert!(err.contains("unknown evaluation period"));
    }

    #[test]
    fn period_deserialises_from_snake_case() {
        let period: EvaluationPeriod = serde_json::from_str("\"weekly\"").expect("valid period");
        assert_eq!(period, EvaluationPeriod::Weekly);
        assert!(period.is_cumulative());
    }
}
