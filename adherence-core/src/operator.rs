//! Comparison operators shared by threshold-style goals.
//!
//! Configuration records carry operators as strings; parsing them once at
//! construction keeps evaluation free of string handling.
//!
//! # Examples
//! ```
//! use adherence_core::ComparisonOperator;
//!
//! let op: ComparisonOperator = "<=".parse().unwrap();
//! assert!(op.compare(150.0, 200.0));
//! assert!(op.is_limit());
//! assert_eq!(op.to_string(), "<=");
//! ```

use std::str::FromStr;

use crate::ConfigurationError;

/// Absolute tolerance applied by [`ComparisonOperator::Equal`].
pub const EQUALITY_TOLERANCE: f64 = 1e-9;

/// Relation a measured value must hold against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// `value >= threshold`.
    GreaterOrEqual,
    /// `value > threshold`.
    Greater,
    /// `value == threshold`, within [`EQUALITY_TOLERANCE`].
    Equal,
    /// `value < threshold`.
    Less,
    /// `value <= threshold`.
    LessOrEqual,
}

impl ComparisonOperator {
    /// Return the operator's symbol.
    ///
    /// # Examples
    /// ```
    /// use adherence_core::ComparisonOperator;
    ///
    /// assert_eq!(ComparisonOperator::Greater.as_str(), ">");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GreaterOrEqual => ">=",
            Self::Greater => ">",
            Self::Equal => "==",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        }
    }

    /// Report whether `value` satisfies the relation against `threshold`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "equality is checked within an absolute tolerance"
    )]
    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterOrEqual => value >= threshold,
            Self::Greater => value > threshold,
            Self::Equal => (value - threshold).abs() <= EQUALITY_TOLERANCE,
            Self::Less => value < threshold,
            Self::LessOrEqual => value <= threshold,
        }
    }

    /// Report whether the operator caps a behaviour ("stay under") rather
    /// than building it up.
    #[must_use]
    pub const fn is_limit(self) -> bool {
        matches!(self, Self::Less | Self::LessOrEqual)
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOperator {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">=" | "≥" => Ok(Self::GreaterOrEqual),
            ">" => Ok(Self::Greater),
            "==" | "=" => Ok(Self::Equal),
            "<" => Ok(Self::Less),
            "<=" | "≤" => Ok(Self::LessOrEqual),
            other => Err(ConfigurationError::UnknownOperator {
                operator: other.to_owned(),
            }),
        }
    }
}
