//! Thresholds expressed either as plain numbers or as clock times.
//!
//! Bedtime and wake-time goals are configured as `"HH:MM"`; the measured
//! values arrive as decimal hours, so the threshold is converted once at
//! construction.
//!
//! # Examples
//! ```
//! use adherence_core::ThresholdValue;
//!
//! let bedtime = ThresholdValue::TimeOfDay("22:30".into());
//! assert_eq!(bedtime.resolve("daily_threshold").unwrap(), 22.5);
//! assert_eq!(ThresholdValue::Number(8.0).resolve("daily_threshold").unwrap(), 8.0);
//! ```

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// A threshold as it appears in a configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdValue {
    /// Plain numeric threshold in the metric's canonical unit.
    Number(f64),
    /// Clock time in `HH:MM` form.
    TimeOfDay(String),
}

impl ThresholdValue {
    /// Resolve the threshold to a number, converting clock times to decimal
    /// hours.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::NonFinite`] for NaN or infinite numbers
    /// and [`ConfigurationError::InvalidTimeOfDay`] for malformed clock
    /// times.
    pub fn resolve(&self, field: &'static str) -> Result<f64, ConfigurationError> {
        match self {
            Self::Number(value) if value.is_finite() => Ok(*value),
            Self::Number(value) => Err(ConfigurationError::NonFinite {
                field,
                value: *value,
            }),
            Self::TimeOfDay(text) => parse_time_of_day(text),
        }
    }
}

impl From<f64> for ThresholdValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Convert an `HH:MM` clock time into decimal hours.
///
/// # Errors
/// Returns [`ConfigurationError::InvalidTimeOfDay`] when the text is not a
/// valid 24-hour clock time.
#[expect(
    clippy::float_arithmetic,
    reason = "minutes are expressed as a fraction of an hour"
)]
pub fn parse_time_of_day(text: &str) -> Result<f64, ConfigurationError> {
    let time = NaiveTime::parse_from_str(text.trim(), TIME_OF_DAY_FORMAT).map_err(|_| {
        ConfigurationError::InvalidTimeOfDay {
            value: text.to_owned(),
        }
    })?;
    Ok(f64::from(time.hour()) + f64::from(time.minute()) / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::assert_close;
    use rstest::rstest;

    #[rstest]
    #[case("00:00", 0.0)]
    #[case("06:15", 6.25)]
    #[case("22:30", 22.5)]
    #[case(" 23:45 ", 23.75)]
    fn converts_clock_times(#[case] text: &str, #[case] expected: f64) {
        let hours = parse_time_of_day(text).expect("valid clock time");
        assert_close(hours, expected);
    }

    #[rstest]
    #[case("24:00")]
    #[case("7pm")]
    #[case("")]
    fn rejects_malformed_clock_times(#[case] text: &str) {
        let err = parse_time_of_day(text).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidTimeOfDay { .. }));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let err = ThresholdValue::Number(f64::NAN)
            .resolve("daily_threshold")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::NonFinite {
                field: "daily_threshold",
                ..
            }
        ));
    }

    #[test]
    fn deserialises_either_shape() {
        let number: ThresholdValue = serde_json::from_str("7.5").expect("numeric threshold");
        let clock: ThresholdValue = serde_json::from_str("\"21:00\"").expect("clock threshold");
        assert_eq!(number, ThresholdValue::Number(7.5));
        assert_eq!(clock, ThresholdValue::TimeOfDay("21:00".into()));
    }
}
