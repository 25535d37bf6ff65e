//! Error types shared by every adherence strategy.
//!
//! Construction failures and per-call evaluation failures are kept apart so
//! callers can distinguish "this goal can never be scored" from "this week's
//! data cannot be scored".

use thiserror::Error;

use crate::ComparisonOperator;

/// Errors raised while building a strategy from its configuration.
///
/// A strategy instance never exists in a partially valid state: every
/// constructor returns one of these instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The operator string did not name a supported comparison.
    #[error("unknown comparison operator '{operator}'")]
    UnknownOperator {
        /// Raw operator text from the configuration record.
        operator: String,
    },
    /// A target, allowance, or similar quantity was zero, negative, or not
    /// finite.
    #[error("{field} must be positive and finite (got {value})")]
    NonPositive {
        /// Name of the offending parameter.
        field: &'static str,
        /// Value supplied.
        value: f64,
    },
    /// A score or penalty parameter was below zero.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Name of the offending parameter.
        field: &'static str,
        /// Value supplied.
        value: f64,
    },
    /// A numeric parameter was NaN or infinite.
    #[error("{field} must be finite (got {value})")]
    NonFinite {
        /// Name of the offending parameter.
        field: &'static str,
        /// Value supplied.
        value: f64,
    },
    /// A component or category filter carried an unusable weight.
    #[error("weight for '{name}' must be positive and finite (got {weight})")]
    InvalidWeight {
        /// Component or filter name.
        name: String,
        /// Weight supplied.
        weight: f64,
    },
    /// Zone lists must contain exactly three or five bands.
    #[error("expected 3 or 5 zones, found {count}")]
    ZoneCount {
        /// Number of zones supplied.
        count: usize,
    },
    /// A zone's lower bound was not strictly below its upper bound.
    #[error("zone '{label}' must have min below max (got {min}..{max})")]
    DegenerateZone {
        /// Zone label.
        label: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// A zone carried a negative or non-finite score.
    #[error("zone '{label}' has invalid score {score}")]
    InvalidZoneScore {
        /// Zone label.
        label: String,
        /// Score supplied.
        score: f64,
    },
    /// Two zones cover part of the same range.
    #[error("zones '{lower}' and '{upper}' overlap")]
    OverlappingZones {
        /// Label of the lower zone.
        lower: String,
        /// Label of the upper zone.
        upper: String,
    },
    /// Two neighbouring zones leave part of the range uncovered.
    #[error("zones '{lower}' and '{upper}' leave a gap")]
    ZoneGap {
        /// Label of the lower zone.
        lower: String,
        /// Label of the upper zone.
        upper: String,
    },
    /// A category value is claimed by more than one filter.
    #[error("category value '{value}' is claimed by filters '{first}' and '{second}'")]
    OverlappingCategories {
        /// Normalised category value.
        value: String,
        /// First filter claiming the value.
        first: String,
        /// Second filter claiming the value.
        second: String,
    },
    /// A limit-style goal was configured without a compliance requirement.
    #[error("'{operator}' goals require an explicit required_days")]
    MissingRequiredDays {
        /// Operator of the goal.
        operator: ComparisonOperator,
    },
    /// A day count fell outside the evaluation window.
    #[error("{field} must lie within 1..={window} (got {value})")]
    DaysOutOfRange {
        /// Name of the offending parameter.
        field: &'static str,
        /// Value supplied.
        value: usize,
        /// Evaluation window length.
        window: usize,
    },
    /// The evaluation window was zero days long.
    #[error("window_days must be at least 1")]
    EmptyWindow,
    /// A time-of-day threshold did not parse as `HH:MM`.
    #[error("invalid time of day '{value}', expected HH:MM")]
    InvalidTimeOfDay {
        /// Raw threshold text.
        value: String,
    },
    /// Rollover percentage was outside `0..=100`.
    #[error("max_rollover_percentage must lie within 0..=100 (got {value})")]
    RolloverPercentage {
        /// Percentage supplied.
        value: f64,
    },
    /// A list that must contain entries was empty.
    #[error("{what} must not be empty")]
    Empty {
        /// Description of the list.
        what: &'static str,
    },
    /// Two entries shared a name that must be unique.
    #[error("duplicate {what} '{name}'")]
    Duplicate {
        /// Kind of entry.
        what: &'static str,
        /// Repeated name.
        name: String,
    },
    /// The score cap sat below the score floor.
    #[error("maximum_cap {cap} is below minimum_threshold {floor}")]
    CapBelowFloor {
        /// Configured cap.
        cap: f64,
        /// Configured floor.
        floor: f64,
    },
    /// A component named a scoring method this engine does not provide.
    #[error("component '{component}' uses unknown scoring method '{method}'")]
    UnknownScoringMethod {
        /// Component name.
        component: String,
        /// Raw method text.
        method: String,
    },
    /// A component's scoring method needs a parameter that was not supplied.
    #[error("component '{component}' is missing parameter '{parameter}'")]
    MissingParameter {
        /// Component name.
        component: String,
        /// Parameter name.
        parameter: &'static str,
    },
}

/// Errors raised while scoring a particular observation or series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The series length did not match the evaluation window.
    #[error("expected {expected} daily values, found {actual}")]
    WindowMismatch {
        /// Configured window length.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// A progressive series ran past the end of the window.
    #[error("series of {actual} days exceeds the {window}-day window")]
    SeriesTooLong {
        /// Configured window length.
        window: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// A composite day lacked a value for one of its components.
    #[error("component '{component}' has no value for field '{field}'")]
    MissingComponentField {
        /// Component name.
        component: String,
        /// Field the component reads.
        field: String,
    },
    /// No filter matched a category label and no default is configured.
    #[error("category '{category}' matches no filter and no default is configured")]
    UnmappedCategory {
        /// Label as supplied by the caller.
        category: String,
    },
    /// A categorical day carried no observations.
    #[error("no category observations were supplied")]
    NoObservations,
    /// The observation shape did not suit the strategy.
    #[error("expected {expected} observation, found {found}")]
    UnexpectedObservation {
        /// Shape the strategy consumes.
        expected: &'static str,
        /// Shape supplied.
        found: &'static str,
    },
    /// A daily value was NaN or infinite.
    #[error("value for day {day} is not finite")]
    NonFiniteValue {
        /// Zero-based day index.
        day: usize,
    },
    /// A week identifier named a week the year does not have.
    #[error("year {year} has no ISO week {week}")]
    InvalidWeek {
        /// ISO year.
        year: i32,
        /// ISO week number.
        week: u32,
    },
    /// A week identifier string was not in `YYYY-Www` form.
    #[error("malformed week identifier '{value}', expected YYYY-Www")]
    MalformedWeek {
        /// Raw identifier text.
        value: String,
    },
}
