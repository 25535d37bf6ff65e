//! Small numeric helpers shared by the strategies.

/// Full marks on the default score scale.
pub const FULL_SCORE: f64 = 100.0;

/// Express `value` as a percentage of `target`.
///
/// Callers guarantee `target` is positive and finite.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "proportional scoring divides by the configured target"
)]
pub fn percentage_of(value: f64, target: f64) -> f64 {
    value / target * FULL_SCORE
}

/// Arithmetic mean, or `None` for an empty slice.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "averaging daily scores divides a sum by a count"
)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / count_as_f64(values.len()))
}

/// Weighted mean of `(value, weight)` pairs, or `None` when the total weight
/// is not positive.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "weighted averages need multiply-accumulate arithmetic"
)]
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (total, weight) = pairs
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(total, weight), (value, w)| {
            (total + value * w, weight + w)
        });
    (weight > 0.0).then(|| total / weight)
}

/// Express `count` as a percentage of `of`, capped at full marks.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "frequency targets compare counts as a fraction"
)]
pub fn capped_fraction(count: usize, of: usize) -> f64 {
    if of == 0 {
        return FULL_SCORE;
    }
    (count_as_f64(count) / count_as_f64(of) * FULL_SCORE).min(FULL_SCORE)
}

/// Convert a day count to `f64`.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "day counts are far below the 2^52 precision limit"
)]
pub const fn count_as_f64(count: usize) -> f64 {
    count as f64
}

/// Report whether two scores agree within `1e-9`.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
pub fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() <= 1e-9
}
