//! Score bands for "sweet spot" goals such as sleep duration.
//!
//! A [`ZoneSet`] holds three or five contiguous bands sorted by lower bound.
//! Neighbouring bands may share a boundary value; a value sitting exactly on
//! a shared boundary belongs to the lower band.
//!
//! # Examples
//! ```
//! use adherence_core::{Zone, ZoneSet};
//!
//! # fn main() -> Result<(), adherence_core::ConfigurationError> {
//! let zones = ZoneSet::new(vec![
//!     Zone::new(0.0, 6.0, 40.0, "short"),
//!     Zone::new(6.0, 9.0, 100.0, "optimal"),
//!     Zone::new(9.0, 14.0, 70.0, "long"),
//! ])?;
//! assert_eq!(zones.score(7.5, false), 100.0);
//! assert_eq!(zones.score(6.0, false), 40.0);
//! assert_eq!(zones.score(20.0, false), 0.0);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// Zone counts a configuration may declare.
pub const ALLOWED_ZONE_COUNTS: [usize; 2] = [3, 5];

/// Fraction of a zone's score awarded at its lower edge in graduated mode.
pub const GRADUATED_FLOOR: f64 = 0.95;

const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// A numeric band mapped to a fixed score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Score awarded for values inside the band.
    pub score: f64,
    /// Human-readable band name.
    pub label: String,
}

impl Zone {
    /// Construct a zone; validation happens when it joins a [`ZoneSet`].
    #[must_use]
    pub fn new(min: f64, max: f64, score: f64, label: impl Into<String>) -> Self {
        Self {
            min,
            max,
            score,
            label: label.into(),
        }
    }

    /// Report whether `value` lies within `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Relative position of `value` between the bounds, in `0.0..=1.0`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "position is a linear interpolation across the band"
    )]
    pub fn position(&self, value: f64) -> f64 {
        let width = self.max - self.min;
        if width <= 0.0 {
            return 1.0;
        }
        ((value - self.min) / width).clamp(0.0, 1.0)
    }

    /// Score for `value`, optionally nudged by its position in the band.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "graduated scoring scales the base score"
    )]
    pub fn score_for(&self, value: f64, graduated: bool) -> f64 {
        if !graduated {
            return self.score;
        }
        let factor = GRADUATED_FLOOR + (1.0 - GRADUATED_FLOOR) * self.position(value);
        self.score * factor
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(ConfigurationError::DegenerateZone {
                label: self.label.clone(),
                min: self.min,
                max: self.max,
            });
        }
        if !self.score.is_finite() || self.score < 0.0 {
            return Err(ConfigurationError::InvalidZoneScore {
                label: self.label.clone(),
                score: self.score,
            });
        }
        Ok(())
    }
}

/// Validated, ascending set of contiguous zones.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSet {
    zones: Vec<Zone>,
}

impl ZoneSet {
    /// Sort and validate a list of zones.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::ZoneCount`] unless exactly three or five
    /// zones are supplied, [`ConfigurationError::DegenerateZone`] or
    /// [`ConfigurationError::InvalidZoneScore`] for a malformed band, and
    /// [`ConfigurationError::OverlappingZones`] or
    /// [`ConfigurationError::ZoneGap`] when neighbours are not contiguous.
    pub fn new(mut zones: Vec<Zone>) -> Result<Self, ConfigurationError> {
        if !ALLOWED_ZONE_COUNTS.contains(&zones.len()) {
            return Err(ConfigurationError::ZoneCount { count: zones.len() });
        }
        for zone in &zones {
            zone.validate()?;
        }
        zones.sort_by(|a, b| a.min.total_cmp(&b.min));
        for pair in zones.windows(2) {
            let [lower, upper] = pair else { continue };
            check_neighbours(lower, upper)?;
        }
        Ok(Self { zones })
    }

    /// Zones in ascending order.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Find the zone containing `value`, preferring the lower of two zones
    /// sharing a boundary.
    #[must_use]
    pub fn find(&self, value: f64) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.contains(value))
    }

    /// Score for `value`; values outside every zone score zero.
    #[must_use]
    pub fn score(&self, value: f64, graduated: bool) -> f64 {
        self.find(value)
            .map_or(0.0, |zone| zone.score_for(value, graduated))
    }

    /// Lowest value covered by the set.
    #[must_use]
    pub fn lower_bound(&self) -> f64 {
        self.zones.first().map_or(0.0, |zone| zone.min)
    }

    /// Highest value covered by the set.
    #[must_use]
    pub fn upper_bound(&self) -> f64 {
        self.zones.last().map_or(0.0, |zone| zone.max)
    }

    /// One line per zone, for audit output.
    #[must_use]
    pub fn describe(&self) -> String {
        self.zones
            .iter()
            .map(|zone| {
                format!(
                    "  [{}, {}] {} -> {}\n",
                    zone.min, zone.max, zone.label, zone.score
                )
            })
            .collect()
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "boundary checks allow for rounding in configured bounds"
)]
fn check_neighbours(lower: &Zone, upper: &Zone) -> Result<(), ConfigurationError> {
    if upper.min < lower.max - BOUNDARY_TOLERANCE {
        return Err(ConfigurationError::OverlappingZones {
            lower: lower.label.clone(),
            upper: upper.label.clone(),
        });
    }
    if upper.min > lower.max + BOUNDARY_TOLERANCE {
        return Err(ConfigurationError::ZoneGap {
            lower: lower.label.clone(),
            upper: upper.label.clone(),
        });
    }
    Ok(())
}
