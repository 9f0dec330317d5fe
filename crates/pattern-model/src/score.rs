//! Unit-interval scores
//!
//! Confidence and connection strength share one representation: an `f64`
//! guaranteed to lie in `[0, 1]`. NaN is rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value in the closed interval `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

/// Rejected score value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfRange(pub f64);

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is outside [0, 1]", self.0)
    }
}

impl Score {
    /// Lowest score
    pub const MIN: Self = Self(0.0);
    /// Highest score
    pub const MAX: Self = Self(1.0);

    /// Create a score, rejecting values outside `[0, 1]`
    ///
    /// # Errors
    /// Returns [`OutOfRange`] for NaN or out-of-range values
    #[inline]
    pub fn new(value: f64) -> Result<Self, OutOfRange> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(OutOfRange(value))
        }
    }

    /// Create a score, clamping into `[0, 1]` (NaN becomes 0)
    #[inline]
    #[must_use]
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self::MIN
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Whole percentage, rounded
    #[inline]
    #[must_use]
    pub fn percent(self) -> u8 {
        // in [0, 100] by construction
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (self.0 * 100.0).round() as u8;
        pct
    }
}

impl TryFrom<f64> for Score {
    type Error = OutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Score::new(0.0).unwrap(), Score::MIN);
        assert_eq!(Score::new(1.0).unwrap(), Score::MAX);
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert!(Score::new(1.01).is_err());
        assert!(Score::new(-0.01).is_err());
        assert!(Score::new(f64::NAN).is_err());
    }

    #[test]
    fn saturating_clamps() {
        assert_eq!(Score::saturating(2.0), Score::MAX);
        assert_eq!(Score::saturating(f64::NAN), Score::MIN);
        assert_eq!(Score::saturating(0.4).get(), 0.4);
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(Score::new(0.856).unwrap().percent(), 86);
        assert_eq!(Score::MAX.to_string(), "100%");
    }

    #[test]
    fn serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Score>("1.5").is_err());
        let score: Score = serde_json::from_str("0.25").unwrap();
        assert_eq!(score.get(), 0.25);
    }
}
