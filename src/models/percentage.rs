//! Percentages with two decimal places
//!
//! Stored as integer hundredths of a percent so that recomputing a ratio from
//! the same amounts always yields the same stored value.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// A percentage stored as hundredths of a percent (6667 == 66.67%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(i64);

impl Percentage {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// `part / whole * 100`, rounded half away from zero to two places.
    ///
    /// Returns zero when `whole` is zero or negative.
    pub fn of(part: Money, whole: Money) -> Self {
        if !whole.is_positive() {
            return Self::zero();
        }

        let numerator = part.cents() as i128 * 10_000;
        let denominator = whole.cents() as i128;
        let magnitude = (2 * numerator.abs() + denominator) / (2 * denominator);
        let hundredths = if numerator < 0 { -magnitude } else { magnitude };

        Self(hundredths.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        f.pad(&format!("{}{}.{:02}%", sign, abs / 100, abs % 100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_thirds_rounds_up() {
        let pct = Percentage::of(Money::from_units(200), Money::from_units(300));
        assert_eq!(pct.hundredths(), 6667);
        assert_eq!(pct.as_f64(), 66.67);
        assert_eq!(pct.to_string(), "66.67%");
    }

    #[test]
    fn test_zero_or_negative_whole_is_zero() {
        assert_eq!(Percentage::of(Money::from_units(50), Money::zero()), Percentage::zero());
        assert_eq!(
            Percentage::of(Money::from_units(50), Money::from_units(-10)),
            Percentage::zero()
        );
    }

    #[test]
    fn test_negative_part() {
        let pct = Percentage::of(Money::from_units(-200), Money::from_units(1000));
        assert_eq!(pct.hundredths(), -2000);
        assert_eq!(pct.to_string(), "-20.00%");
    }

    #[test]
    fn test_over_one_hundred() {
        let pct = Percentage::of(Money::from_units(450), Money::from_units(300));
        assert_eq!(pct.as_f64(), 150.0);
    }
}
