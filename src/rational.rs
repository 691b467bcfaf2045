//! Exact rational frame rates.
//!
//! Frame rates like 29.97 fps are really integer ratios (2997/100) and must
//! round-trip through a write→close→read cycle without floating drift. This
//! module provides [`Rational`], an immutable reduced fraction used for
//! frame-rate negotiation and comparison throughout the crate.
//!
//! # Example
//!
//! ```
//! use reframe::Rational;
//!
//! let ntsc = Rational::from(29.97);
//! assert_eq!(ntsc.numerator(), 2997);
//! assert_eq!(ntsc.denominator(), 100);
//! assert!((ntsc.value() - 29.97).abs() < 1e-9);
//!
//! // Equality is by reduced fraction, not floating value.
//! assert_eq!(Rational::new(60, 2), Rational::from(30));
//! ```

use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};

use ffmpeg_next::Rational as FfmpegRational;

/// An exact frame rate expressed as a reduced integer fraction.
///
/// Invariants: the fraction is always stored reduced, the denominator is
/// always positive (the sign lives on the numerator), and the value is
/// immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numerator: i32,
    denominator: i32,
}

impl Rational {
    /// Create a rational from a numerator/denominator pair.
    ///
    /// The fraction is reduced and the denominator normalized to be
    /// positive. A zero denominator is normalized to `0/1` rather than
    /// producing an invalid value — FFmpeg uses the same convention for
    /// unknown rates. Reduction runs in `i64`; a reduced component that
    /// still cannot fit `i32` (only reachable from `i32::MIN` inputs)
    /// saturates instead of wrapping.
    pub fn new(numerator: i32, denominator: i32) -> Self {
        if denominator == 0 {
            return Self {
                numerator: 0,
                denominator: 1,
            };
        }

        let divisor = i64::from(gcd(numerator.unsigned_abs(), denominator.unsigned_abs()));
        let mut numerator = i64::from(numerator) / divisor;
        let mut denominator = i64::from(denominator) / divisor;
        if denominator < 0 {
            numerator = -numerator;
            denominator = -denominator;
        }

        Self {
            numerator: numerator.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            denominator: denominator.min(i64::from(i32::MAX)) as i32,
        }
    }

    /// Convert a floating frame rate into an exact rational.
    ///
    /// Uses the fixed 100-denominator contract for the NTSC family of
    /// rates: the value is rounded to two decimal places and stored as
    /// `round(value * 100) / 100`, then reduced. `29.97` becomes
    /// `2997/100`; integral rates reduce back to `n/1`.
    ///
    /// Rates that need finer precision than two decimal places (e.g. the
    /// exact NTSC ratio `30000/1001`) should be constructed with
    /// [`Rational::new`] instead.
    pub fn from_f64(value: f64) -> Self {
        Self::new((value * 100.0).round() as i32, 100)
    }

    /// The reduced numerator.
    pub fn numerator(&self) -> i32 {
        self.numerator
    }

    /// The reduced denominator. Always positive.
    pub fn denominator(&self) -> i32 {
        self.denominator
    }

    /// The frame rate as a floating-point value.
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// The reciprocal fraction.
    ///
    /// Inverting a frame rate yields the duration of one nominal frame;
    /// the writer uses this as its encoder time base.
    pub fn invert(&self) -> Self {
        Self::new(self.denominator, self.numerator)
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self {
            numerator: 0,
            denominator: 1,
        }
    }
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Self::new(value, 1)
    }
}

impl From<f64> for Rational {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<FfmpegRational> for Rational {
    fn from(value: FfmpegRational) -> Self {
        Self::new(value.numerator(), value.denominator())
    }
}

impl From<Rational> for FfmpegRational {
    fn from(value: Rational) -> Self {
        FfmpegRational::new(value.numerator, value.denominator)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Cross-multiply in i64; denominators are positive so the
        // comparison direction is preserved.
        let lhs = self.numerator as i64 * other.denominator as i64;
        let rhs = other.numerator as i64 * self.denominator as i64;
        lhs.cmp(&rhs)
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_on_construction() {
        let r = Rational::new(60, 2);
        assert_eq!(r.numerator(), 30);
        assert_eq!(r.denominator(), 1);
    }

    #[test]
    fn normalizes_negative_denominator() {
        let r = Rational::new(1, -4);
        assert_eq!(r.numerator(), -1);
        assert_eq!(r.denominator(), 4);
    }

    #[test]
    fn zero_denominator_becomes_unknown() {
        let r = Rational::new(5, 0);
        assert_eq!(r, Rational::default());
    }

    #[test]
    fn extreme_magnitudes_saturate_instead_of_wrapping() {
        let r = Rational::new(i32::MIN, -1);
        assert_eq!(r.numerator(), i32::MAX);
        assert_eq!(r.denominator(), 1);

        let r = Rational::new(3, i32::MIN);
        assert_eq!(r.numerator(), -3);
        assert_eq!(r.denominator(), i32::MAX);

        // A shared factor still reduces exactly.
        let r = Rational::new(i32::MIN, -2);
        assert_eq!(r.numerator(), 1 << 30);
        assert_eq!(r.denominator(), 1);
    }

    #[test]
    fn ntsc_from_float() {
        let r = Rational::from(29.97);
        assert_eq!(r.numerator(), 2997);
        assert_eq!(r.denominator(), 100);
        assert!((r.value() - 29.97).abs() < 1e-9);
    }

    #[test]
    fn integral_rate_from_float_reduces() {
        let r = Rational::from(30.0);
        assert_eq!(r.numerator(), 30);
        assert_eq!(r.denominator(), 1);
    }

    #[test]
    fn equality_is_by_reduced_pair() {
        assert_eq!(Rational::new(2997, 100), Rational::from(29.97));
        assert_ne!(Rational::new(30_000, 1001), Rational::new(2997, 100));
    }

    #[test]
    fn ordering_cross_multiplies() {
        assert!(Rational::new(2997, 100) < Rational::from(30));
        assert!(Rational::new(30_000, 1001) > Rational::new(2997, 100));
        assert!(Rational::new(24, 1) < Rational::new(25, 1));
    }

    #[test]
    fn invert_swaps() {
        let tick = Rational::new(2997, 100).invert();
        assert_eq!(tick.numerator(), 100);
        assert_eq!(tick.denominator(), 2997);
    }

    #[test]
    fn ffmpeg_round_trip() {
        let r = Rational::new(2997, 100);
        let ff: FfmpegRational = r.into();
        assert_eq!(Rational::from(ff), r);
    }

    #[test]
    fn displays_as_fraction() {
        assert_eq!(Rational::new(2997, 100).to_string(), "2997/100");
    }
}
