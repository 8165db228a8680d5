//! Exact rational arithmetic for share fractions.
//!
//! Every stage between fixed-share allocation and monetary conversion works on
//! [`Fraction`] values so that 'Awl and Radd rescaling never accumulate rounding
//! error. Fractions are always stored reduced with a positive denominator.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An exact, always-reduced rational number.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::Fraction;
///
/// let half = Fraction::new(1, 2);
/// let two_thirds = Fraction::new(2, 3);
/// assert_eq!(half + two_thirds, Fraction::new(7, 6));
/// assert_eq!((half + two_thirds).to_string(), "7/6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: i128,
    den: i128,
}

const fn gcd(mut a: i128, mut b: i128) -> i128 {
    if a < 0 {
        a = -a;
    }
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    if a < 0 { -a } else { a }
}

impl Fraction {
    /// The fraction 0/1.
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };

    /// The fraction 1/1, i.e. the whole estate.
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    /// Creates a reduced fraction.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero. Use [`Fraction::checked_new`] for untrusted input.
    pub const fn new(num: i128, den: i128) -> Self {
        match Self::checked_new(num, den) {
            Some(fraction) => fraction,
            None => panic!("fraction denominator must not be zero"),
        }
    }

    /// Creates a reduced fraction, returning `None` if `den` is zero.
    pub const fn checked_new(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let (mut num, mut den) = (num, den);
        if den < 0 {
            num = -num;
            den = -den;
        }
        let g = gcd(num, den);
        Some(Fraction {
            num: num / g,
            den: den / g,
        })
    }

    /// Creates a whole-number fraction.
    pub const fn from_integer(value: i128) -> Self {
        Fraction { num: value, den: 1 }
    }

    /// The numerator of the reduced fraction.
    pub const fn numerator(&self) -> i128 {
        self.num
    }

    /// The denominator of the reduced fraction (always positive).
    pub const fn denominator(&self) -> i128 {
        self.den
    }

    /// Returns true if the fraction is zero.
    pub const fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Returns true if the fraction is strictly greater than zero.
    pub const fn is_positive(&self) -> bool {
        self.num > 0
    }

    /// Divides by another fraction, returning `None` when dividing by zero.
    pub fn checked_div(self, rhs: Fraction) -> Option<Fraction> {
        if rhs.is_zero() {
            return None;
        }
        Fraction::checked_new(self.num * rhs.den, self.den * rhs.num)
    }

    /// Divides by a positive head count, returning `None` when `count` is zero.
    pub fn split(self, count: u32) -> Option<Fraction> {
        self.checked_div(Fraction::from_integer(i128::from(count)))
    }

    /// Returns the larger of `self` and zero.
    pub fn clamp_non_negative(self) -> Fraction {
        if self.num < 0 { Fraction::ZERO } else { self }
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Fraction::ZERO
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Fraction) -> Fraction {
        let g = gcd(self.den, rhs.den);
        let den = self.den / g * rhs.den;
        Fraction::new(self.num * (den / self.den) + rhs.num * (den / rhs.den), den)
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: Fraction) -> Fraction {
        self + Fraction {
            num: -rhs.num,
            den: rhs.den,
        }
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        // Cross-reduce first to keep intermediates small.
        let g1 = gcd(self.num, rhs.den);
        let g2 = gcd(rhs.num, self.den);
        Fraction::new(
            (self.num / g1) * (rhs.num / g2),
            (self.den / g2) * (rhs.den / g1),
        )
    }
}

impl Sum for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Self {
        iter.fold(Fraction::ZERO, |acc, f| acc + f)
    }
}

impl<'a> Sum<&'a Fraction> for Fraction {
    fn sum<I: Iterator<Item = &'a Fraction>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num * other.den).cmp(&(other.num * self.den))
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Error returned when a fraction string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFractionError(String);

impl fmt::Display for ParseFractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid fraction '{}'", self.0)
    }
}

impl std::error::Error for ParseFractionError {}

impl FromStr for Fraction {
    type Err = ParseFractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFractionError(s.to_string());
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s.trim(), "1"),
        };
        let num: i128 = num.parse().map_err(|_| err())?;
        let den: i128 = den.parse().map_err(|_| err())?;
        Fraction::checked_new(num, den).ok_or_else(err)
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reduces_and_normalises_sign() {
        let f = Fraction::new(4, -8);
        assert_eq!(f.numerator(), -1);
        assert_eq!(f.denominator(), 2);
    }

    #[test]
    fn test_checked_new_rejects_zero_denominator() {
        assert!(Fraction::checked_new(1, 0).is_none());
    }

    #[test]
    fn test_add_uses_common_denominator() {
        let sum = Fraction::new(1, 8) + Fraction::new(1, 2) + Fraction::new(1, 6);
        assert_eq!(sum, Fraction::new(19, 24));
    }

    #[test]
    fn test_sub_can_go_negative() {
        let diff = Fraction::ONE - Fraction::new(7, 6);
        assert_eq!(diff, Fraction::new(-1, 6));
        assert_eq!(diff.clamp_non_negative(), Fraction::ZERO);
    }

    #[test]
    fn test_mul_cross_reduces() {
        assert_eq!(Fraction::new(2, 3) * Fraction::new(3, 4), Fraction::new(1, 2));
        assert_eq!(Fraction::ZERO * Fraction::new(3, 4), Fraction::ZERO);
    }

    #[test]
    fn test_checked_div() {
        let half = Fraction::new(1, 2);
        assert_eq!(half.checked_div(Fraction::new(7, 6)), Some(Fraction::new(3, 7)));
        assert_eq!(half.checked_div(Fraction::ZERO), None);
    }

    #[test]
    fn test_split_by_head_count() {
        assert_eq!(Fraction::new(2, 3).split(4), Some(Fraction::new(1, 6)));
        assert_eq!(Fraction::new(2, 3).split(0), None);
    }

    #[test]
    fn test_ordering() {
        assert!(Fraction::new(7, 6) > Fraction::ONE);
        assert!(Fraction::new(1, 8) < Fraction::new(1, 6));
        assert_eq!(
            Fraction::new(2, 4).cmp(&Fraction::new(1, 2)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_sum_of_iterator() {
        let parts = [Fraction::new(1, 3), Fraction::new(1, 3), Fraction::new(1, 3)];
        assert_eq!(parts.iter().sum::<Fraction>(), Fraction::ONE);
    }

    #[test]
    fn test_display() {
        assert_eq!(Fraction::new(1, 8).to_string(), "1/8");
        assert_eq!(Fraction::ONE.to_string(), "1");
        assert_eq!(Fraction::ZERO.to_string(), "0");
    }

    #[test]
    fn test_parse() {
        assert_eq!("3/7".parse::<Fraction>().unwrap(), Fraction::new(3, 7));
        assert_eq!(" 2 / 4 ".parse::<Fraction>().unwrap(), Fraction::new(1, 2));
        assert_eq!("1".parse::<Fraction>().unwrap(), Fraction::ONE);
        assert!("1/0".parse::<Fraction>().is_err());
        assert!("abc".parse::<Fraction>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Fraction::new(2, 7)).unwrap();
        assert_eq!(json, "\"2/7\"");

        let back: Fraction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Fraction::new(2, 7));
    }
}
