//! Deterministic fixed-point scalar used for every stat and effect value.
//!
//! Floats are banned from the simulation: replay-identical output across
//! platforms is a correctness requirement, so all magnitudes are an `i64`
//! mantissa carrying three decimal digits of precision.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Fixed-point number with three decimal digits of precision.
///
/// `FixedPoint::from_milli(1500)` and `FixedPoint::from_int(1) +
/// FixedPoint::from_milli(500)` both represent `1.5`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedPoint(i64);

impl FixedPoint {
    /// Decimal digits carried after the point.
    pub const PRECISION_DIGITS: u32 = 3;

    /// Scale factor of the underlying mantissa.
    pub const PRECISION: i64 = 10_i64.pow(Self::PRECISION_DIGITS);

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(Self::PRECISION);
    pub const HUNDRED: Self = Self(100 * Self::PRECISION);

    /// Creates a value from a whole integer.
    pub const fn from_int(value: i64) -> Self {
        Self(value * Self::PRECISION)
    }

    /// Creates a value from thousandths (the raw mantissa).
    pub const fn from_milli(value: i64) -> Self {
        Self(value)
    }

    /// Truncates towards zero to a whole integer.
    pub const fn to_int(self) -> i64 {
        self.0 / Self::PRECISION
    }

    /// Raw mantissa in thousandths.
    pub const fn to_milli(self) -> i64 {
        self.0
    }

    /// Interprets `self` as a percentage and returns that share of `value`.
    ///
    /// `FixedPoint::from_int(5).percentage_of(x)` is 5% of `x`.
    pub fn percentage_of(self, value: FixedPoint) -> FixedPoint {
        value * self / Self::HUNDRED
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

impl Add for FixedPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for FixedPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for FixedPoint {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for FixedPoint {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul for FixedPoint {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0 / Self::PRECISION)
    }
}

impl Div for FixedPoint {
    type Output = Self;

    /// Division by zero degrades to zero instead of panicking; anomalies
    /// in effect math must never abort a running battle.
    fn div(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return Self::ZERO;
        }
        Self(self.0 * Self::PRECISION / rhs.0)
    }
}

impl Neg for FixedPoint {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / Self::PRECISION as u64;
        let frac = abs % Self::PRECISION as u64;
        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else {
            write!(f, "{sign}{whole}.{frac:03}")
        }
    }
}
