//! Exact rational time positions
//!
//! Every time position and duration in a score is a `Fraction` of a whole note.
//! Bars, beats and tuplets are fractions, so layout and insertion-overlap decisions
//! are exact equality/ordering tests and never go through floating point.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use super::duration::NoteValue;

/// A reduced fraction with a positive denominator
///
/// Backed by 64-bit integers, so the sum of any two fractions with 32-bit terms is exact.
/// Serialized as the JSON pair `[num, den]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "(i64, i64)", into = "(i64, i64)")]
pub struct Fraction(Rational64);

impl Fraction {
    /// Normalize the sign and reduce by the gcd.
    ///
    /// `den == 0` is a precondition violation and panics.
    pub fn new(num: i64, den: i64) -> Self {
        Fraction(Rational64::new(num, den))
    }

    /// Same as [`Fraction::new`]
    pub fn reduce(num: i64, den: i64) -> Self {
        Self::new(num, den)
    }

    pub fn from_integer(n: i64) -> Self {
        Fraction(Rational64::from_integer(n))
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn num(&self) -> i64 {
        *self.0.numer()
    }

    pub fn den(&self) -> i64 {
        *self.0.denom()
    }

    pub fn is_positive(&self) -> bool {
        self.num() > 0
    }

    /// `2^exp` as an exact fraction
    pub fn pow2(exp: i32) -> Self {
        Fraction(Rational64::from_integer(2).pow(exp))
    }

    /// Duration of a notated value with `dots` dots: `2^v * (2 - 2^-dots)`
    ///
    /// Dots past [`NoteValue::max_dots`] would be shorter than a 256th and add nothing.
    pub fn from_duration(note_value: NoteValue, dots: u8) -> Self {
        let value = i32::from(note_value.log2());
        let dots = i32::from(dots.min(note_value.max_dots()));
        Self::pow2(value + 1) - Self::pow2(value - dots)
    }

    pub fn to_pair(self) -> (i64, i64) {
        (self.num(), self.den())
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Rational64> for Fraction {
    fn from(r: Rational64) -> Self {
        Fraction(r)
    }
}

impl TryFrom<(i64, i64)> for Fraction {
    type Error = String;

    fn try_from((num, den): (i64, i64)) -> Result<Self, Self::Error> {
        if den == 0 {
            return Err(format!("fraction {}/0 has a zero denominator", num));
        }
        Ok(Fraction::new(num, den))
    }
}

impl From<Fraction> for (i64, i64) {
    fn from(f: Fraction) -> Self {
        f.to_pair()
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Fraction) -> Fraction {
        Fraction(self.0 + rhs.0)
    }
}

impl AddAssign for Fraction {
    fn add_assign(&mut self, rhs: Fraction) {
        self.0 += rhs.0;
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: Fraction) -> Fraction {
        Fraction(self.0 - rhs.0)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num(), self.den())
    }
}
