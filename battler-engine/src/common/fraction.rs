use std::{
    cmp,
    fmt,
    fmt::Display,
    ops::Mul,
};

use num::Integer;

/// A fraction, used for stat and damage multipliers.
#[derive(Debug, Clone, Copy)]
pub struct Fraction {
    num: u32,
    den: u32,
}

impl Fraction {
    /// Creates a new fraction.
    ///
    /// A zero denominator is treated as one.
    pub fn new(num: u32, den: u32) -> Self {
        Self {
            num,
            den: den.max(1),
        }
    }

    /// The numerator of the fraction.
    pub fn numerator(&self) -> u32 {
        self.num
    }

    /// The denominator of the fraction.
    pub fn denominator(&self) -> u32 {
        self.den
    }

    /// Simplifies the fraction.
    pub fn simplify(&self) -> Self {
        let gcd = self.num.gcd(&self.den).max(1);
        Self::new(self.num / gcd, self.den / gcd)
    }

    /// Converts the fraction to a 4096-based modifier, the way the games store multipliers.
    pub fn to_modifier(&self) -> u32 {
        ((self.num as u64 * 4096) / self.den as u64) as u32
    }

    /// Multiplies an integer by the fraction, truncating the result.
    pub fn apply(&self, value: u64) -> u64 {
        value * self.num as u64 / self.den as u64
    }

    fn cross(a: &Self, b: &Self) -> (u64, u64) {
        (
            a.num as u64 * b.den as u64,
            b.num as u64 * a.den as u64,
        )
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl From<u32> for Fraction {
    fn from(value: u32) -> Self {
        Self::new(value, 1)
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = Self::cross(self, other);
        a == b
    }
}

impl Eq for Fraction {}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        let (a, b) = Self::cross(self, other);
        a.cmp(&b)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Mul for Fraction {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.num * rhs.num, self.den * rhs.den).simplify()
    }
}
