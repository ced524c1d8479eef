//! Rationals extended with a symbolic infinitesimal.
//!
//! A [`DeltaRational`] `(r, k)` stands for `r + k·δ`, where `δ` is a positive
//! quantity smaller than any gap that matters. Values are compared
//! lexicographically, so the strict bound `x < c` can be stored as the
//! non-strict bound `x ≤ (c, -1)`.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Sub};

use crate::rational::Rational;

#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct DeltaRational {
    real: Rational,
    delta: Rational,
}

impl DeltaRational {
    pub fn new(real: Rational, delta: Rational) -> Self {
        Self { real, delta }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// `value` with no infinitesimal part.
    pub fn exact(value: Rational) -> Self {
        Self::new(value, Rational::zero())
    }

    /// `value - δ`, the tightest value strictly below `value`.
    pub fn below(value: Rational) -> Self {
        Self::new(value, Rational::from(-1))
    }

    /// `value + δ`, the tightest value strictly above `value`.
    pub fn above(value: Rational) -> Self {
        Self::new(value, Rational::one())
    }

    pub fn real(&self) -> &Rational {
        &self.real
    }
    pub fn delta(&self) -> &Rational {
        &self.delta
    }

    pub fn is_zero(&self) -> bool {
        self.real.is_zero() && self.delta.is_zero()
    }

    pub fn scale(&self, factor: &Rational) -> Self {
        Self::new(&self.real * factor, &self.delta * factor)
    }

    /// Substitutes a concrete value for `δ`.
    pub fn resolve(&self, delta: &Rational) -> Rational {
        &self.real + &(&self.delta * delta)
    }

    /// Largest `δ` for which `self ≤ other` still holds after resolution.
    ///
    /// Returns `None` when the inequality holds for every positive `δ`.
    /// The caller guarantees `self ≤ other` lexicographically.
    pub fn max_delta_below(&self, other: &DeltaRational) -> Option<Rational> {
        debug_assert!(self <= other);
        if self.real < other.real && self.delta > other.delta {
            let gap = &other.real - &self.real;
            let slope = &self.delta - &other.delta;
            gap.checked_div(&slope).ok()
        } else {
            None
        }
    }
}

impl Ord for DeltaRational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.real
            .cmp(&other.real)
            .then_with(|| self.delta.cmp(&other.delta))
    }
}

impl PartialOrd for DeltaRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add<&DeltaRational> for &DeltaRational {
    type Output = DeltaRational;

    fn add(self, rhs: &DeltaRational) -> DeltaRational {
        DeltaRational::new(&self.real + &rhs.real, &self.delta + &rhs.delta)
    }
}

impl Sub<&DeltaRational> for &DeltaRational {
    type Output = DeltaRational;

    fn sub(self, rhs: &DeltaRational) -> DeltaRational {
        DeltaRational::new(&self.real - &rhs.real, &self.delta - &rhs.delta)
    }
}

impl Display for DeltaRational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.delta.is_zero() {
            write!(f, "{}", self.real)
        } else {
            write!(f, "{}{}δ", self.real, DeltaCoeff(&self.delta))
        }
    }
}

struct DeltaCoeff<'a>(&'a Rational);

impl Display for DeltaCoeff<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_negative() {
            write!(f, "-{}", self.0.abs())
        } else {
            write!(f, "+{}", self.0)
        }
    }
}
