//! Exact arbitrary-precision rational numbers.
//!
//! [`Rational`] wraps [`BigRational`], which keeps every value in lowest terms
//! with a positive denominator. Coefficients are unbounded because repeated
//! pivoting in the Simplex tableau can grow them well past any fixed-width
//! range.
//!
//! Division is the only partial operation and is exposed as
//! [`Rational::checked_div`] instead of the `/` operator.
//!
//! ```
//! use boolean_lp::rational::Rational;
//!
//! let a: Rational = "3/6".parse().unwrap();
//! let b = Rational::from(2);
//! assert_eq!(a.to_string(), "1/2");
//! assert_eq!((&a * &b).to_string(), "1");
//! assert!(a.checked_div(&Rational::zero()).is_err());
//! ```

use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::{Result, SolverError};

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rational(BigRational);

impl Rational {
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn one() -> Self {
        Self(BigRational::one())
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self(BigRational::from_integer(value.into()))
    }

    /// Creates `numer / denom` in lowest terms.
    ///
    /// Fails with [`SolverError::DivisionByZero`] if `denom` is zero.
    pub fn new(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Result<Self> {
        let denom = denom.into();
        if denom.is_zero() {
            return Err(SolverError::DivisionByZero);
        }
        Ok(Self(BigRational::new(numer.into(), denom)))
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }
    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }
    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }
    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Multiplicative inverse, failing on zero.
    pub fn recip(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(SolverError::DivisionByZero);
        }
        Ok(self.inverse())
    }

    /// Inverse of a value known to be non-zero (tableau coefficients).
    pub(crate) fn inverse(&self) -> Self {
        assert!(!self.is_zero(), "Inverse of zero");
        Self(self.0.recip())
    }

    pub fn checked_div(&self, other: &Rational) -> Result<Self> {
        if other.is_zero() {
            return Err(SolverError::DivisionByZero);
        }
        Ok(Self(&self.0 / &other.0))
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigInt> for Rational {
    fn from(value: BigInt) -> Self {
        Self::from_integer(value)
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Self::from_integer(value)
    }
}

impl From<BigRational> for Rational {
    fn from(value: BigRational) -> Self {
        Self(value)
    }
}

impl Add<&Rational> for &Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Rational {
        Rational(&self.0 + &rhs.0)
    }
}

impl Sub<&Rational> for &Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Rational {
        Rational(&self.0 - &rhs.0)
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Rational {
        Rational(&self.0 * &rhs.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        Rational(self.0 + rhs.0)
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        Rational(self.0 - rhs.0)
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        Rational(self.0 * rhs.0)
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}

impl FromStr for Rational {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SolverError::InvalidRational(s.to_string());
        let parse = |part: &str| part.trim().parse::<BigInt>().map_err(|_| invalid());
        match s.split_once('/') {
            None => Ok(Self::from_integer(parse(s)?)),
            Some((numer, denom)) => Self::new(parse(numer)?, parse(denom)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    #[test]
    fn test_canonical_form() {
        let r = Rational::new(6, -4).unwrap();
        assert_eq!(r.numer(), &BigInt::from(-3));
        assert_eq!(r.denom(), &BigInt::from(2));
        assert_eq!(r.to_string(), "-3/2");

        let z = Rational::new(0, -7).unwrap();
        assert_eq!(z, Rational::zero());
        assert_eq!(z.to_string(), "0");
        assert!(q("8/4").is_integer());
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(Rational::new(1, 0), Err(SolverError::DivisionByZero));
        assert_eq!("5/0".parse::<Rational>(), Err(SolverError::DivisionByZero));
        assert_eq!(Rational::zero().recip(), Err(SolverError::DivisionByZero));
        assert_eq!(
            Rational::one().checked_div(&Rational::zero()),
            Err(SolverError::DivisionByZero)
        );
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(&q("1/2") + &q("1/3"), q("5/6"));
        assert_eq!(&q("1/2") - &q("1/3"), q("1/6"));
        assert_eq!(&q("2/3") * &q("9/4"), q("3/2"));
        assert_eq!(q("2/3").checked_div(&q("4/9")).unwrap(), q("3/2"));
        assert_eq!(-q("5/8"), q("-5/8"));
        assert_eq!(q("-5/8").recip().unwrap(), q("-8/5"));
        assert_eq!(&q("1/4") + &q("3/4"), Rational::one());
    }

    #[test]
    fn test_ordering() {
        assert!(q("1/3") < q("1/2"));
        assert!(q("-1/2") < q("-1/3"));
        assert!(q("5/8") > Rational::zero());
        assert_eq!(q("10/16").cmp(&q("5/8")), Ordering::Equal);
    }

    #[test]
    fn test_parse() {
        assert_eq!(q(" -12 "), Rational::from(-12));
        assert_eq!(q("4/-8"), q("-1/2"));
        assert!(matches!(
            "x/2".parse::<Rational>(),
            Err(SolverError::InvalidRational(_))
        ));
    }

    #[test]
    fn test_big_values() {
        let big = Rational::from_integer(BigInt::from(u64::MAX) * BigInt::from(u64::MAX));
        let r = big.recip().unwrap();
        assert!(r.is_positive());
        assert!((&big * &r).is_one());
    }
}
