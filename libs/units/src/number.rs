//! Exact-or-approximate numbers used for unit scales, conversion factors and
//! quantity values.
//!
//! Promotion rules:
//! - `Exact ∘ Exact` stays exact (no precision loss, however large the ratio grows)
//! - anything touching an `Approximate` operand becomes `Approximate`

use crate::error::{Error, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Largest number of fractional digits a `Decimal` can hold.
const MAX_DECIMAL_SCALE: u32 = 28;

#[derive(Clone, Debug)]
pub enum Number {
    Exact(BigRational),
    Approximate(f64),
}

impl Number {
    pub fn zero() -> Self {
        Number::Exact(BigRational::zero())
    }

    pub fn one() -> Self {
        Number::Exact(BigRational::one())
    }

    pub fn integer(n: i64) -> Self {
        Number::Exact(BigRational::from_integer(BigInt::from(n)))
    }

    /// An exact ratio `numer / denom`, reduced to lowest terms.
    pub fn ratio(numer: i64, denom: i64) -> Result<Self> {
        if denom == 0 {
            return Err(Error::DivisionByZero);
        }
        Ok(Number::Exact(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    pub fn approximate(value: f64) -> Self {
        Number::Approximate(value)
    }

    /// Exact `10^exp`; negative exponents yield exact fractions.
    pub fn pow10(exp: i32) -> Self {
        let magnitude = num_traits::pow(BigInt::from(10), exp.unsigned_abs() as usize);
        if exp >= 0 {
            Number::Exact(BigRational::from_integer(magnitude))
        } else {
            Number::Exact(BigRational::new(BigInt::one(), magnitude))
        }
    }

    /// Exact `2^exp`.
    pub fn pow2(exp: u32) -> Self {
        let magnitude = num_traits::pow(BigInt::from(2), exp as usize);
        Number::Exact(BigRational::from_integer(magnitude))
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Exact(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_zero(),
            Number::Approximate(v) => *v == 0.0,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_one(),
            Number::Approximate(v) => *v == 1.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_positive(),
            Number::Approximate(v) => *v > 0.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Number::Exact(_) => true,
            Number::Approximate(v) => v.is_finite(),
        }
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            Number::Exact(r) => Some(r),
            Number::Approximate(_) => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Exact(r) => rational_to_f64(r),
            Number::Approximate(v) => *v,
        }
    }

    /// Demote to the approximate representation.
    pub fn to_approximate(&self) -> Self {
        Number::Approximate(self.to_f64())
    }

    /// The value as a `Decimal`, when it can be represented without rounding.
    ///
    /// Exact values whose denominators have prime factors other than 2 and 5
    /// (e.g. `1/3`) have no finite decimal expansion and yield `None`.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Number::Exact(r) => rational_to_decimal(r),
            Number::Approximate(v) => Decimal::try_from(*v).ok(),
        }
    }

    pub fn checked_div(&self, other: &Number) -> Result<Number> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Number::Exact(a / b),
            _ => Number::Approximate(self.to_f64() / other.to_f64()),
        })
    }

    pub fn recip(&self) -> Result<Number> {
        Number::one().checked_div(self)
    }

    /// `self^exp` for a non-negative integer exponent.
    pub fn pow(&self, exp: u32) -> Number {
        match self {
            Number::Exact(r) => Number::Exact(num_traits::pow(r.clone(), exp as usize)),
            Number::Approximate(v) => Number::Approximate(match i32::try_from(exp) {
                Ok(exp) => v.powi(exp),
                Err(_) => v.powf(f64::from(exp)),
            }),
        }
    }

    /// `self^exp` for a signed integer exponent.
    pub fn powi(&self, exp: i32) -> Result<Number> {
        let magnitude = self.pow(exp.unsigned_abs());
        if exp < 0 {
            magnitude.recip()
        } else {
            Ok(magnitude)
        }
    }

    /// Round half away from zero to `dp` fractional digits.
    ///
    /// Floats are returned unchanged once `dp` passes what an f64 can resolve,
    /// and exact values once it passes `MAX_ROUND_DIGITS`.
    pub fn round_dp(&self, dp: u32) -> Number {
        match self {
            Number::Exact(r) => {
                if dp > MAX_ROUND_DIGITS {
                    return self.clone();
                }
                let shift = BigRational::from_integer(num_traits::pow(BigInt::from(10), dp as usize));
                Number::Exact((r * &shift).round() / shift)
            }
            Number::Approximate(v) => {
                let shift = match i32::try_from(dp) {
                    Ok(dp) if dp <= f64::MAX_10_EXP => 10f64.powi(dp),
                    _ => return self.clone(),
                };
                let scaled = v * shift;
                if !scaled.is_finite() {
                    return self.clone();
                }
                Number::Approximate(scaled.round() / shift)
            }
        }
    }

    /// Total ordering; approximate values use IEEE-754 `total_cmp`.
    pub fn total_cmp(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => a.cmp(b),
            _ => self.to_f64().total_cmp(&other.to_f64()),
        }
    }

    /// Equality within a relative tolerance (exact values compare exactly).
    pub fn approx_eq(&self, other: &Number, tolerance: f64) -> bool {
        if let (Number::Exact(a), Number::Exact(b)) = (self, other) {
            return a == b;
        }
        let (a, b) = (self.to_f64(), other.to_f64());
        if a == b {
            return true;
        }
        let scale = a.abs().max(b.abs()).max(f64::MIN_POSITIVE);
        (a - b).abs() / scale <= tolerance
    }
}

/// Fractional digits beyond which exact rounding is skipped.
const MAX_ROUND_DIGITS: u32 = 4096;

fn rational_to_f64(r: &BigRational) -> f64 {
    // Shift both sides down so that huge ratios such as 10^27 / 3 still fit in an f64.
    let bits = r.numer().bits().max(r.denom().bits());
    let shift = bits.saturating_sub(1000) as usize;
    let numer = (r.numer() >> shift).to_f64().unwrap_or(f64::NAN);
    let denom = (r.denom() >> shift).to_f64().unwrap_or(f64::NAN);
    numer / denom
}

fn rational_to_decimal(r: &BigRational) -> Option<Decimal> {
    let mut denom = r.denom().clone();
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let (mut twos, mut fives) = (0u32, 0u32);
    while (&denom % &two).is_zero() {
        denom /= &two;
        twos += 1;
    }
    while (&denom % &five).is_zero() {
        denom /= &five;
        fives += 1;
    }
    if !denom.is_one() {
        return None;
    }
    let scale = twos.max(fives);
    if scale > MAX_DECIMAL_SCALE {
        return None;
    }
    let shifted = r * BigRational::from_integer(num_traits::pow(BigInt::from(10), scale as usize));
    let mantissa = shifted.to_integer().to_i128()?;
    Decimal::try_from_i128_with_scale(mantissa, scale).ok()
}

impl Default for Number {
    fn default() -> Self {
        Number::zero()
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::integer(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::integer(n as i64)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::integer(n as i64)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Approximate(v)
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Number::Exact(r)
    }
}

impl From<Decimal> for Number {
    fn from(d: Decimal) -> Self {
        let numer = BigInt::from(d.mantissa());
        let denom = num_traits::pow(BigInt::from(10), d.scale() as usize);
        Number::Exact(BigRational::new(numer, denom))
    }
}

impl FromStr for Number {
    type Err = Error;

    /// Integers, decimals and `a/b` ratios parse exactly; scientific notation
    /// parses as an approximate float.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Err(Error::expression(s, "empty number"));
        }
        if let Some((numer, denom)) = text.split_once('/') {
            let numer = BigInt::from_str(numer.trim())
                .map_err(|_| Error::expression(s, "invalid ratio numerator"))?;
            let denom = BigInt::from_str(denom.trim())
                .map_err(|_| Error::expression(s, "invalid ratio denominator"))?;
            if denom.is_zero() {
                return Err(Error::DivisionByZero);
            }
            return Ok(Number::Exact(BigRational::new(numer, denom)));
        }
        if let Ok(n) = BigInt::from_str(text) {
            return Ok(Number::Exact(BigRational::from_integer(n)));
        }
        if !text.contains(['e', 'E']) {
            if let Ok(d) = Decimal::from_str(text) {
                return Ok(Number::from(d));
            }
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Number::Approximate(v)),
            _ => Err(Error::expression(s, "not a number")),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => a == b,
            _ => self.to_f64() == other.to_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Some(a.cmp(b)),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl Mul<&Number> for &Number {
    type Output = Number;

    fn mul(self, rhs: &Number) -> Number {
        match (self, rhs) {
            (Number::Exact(a), Number::Exact(b)) => Number::Exact(a * b),
            _ => Number::Approximate(self.to_f64() * rhs.to_f64()),
        }
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Number) -> Number {
        &self * &rhs
    }
}

impl Add<&Number> for &Number {
    type Output = Number;

    fn add(self, rhs: &Number) -> Number {
        match (self, rhs) {
            (Number::Exact(a), Number::Exact(b)) => Number::Exact(a + b),
            _ => Number::Approximate(self.to_f64() + rhs.to_f64()),
        }
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        &self + &rhs
    }
}

impl Sub<&Number> for &Number {
    type Output = Number;

    fn sub(self, rhs: &Number) -> Number {
        match (self, rhs) {
            (Number::Exact(a), Number::Exact(b)) => Number::Exact(a - b),
            _ => Number::Approximate(self.to_f64() - rhs.to_f64()),
        }
    }
}

impl Sub for Number {
    type Output = Number;

    fn sub(self, rhs: Number) -> Number {
        &self - &rhs
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Exact(r) => Number::Exact(-r),
            Number::Approximate(v) => Number::Approximate(-v),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact(r) if r.is_integer() => write!(f, "{}", r.numer()),
            Number::Exact(r) => match rational_to_decimal(r) {
                Some(d) => write!(f, "{}", d.normalize()),
                None => write!(f, "{}/{}", r.numer(), r.denom()),
            },
            Number::Approximate(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_times_exact_stays_exact() {
        let product = Number::integer(12) * Number::integer(100);
        assert!(product.is_exact());
        assert_eq!(product, Number::integer(1200));
    }

    #[test]
    fn approximate_operand_demotes_result() {
        let product = Number::integer(12) * Number::approximate(0.5);
        assert!(!product.is_exact());
        assert_eq!(product.to_f64(), 6.0);
    }

    #[test]
    fn division_keeps_fractions_exact() {
        let third = Number::one().checked_div(&Number::integer(3)).unwrap();
        assert!(third.is_exact());
        assert_eq!(third.to_string(), "1/3");
        assert_eq!((third * Number::integer(3)), Number::one());
    }

    #[test]
    fn division_by_zero_is_rejected() {
        assert_eq!(
            Number::one().checked_div(&Number::zero()),
            Err(Error::DivisionByZero)
        );
        assert!(Number::ratio(1, 0).is_err());
    }

    #[test]
    fn powers_of_ten_are_exact() {
        assert_eq!(Number::pow10(3), Number::integer(1000));
        assert_eq!(Number::pow10(-3), Number::ratio(1, 1000).unwrap());
        assert_eq!(Number::pow10(27).to_string(), format!("1{}", "0".repeat(27)));
        assert_eq!(Number::pow2(10), Number::integer(1024));
    }

    #[test]
    fn signed_powers() {
        let two = Number::integer(2);
        assert_eq!(two.powi(3).unwrap(), Number::integer(8));
        assert_eq!(two.powi(-2).unwrap(), Number::ratio(1, 4).unwrap());
        assert_eq!(two.powi(0).unwrap(), Number::one());
    }

    #[test]
    fn parses_literals() {
        assert_eq!("12".parse::<Number>().unwrap(), Number::integer(12));
        let decimal = "12.05".parse::<Number>().unwrap();
        assert!(decimal.is_exact());
        assert_eq!(decimal, Number::ratio(1205, 100).unwrap());
        assert_eq!("3/4".parse::<Number>().unwrap(), Number::ratio(3, 4).unwrap());
        let float = "1e-7".parse::<Number>().unwrap();
        assert!(!float.is_exact());
        assert!("twelve".parse::<Number>().is_err());
        assert!("".parse::<Number>().is_err());
    }

    #[test]
    fn decimal_round_trip() {
        let d = Decimal::from_str("0.1").unwrap();
        let n = Number::from(d);
        assert_eq!(n.to_decimal(), Some(d));
        assert_eq!(Number::ratio(1, 3).unwrap().to_decimal(), None);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Number::integer(1200).to_string(), "1200");
        assert_eq!(Number::ratio(1, 8).unwrap().to_string(), "0.125");
        assert_eq!(Number::approximate(0.5).to_string(), "0.5");
    }

    #[test]
    fn rounding() {
        let n = Number::ratio(2, 3).unwrap().round_dp(2);
        assert_eq!(n, Number::ratio(67, 100).unwrap());
        let f = Number::approximate(1.23456).round_dp(3);
        assert!(f.approx_eq(&Number::approximate(1.235), 1e-12));
    }

    #[test]
    fn rounding_far_past_float_precision_is_a_no_op() {
        let f = Number::approximate(3.280839895013123);
        assert_eq!(f.round_dp(400), f);
        assert_eq!(f.round_dp(u32::MAX), f);
        let big = Number::approximate(1e300);
        assert_eq!(big.round_dp(300), big);
        assert!(!Number::approximate(2.5).round_dp(400).to_f64().is_nan());

        let third = Number::ratio(1, 3).unwrap();
        assert_eq!(third.round_dp(u32::MAX), third);
        assert_eq!(Number::ratio(1, 8).unwrap().round_dp(400), Number::ratio(1, 8).unwrap());
    }

    #[test]
    fn float_powers_past_i32_do_not_wrap() {
        let exp = u32::MAX;
        assert_eq!(Number::approximate(1.0).pow(exp), Number::approximate(1.0));
        assert_eq!(Number::approximate(2.0).pow(exp).to_f64(), f64::INFINITY);
        assert_eq!(Number::approximate(0.5).pow(exp).to_f64(), 0.0);
    }

    #[test]
    fn representation_accessors() {
        let quarter = Number::ratio(1, 4).unwrap();
        assert_eq!(quarter.as_rational(), Some(&BigRational::new(1.into(), 4.into())));
        let demoted = quarter.to_approximate();
        assert!(!demoted.is_exact());
        assert_eq!(demoted.as_rational(), None);
        assert_eq!(demoted.to_f64(), 0.25);
    }

    #[test]
    fn huge_ratios_convert_to_float() {
        let yotta = Number::pow10(27);
        assert!((yotta.to_f64() - 1e27).abs() / 1e27 < 1e-12);
    }

    #[test]
    fn comparisons_cross_representations() {
        assert_eq!(Number::integer(2), Number::approximate(2.0));
        assert!(Number::integer(1) < Number::approximate(1.5));
        assert_eq!(
            Number::integer(3).total_cmp(&Number::ratio(6, 2).unwrap()),
            Ordering::Equal
        );
    }
}
