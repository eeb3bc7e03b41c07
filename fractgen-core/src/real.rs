//! The numeric capability every formula is written against.
//!
//! Two implementations exist: native `f64` for the standard regime and
//! [`BigFloat`](crate::BigFloat) for deep zoom. Coordinate mapping, the
//! iteration formulas and flight interpolation are generic over [`Real`],
//! so both regimes run literally the same arithmetic.

use crate::error::{FractalError, Result};
use std::fmt::Debug;

/// Largest power of two used to rescale values that fall outside the
/// f64 exponent range when estimating their magnitude.
const RESCALE_LOG2: i32 = 900;

pub trait Real: Clone + Debug + PartialOrd + Send + Sync {
    /// Create a value from a native float at the given precision.
    ///
    /// Implementations with fixed precision ignore `precision_bits`.
    fn from_f64(value: f64, precision_bits: usize) -> Self;

    /// Parse a decimal string (e.g. `"-0.743643887037158704752"` or `"1e-500"`).
    fn parse(value: &str, precision_bits: usize) -> Result<Self>;

    /// Convert to a native float, losing precision where necessary.
    fn to_f64(&self) -> f64;

    /// Mantissa bits carried by this value.
    fn precision_bits(&self) -> usize;

    fn add(&self, other: &Self) -> Self;
    fn sub(&self, other: &Self) -> Self;
    fn mul(&self, other: &Self) -> Self;
    fn div(&self, other: &Self) -> Self;
    fn abs(&self) -> Self;

    /// False for NaN and the infinities.
    ///
    /// Arbitrary-precision values are always finite once parsed.
    fn is_finite(&self) -> bool {
        true
    }

    /// A constant at the same precision as `self`.
    fn constant(&self, value: f64) -> Self {
        Self::from_f64(value, self.precision_bits())
    }

    /// Approximate log2(|self|), valid far beyond the f64 exponent range.
    ///
    /// Returns negative infinity for zero.
    fn log2_approx(&self) -> f64 {
        let zero = self.constant(0.0);
        let mut magnitude = self.abs();
        if magnitude <= zero {
            return f64::NEG_INFINITY;
        }

        let scale = self.constant(2f64.powi(RESCALE_LOG2));
        let mut shift: i64 = 0;
        loop {
            let approx = magnitude.to_f64();
            if approx < 1e-290 {
                magnitude = magnitude.mul(&scale);
                shift -= RESCALE_LOG2 as i64;
            } else if approx > 1e290 {
                magnitude = magnitude.div(&scale);
                shift += RESCALE_LOG2 as i64;
            } else {
                return approx.log2() + shift as f64;
            }
        }
    }
}

impl Real for f64 {
    fn from_f64(value: f64, _precision_bits: usize) -> Self {
        value
    }

    fn parse(value: &str, _precision_bits: usize) -> Result<Self> {
        value
            .trim()
            .parse::<f64>()
            .map_err(|e| FractalError::InvalidNumber(format!("'{}': {}", value, e)))
    }

    fn to_f64(&self) -> f64 {
        *self
    }

    fn precision_bits(&self) -> usize {
        f64::MANTISSA_DIGITS as usize
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        self + other
    }

    #[inline]
    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    #[inline]
    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    #[inline]
    fn div(&self, other: &Self) -> Self {
        self / other
    }

    #[inline]
    fn abs(&self) -> Self {
        f64::abs(*self)
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }

    fn log2_approx(&self) -> f64 {
        f64::abs(*self).log2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BigFloat;

    #[test]
    fn f64_ignores_requested_precision() {
        let value = <f64 as Real>::from_f64(1.25, 4096);
        assert_eq!(value, 1.25);
        assert_eq!(Real::precision_bits(&value), 53);
    }

    #[test]
    fn f64_parse_rejects_garbage() {
        assert!(<f64 as Real>::parse("not_a_number", 53).is_err());
        assert_eq!(<f64 as Real>::parse(" -0.7 ", 53).unwrap(), -0.7);
    }

    #[test]
    fn finiteness() {
        assert!(Real::is_finite(&-0.7_f64));
        assert!(!Real::is_finite(&f64::NAN));
        assert!(!Real::is_finite(&f64::INFINITY));
        assert!(!Real::is_finite(&f64::NEG_INFINITY));
        assert!(BigFloat::from_string("1e-500", 2048).unwrap().is_finite());
    }

    #[test]
    fn log2_approx_of_zero_is_negative_infinity() {
        assert_eq!(Real::log2_approx(&0.0_f64), f64::NEG_INFINITY);
        assert_eq!(BigFloat::zero(128).log2_approx(), f64::NEG_INFINITY);
    }

    #[test]
    fn log2_approx_matches_f64_in_range() {
        let big = BigFloat::with_precision(-0.001, 128);
        assert!((big.log2_approx() - 0.001_f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn log2_approx_handles_values_below_f64_range() {
        let tiny = BigFloat::from_string("1e-2000", 7000).unwrap();
        let expected = -2000.0 * std::f64::consts::LOG2_10;
        assert!(
            (tiny.log2_approx() - expected).abs() < 1e-6,
            "got {}",
            tiny.log2_approx()
        );
    }

    #[test]
    fn log2_approx_handles_values_above_f64_range() {
        let huge = BigFloat::from_string("1e500", 4096).unwrap();
        let expected = 500.0 * std::f64::consts::LOG2_10;
        assert!((huge.log2_approx() - expected).abs() < 1e-6);
    }
}
