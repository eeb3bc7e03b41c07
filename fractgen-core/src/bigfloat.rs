use crate::error::{FractalError, Result};
use crate::real::Real;
use dashu_base::{Abs, Approximation};
use dashu_float::round::mode::Zero;
use dashu_float::{DBig, FBig};

/// Default mantissa width for the deep-zoom regime.
pub const DEFAULT_PRECISION_BITS: usize = 128;

/// Arbitrary precision binary float with explicit precision enforcement.
///
/// Every value carries the number of mantissa bits it was created with;
/// binary operations produce a result at the larger of the two precisions.
#[derive(Clone, Debug)]
pub struct BigFloat {
    value: FBig,
    precision_bits: usize,
}

impl BigFloat {
    /// Create BigFloat from f64 with explicit precision
    ///
    /// NO DEFAULT - precision must always be specified. Non-finite input
    /// becomes zero.
    pub fn with_precision(val: f64, precision_bits: usize) -> Self {
        let fbig = if val == 0.0 {
            FBig::ZERO
        } else {
            FBig::try_from(val).unwrap_or(FBig::ZERO)
        };
        Self {
            value: fbig.with_precision(precision_bits).value(),
            precision_bits,
        }
    }

    /// Create zero with explicit precision
    pub fn zero(precision_bits: usize) -> Self {
        Self::with_precision(0.0, precision_bits)
    }

    /// Create one with explicit precision
    pub fn one(precision_bits: usize) -> Self {
        Self::with_precision(1.0, precision_bits)
    }

    /// Get precision in bits
    pub fn precision_bits(&self) -> usize {
        self.precision_bits
    }

    /// Convert to f64 (for colorization and display only)
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().value()
    }

    /// Create BigFloat from a decimal string with explicit precision
    ///
    /// Allows values beyond f64 range (e.g., "1e-1000"). The decimal is
    /// converted to binary in one step at the target precision.
    pub fn from_string(val: &str, precision_bits: usize) -> Result<Self> {
        let dbig = val
            .trim()
            .parse::<DBig>()
            .map_err(|e| FractalError::InvalidNumber(format!("'{}': {}", val, e)))?;
        let binary = match dbig.with_base_and_precision::<2>(precision_bits) {
            Approximation::Exact(v) => v,
            Approximation::Inexact(v, _) => v,
        };
        Ok(Self {
            value: binary.with_rounding::<Zero>(),
            precision_bits,
        })
    }

    /// Add two BigFloats, preserving max precision
    pub fn add(&self, other: &Self) -> Self {
        Self {
            value: &self.value + &other.value,
            precision_bits: self.precision_bits.max(other.precision_bits),
        }
    }

    /// Subtract two BigFloats, preserving max precision
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            value: &self.value - &other.value,
            precision_bits: self.precision_bits.max(other.precision_bits),
        }
    }

    /// Multiply two BigFloats, preserving max precision
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            value: &self.value * &other.value,
            precision_bits: self.precision_bits.max(other.precision_bits),
        }
    }

    /// Divide two BigFloats, preserving max precision
    pub fn div(&self, other: &Self) -> Self {
        Self {
            value: &self.value / &other.value,
            precision_bits: self.precision_bits.max(other.precision_bits),
        }
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self {
            value: self.value.clone().abs(),
            precision_bits: self.precision_bits,
        }
    }
}

impl Real for BigFloat {
    fn from_f64(value: f64, precision_bits: usize) -> Self {
        BigFloat::with_precision(value, precision_bits)
    }

    fn parse(value: &str, precision_bits: usize) -> Result<Self> {
        BigFloat::from_string(value, precision_bits)
    }

    fn to_f64(&self) -> f64 {
        BigFloat::to_f64(self)
    }

    fn precision_bits(&self) -> usize {
        self.precision_bits
    }

    fn add(&self, other: &Self) -> Self {
        BigFloat::add(self, other)
    }

    fn sub(&self, other: &Self) -> Self {
        BigFloat::sub(self, other)
    }

    fn mul(&self, other: &Self) -> Self {
        BigFloat::mul(self, other)
    }

    fn div(&self, other: &Self) -> Self {
        BigFloat::div(self, other)
    }

    fn abs(&self) -> Self {
        BigFloat::abs(self)
    }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl std::fmt::Display for BigFloat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
