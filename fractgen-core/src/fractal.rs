//! Fractal selection: which formula to iterate and when to stop.

use crate::error::{FractalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Squared magnitude above which a point counts as escaped.
///
/// 4 would be mathematically sufficient; the larger value reduces banding
/// in smooth coloring.
pub const DEFAULT_BAILOUT: f64 = 256.0;

/// Julia constant used when none is supplied.
pub const DEFAULT_JULIA_CONSTANT: (f64, f64) = (-0.2, 0.8);

/// The supported iteration formulas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "lowercase")]
pub enum FractalKind {
    /// z² + c
    #[serde(rename = "mandelbrot")]
    Mandelbrot2,
    /// z³ + c
    Mandelbrot3,
    /// z⁴ + c
    Mandelbrot4,
    /// z² + k, starting at z = c
    Julia { kr: f64, ki: f64 },
}

impl FractalKind {
    /// Look up a formula by name, case-insensitively.
    ///
    /// `julia_constant` is only used for the Julia set.
    pub fn from_name(name: &str, julia_constant: (f64, f64)) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "mandelbrot" => Ok(FractalKind::Mandelbrot2),
            "mandelbrot3" => Ok(FractalKind::Mandelbrot3),
            "mandelbrot4" => Ok(FractalKind::Mandelbrot4),
            "julia" => Ok(FractalKind::Julia {
                kr: julia_constant.0,
                ki: julia_constant.1,
            }),
            _ => Err(FractalError::UnknownFractal(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FractalKind::Mandelbrot2 => "mandelbrot",
            FractalKind::Mandelbrot3 => "mandelbrot3",
            FractalKind::Mandelbrot4 => "mandelbrot4",
            FractalKind::Julia { .. } => "julia",
        }
    }
}

impl FromStr for FractalKind {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s, DEFAULT_JULIA_CONSTANT)
    }
}

impl fmt::Display for FractalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated, immutable choice of formula plus its escape parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalSpec {
    kind: FractalKind,
    max_iterations: u32,
    bailout: f64,
}

impl FractalSpec {
    pub fn new(kind: FractalKind, max_iterations: u32, bailout: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(FractalError::InvalidFractal(
                "max iterations must be positive".to_string(),
            ));
        }
        if !(bailout.is_finite() && bailout > 0.0) {
            return Err(FractalError::InvalidFractal(format!(
                "bailout must be a positive number, got {}",
                bailout
            )));
        }
        if let FractalKind::Julia { kr, ki } = kind {
            if !(kr.is_finite() && ki.is_finite()) {
                return Err(FractalError::InvalidFractal(format!(
                    "julia constant must be finite, got ({}, {})",
                    kr, ki
                )));
            }
        }
        Ok(Self {
            kind,
            max_iterations,
            bailout,
        })
    }

    pub fn from_name(
        name: &str,
        max_iterations: u32,
        bailout: f64,
        julia_constant: (f64, f64),
    ) -> Result<Self> {
        Self::new(
            FractalKind::from_name(name, julia_constant)?,
            max_iterations,
            bailout,
        )
    }

    pub fn kind(&self) -> FractalKind {
        self.kind
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn bailout(&self) -> f64 {
        self.bailout
    }
}

/// Outcome of iterating a single point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationResult {
    /// Steps taken, in `[0, max_iterations]`.
    pub iterations: u32,
    /// |z|² when the loop stopped (not the square root).
    pub bailout_magnitude: f64,
}

impl IterationResult {
    pub fn escaped(&self, max_iterations: u32) -> bool {
        self.iterations < max_iterations
    }
}
