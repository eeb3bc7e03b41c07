//! Continuous iteration counts for band-free coloring.

use crate::fractal::IterationResult;

/// Turn an integer escape count into a continuous iteration value.
///
/// Escaped points get `n - log2(ln|z|² / ln(bailout))`. Points that never
/// escaped keep `n` unchanged so the palette paints them as interior.
///
/// When the log ratio is not above one (|z|² at or below the bailout, or a
/// degenerate bailout) the correction is clamped to zero.
pub fn smooth_iteration_value(
    result: &IterationResult,
    max_iterations: u32,
    bailout: f64,
) -> f64 {
    let n = result.iterations as f64;
    if !result.escaped(max_iterations) {
        return n;
    }

    let ratio = result.bailout_magnitude.ln() / bailout.ln();
    if ratio.is_finite() && ratio > 1.0 {
        n - ratio.ln() / std::f64::consts::LN_2
    } else {
        n
    }
}
