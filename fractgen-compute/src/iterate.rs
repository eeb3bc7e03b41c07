//! Escape-time iteration formulas.
//!
//! Every formula is written once against [`Real`] and therefore runs
//! unchanged on `f64` and on `BigFloat`. All of them share one loop: keep
//! stepping while `|z|² <= bailout` and the iteration cap has not been hit.

use fractgen_core::{FractalKind, FractalSpec, IterationResult, Real};

/// Run the shared escape loop from `z0 = (x, y)`.
///
/// `|z|²` is treated as 0 before the first step, so every point takes at
/// least one step when `max_iterations > 0`.
#[inline]
fn escape_time<R, F>(
    mut x: R,
    mut y: R,
    bailout: f64,
    max_iterations: u32,
    step: F,
) -> IterationResult
where
    R: Real,
    F: Fn(&R, &R) -> (R, R),
{
    let mut iterations = 0;
    let mut magnitude = 0.0_f64;

    while magnitude <= bailout && iterations < max_iterations {
        let (next_x, next_y) = step(&x, &y);
        x = next_x;
        y = next_y;
        iterations += 1;
        magnitude = x.mul(&x).add(&y.mul(&y)).to_f64();
    }

    IterationResult {
        iterations,
        bailout_magnitude: magnitude,
    }
}

/// z² + c
pub fn mandelbrot2<R: Real>(cx: &R, cy: &R, bailout: f64, max_iterations: u32) -> IterationResult {
    let zero = cx.constant(0.0);
    let two = cx.constant(2.0);
    escape_time(zero.clone(), zero, bailout, max_iterations, |x, y| {
        let x2 = x.mul(x);
        let y2 = y.mul(y);
        (x2.sub(&y2).add(cx), two.mul(x).mul(y).add(cy))
    })
}

/// z³ + c
pub fn mandelbrot3<R: Real>(cx: &R, cy: &R, bailout: f64, max_iterations: u32) -> IterationResult {
    let zero = cx.constant(0.0);
    let three = cx.constant(3.0);
    escape_time(zero.clone(), zero, bailout, max_iterations, |x, y| {
        let x2 = x.mul(x);
        let y2 = y.mul(y);
        // x(x² − 3y²) + cx, y(3x² − y²) + cy
        let next_x = x.mul(&x2.sub(&three.mul(&y2))).add(cx);
        let next_y = y.mul(&three.mul(&x2).sub(&y2)).add(cy);
        (next_x, next_y)
    })
}

/// z⁴ + c
pub fn mandelbrot4<R: Real>(cx: &R, cy: &R, bailout: f64, max_iterations: u32) -> IterationResult {
    let zero = cx.constant(0.0);
    let four = cx.constant(4.0);
    let six = cx.constant(6.0);
    escape_time(zero.clone(), zero, bailout, max_iterations, |x, y| {
        let x2 = x.mul(x);
        let y2 = y.mul(y);
        // x⁴ − 6x²y² + y⁴ + cx
        let next_x = x2.mul(&x2).sub(&six.mul(&x2).mul(&y2)).add(&y2.mul(&y2)).add(cx);
        // 4x³y − 4xy³ + cy
        let next_y = four
            .mul(&x2)
            .mul(x)
            .mul(y)
            .sub(&four.mul(x).mul(&y2).mul(y))
            .add(cy);
        (next_x, next_y)
    })
}

/// z² + k, starting at z = c.
pub fn julia<R: Real>(
    cx: &R,
    cy: &R,
    kr: f64,
    ki: f64,
    bailout: f64,
    max_iterations: u32,
) -> IterationResult {
    let kr = cx.constant(kr);
    let ki = cx.constant(ki);
    let two = cx.constant(2.0);
    escape_time(cx.clone(), cy.clone(), bailout, max_iterations, |x, y| {
        let x2 = x.mul(x);
        let y2 = y.mul(y);
        (x2.sub(&y2).add(&kr), two.mul(x).mul(y).add(&ki))
    })
}

/// Iterate the point `(cx, cy)` with the formula and limits in `spec`.
pub fn iterate<R: Real>(spec: &FractalSpec, cx: &R, cy: &R) -> IterationResult {
    let bailout = spec.bailout();
    let max_iterations = spec.max_iterations();
    match spec.kind() {
        FractalKind::Mandelbrot2 => mandelbrot2(cx, cy, bailout, max_iterations),
        FractalKind::Mandelbrot3 => mandelbrot3(cx, cy, bailout, max_iterations),
        FractalKind::Mandelbrot4 => mandelbrot4(cx, cy, bailout, max_iterations),
        FractalKind::Julia { kr, ki } => julia(cx, cy, kr, ki, bailout, max_iterations),
    }
}
