//! Numeric regime selection.
//!
//! Decides whether a view can be rendered with native `f64` or needs
//! `BigFloat`, and how many mantissa bits the latter should carry.

use crate::real::Real;
use crate::view_window::ViewWindow;
use crate::DEFAULT_PRECISION_BITS;
use serde::{Deserialize, Serialize};

/// Safety margin for rounding errors in arithmetic operations.
const SAFETY_BITS: u64 = 64;

/// Diameter below which `Auto` switches to deep zoom.
pub const DEFAULT_DEEP_ZOOM_THRESHOLD: f64 = 1e-13;

/// Narrowest mantissa a caller can request for deep zoom.
pub const MIN_DEEP_ZOOM_BITS: usize = 64;

fn default_precision_bits() -> usize {
    DEFAULT_PRECISION_BITS
}

/// What the caller asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Precision {
    Standard,
    DeepZoom {
        #[serde(default = "default_precision_bits")]
        precision_bits: usize,
    },
    #[default]
    Auto,
}

/// What a render actually runs with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericRegime {
    Standard,
    DeepZoom { precision_bits: usize },
}

impl Precision {
    /// Resolve the request against a concrete view.
    pub fn resolve<R: Real>(
        &self,
        view: &ViewWindow<R>,
        max_iterations: u32,
        deep_zoom_threshold: f64,
    ) -> NumericRegime {
        match *self {
            Precision::Standard => NumericRegime::Standard,
            Precision::DeepZoom { precision_bits } => NumericRegime::DeepZoom {
                precision_bits: precision_bits.max(MIN_DEEP_ZOOM_BITS),
            },
            Precision::Auto => {
                let log2_diameter = view.diameter_x().log2_approx();
                if log2_diameter < deep_zoom_threshold.log2() {
                    let precision_bits = required_precision_bits(view, max_iterations);
                    log::debug!(
                        "auto precision: log2(diameter)={:.1}, deep zoom at {} bits",
                        log2_diameter,
                        precision_bits
                    );
                    NumericRegime::DeepZoom { precision_bits }
                } else {
                    log::debug!(
                        "auto precision: log2(diameter)={:.1}, standard",
                        log2_diameter
                    );
                    NumericRegime::Standard
                }
            }
        }
    }
}

/// Mantissa bits needed to render `view` without neighbouring pixels
/// collapsing onto the same value.
///
/// Covers the coordinate magnitude relative to one pixel step, error
/// amplification over `max_iterations`, and a fixed safety margin. The
/// result is rounded up to a power of two and never below the default
/// deep-zoom width.
pub fn required_precision_bits<R: Real>(view: &ViewWindow<R>, max_iterations: u32) -> usize {
    let log2_width = view.diameter_x().log2_approx();
    let log2_height = view.diameter_y().log2_approx();

    // log2(min_delta) where delta = dimension / pixels
    let log2_delta_x = log2_width - (view.image_width() as f64).log2();
    let log2_delta_y = log2_height - (view.image_height() as f64).log2();
    let log2_min_delta = log2_delta_x.min(log2_delta_y);

    // M = max(|cx| + width/2, |cy| + height/2), one extra bit for the sum
    let log2_mx = view.center_x().log2_approx().max(log2_width - 1.0) + 1.0;
    let log2_my = view.center_y().log2_approx().max(log2_height - 1.0) + 1.0;
    let log2_m = log2_mx.max(log2_my);

    let bits_from_ratio = (log2_m - log2_min_delta).ceil().max(0.0) as u64;

    let iter_bits = if max_iterations > 1 {
        (max_iterations as f64).log2().ceil() as u64
    } else {
        0
    };

    let total_bits = bits_from_ratio + iter_bits + SAFETY_BITS;
    (total_bits as usize)
        .next_power_of_two()
        .max(DEFAULT_PRECISION_BITS)
}
