//! Weighted color-stop palettes.
//!
//! A palette is an ordered list of anchor colors, each with a length that
//! says how much of the iteration range it covers. Colors between anchors
//! are linearly interpolated, wrapping from the last stop back to the first.

use crate::error::{FractalError, Result};
use serde::{Deserialize, Serialize};

/// Length given to stops that declare none (or zero).
pub const DEFAULT_STOP_LENGTH: u32 = 256;

/// Color of points that never escaped.
pub const INTERIOR_COLOR: [u8; 4] = [0, 0, 0, 255];

/// An anchor color and the weight of the segment it starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: [u8; 3],
    #[serde(default)]
    pub length: u32,
}

impl ColorStop {
    pub fn new(color: [u8; 3], length: u32) -> Self {
        Self { color, length }
    }
}

/// An immutable, validated palette.
///
/// Shared read-only by all render workers.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    stops: Vec<ColorStop>,
    repeat: u32,
    explicit_length: Option<u32>,
    reverse: bool,
    hard_stops: bool,
    // Derived: length of one pass over the stops, and of all `repeat` passes.
    cycle_length: f64,
    total_length: f64,
}

impl Palette {
    /// Build a palette from at least two stops. Zero lengths are replaced
    /// with [`DEFAULT_STOP_LENGTH`].
    pub fn new(stops: Vec<ColorStop>) -> Result<Self> {
        if stops.len() < 2 {
            return Err(FractalError::InvalidPalette(format!(
                "at least 2 color stops are required, got {}",
                stops.len()
            )));
        }
        let stops: Vec<ColorStop> = stops
            .into_iter()
            .map(|stop| ColorStop {
                color: stop.color,
                length: if stop.length == 0 {
                    DEFAULT_STOP_LENGTH
                } else {
                    stop.length
                },
            })
            .collect();

        let mut palette = Self {
            stops,
            repeat: 1,
            explicit_length: None,
            reverse: false,
            hard_stops: false,
            cycle_length: 0.0,
            total_length: 0.0,
        };
        palette.measure();
        Ok(palette)
    }

    /// Repeat the stop list this many times across the iteration range.
    /// Zero is treated as one.
    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat.max(1);
        self.measure();
        self
    }

    /// Cycle the palette every `length` iterations instead of stretching it
    /// over the whole `max_iterations` range. `None` or `Some(0)` disables.
    pub fn with_explicit_length(mut self, length: Option<u32>) -> Self {
        self.explicit_length = length.filter(|&l| l > 0);
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_hard_stops(mut self, hard_stops: bool) -> Self {
        self.hard_stops = hard_stops;
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    pub fn explicit_length(&self) -> Option<u32> {
        self.explicit_length
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn hard_stops(&self) -> bool {
        self.hard_stops
    }

    /// Sum of all stop lengths after repetition.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    fn measure(&mut self) {
        self.cycle_length = self.stops.iter().map(|s| s.length as f64).sum();
        self.total_length = self.cycle_length * self.repeat as f64;
    }

    /// Resolve the color for a (possibly fractional) iteration value.
    ///
    /// Values at or beyond `max_iterations` belong to the set and are black.
    pub fn color_for(&self, iteration_value: f64, max_iterations: u32) -> [u8; 4] {
        if !(iteration_value < max_iterations as f64) {
            return INTERIOR_COLOR;
        }

        let (mut value, effective_max) = match self.explicit_length {
            Some(length) => {
                let length = length as f64;
                (iteration_value.rem_euclid(length), length)
            }
            None => (iteration_value, max_iterations as f64),
        };
        if self.reverse {
            value = effective_max - value;
        }

        let position = value / effective_max * self.total_length;
        let (index, into_segment) = self.locate(position);
        let lower = self.stops[index];

        if self.hard_stops {
            let [r, g, b] = lower.color;
            return [r, g, b, 255];
        }

        let upper = self.stops[(index + 1) % self.stops.len()];
        let t = (into_segment / lower.length as f64).clamp(0.0, 1.0);
        let [r, g, b] = interpolate(lower.color, upper.color, t);
        [r, g, b, 255]
    }

    /// Find the stop whose segment contains `position`.
    ///
    /// Repetitions are folded onto a single pass over the stops, so the
    /// cost does not depend on `repeat`. Returns the stop index and how far
    /// into its segment `position` lies. A position at (or past) the very
    /// end belongs to the end of the last segment.
    fn locate(&self, position: f64) -> (usize, f64) {
        let last = self.stops.len() - 1;
        if position >= self.total_length {
            return (last, self.stops[last].length as f64);
        }
        // Negative positions are left alone and clamp to the first stop.
        let offset = if position > 0.0 {
            position % self.cycle_length
        } else {
            position
        };

        let mut segment_start = 0.0;
        for (index, stop) in self.stops.iter().enumerate() {
            let segment_end = segment_start + stop.length as f64;
            if segment_end > offset {
                return (index, offset - segment_start);
            }
            segment_start = segment_end;
        }
        (last, self.stops[last].length as f64)
    }
}

/// Convenience wrapper for [`Palette::color_for`].
pub fn color_for(iteration_value: f64, palette: &Palette, max_iterations: u32) -> [u8; 4] {
    palette.color_for(iteration_value, max_iterations)
}

fn interpolate(lower: [u8; 3], upper: [u8; 3], t: f64) -> [u8; 3] {
    let channel = |l: u8, u: u8| {
        let l = l as f64;
        (l + (u as f64 - l) * t).round().clamp(0.0, 255.0) as u8
    };
    [
        channel(lower[0], upper[0]),
        channel(lower[1], upper[1]),
        channel(lower[2], upper[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [255, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLUE: [u8; 3] = [0, 0, 255];
    const YELLOW: [u8; 3] = [255, 255, 0];

    fn four_stops() -> Palette {
        Palette::new(vec![
            ColorStop::new(RED, 256),
            ColorStop::new(GREEN, 128),
            ColorStop::new(BLUE, 256),
            ColorStop::new(YELLOW, 128),
        ])
        .unwrap()
    }

    fn two_stops() -> Palette {
        Palette::new(vec![
            ColorStop::new([0, 0, 0], 100),
            ColorStop::new([200, 100, 50], 100),
        ])
        .unwrap()
    }

    // ============================================================================
    // Construction
    // ============================================================================

    #[test]
    fn rejects_fewer_than_two_stops() {
        assert!(Palette::new(vec![]).is_err());
        let err = Palette::new(vec![ColorStop::new(RED, 10)]).unwrap_err();
        assert!(matches!(err, FractalError::InvalidPalette(_)));
    }

    #[test]
    fn zero_length_is_normalized_to_default() {
        let palette = Palette::new(vec![ColorStop::new(RED, 0), ColorStop::new(BLUE, 0)]).unwrap();
        assert!(palette.stops().iter().all(|s| s.length == DEFAULT_STOP_LENGTH));
        assert_eq!(palette.total_length(), 512.0);
    }

    #[test]
    fn repeat_multiplies_total_length() {
        let palette = four_stops().with_repeat(3);
        assert_eq!(palette.total_length(), 3.0 * 768.0);
    }

    #[test]
    fn zero_repeat_is_treated_as_one() {
        assert_eq!(four_stops().with_repeat(0).repeat(), 1);
    }

    #[test]
    fn zero_explicit_length_is_ignored() {
        assert_eq!(four_stops().with_explicit_length(Some(0)).explicit_length(), None);
    }

    // ============================================================================
    // Color resolution
    // ============================================================================

    #[test]
    fn value_beyond_max_is_black() {
        assert_eq!(four_stops().color_for(1000.5, 1000), INTERIOR_COLOR);
    }

    #[test]
    fn value_at_max_is_black() {
        assert_eq!(four_stops().color_for(1000.0, 1000), INTERIOR_COLOR);
    }

    #[test]
    fn nan_is_black() {
        assert_eq!(four_stops().color_for(f64::NAN, 1000), INTERIOR_COLOR);
    }

    #[test]
    fn zero_with_hard_stops_is_first_color() {
        let palette = four_stops().with_hard_stops(true);
        assert_eq!(palette.color_for(0.0, 1000), [255, 0, 0, 255]);
    }

    #[test]
    fn zero_with_interpolation_is_first_color() {
        assert_eq!(four_stops().color_for(0.0, 1000), [255, 0, 0, 255]);
    }

    #[test]
    fn worked_example_lands_in_yellow_segment() {
        // 880/1000 * 768 = 675.84, which is 35.84 into the 128-long yellow
        // segment starting at 640: t = 0.28 toward red.
        let color = four_stops().color_for(880.0, 1000);
        assert_eq!(color, [255, 184, 0, 255]);
    }

    #[test]
    fn worked_example_with_hard_stops_is_yellow() {
        let color = four_stops().with_hard_stops(true).color_for(880.0, 1000);
        assert_eq!(color, [255, 255, 0, 255]);
    }

    #[test]
    fn segment_midpoint_is_halfway_between_stops() {
        // 25/100 * 200 = 50: halfway through the first segment.
        let color = two_stops().color_for(25.0, 100);
        assert_eq!(color, [100, 50, 25, 255]);
    }

    #[test]
    fn last_segment_wraps_to_first_stop() {
        // 75/100 * 200 = 150: halfway from the second stop back to the first.
        let color = two_stops().color_for(75.0, 100);
        assert_eq!(color, [100, 50, 25, 255]);
    }

    #[test]
    fn stop_boundary_gives_exact_stop_color() {
        // 50/100 * 200 = 100: start of the second segment.
        assert_eq!(two_stops().color_for(50.0, 100), [200, 100, 50, 255]);
    }

    #[test]
    fn reverse_mirrors_the_value() {
        let forward = two_stops();
        let reversed = two_stops().with_reverse(true);
        assert_eq!(reversed.color_for(10.0, 100), forward.color_for(90.0, 100));
    }

    #[test]
    fn reverse_of_zero_uses_the_end_of_the_range() {
        // Position == total length: the last segment fully interpolated,
        // i.e. the wrap-around color.
        let color = two_stops().with_reverse(true).color_for(0.0, 100);
        assert_eq!(color, [0, 0, 0, 255]);
    }

    #[test]
    fn explicit_length_cycles_independent_of_max_iterations() {
        let palette = two_stops().with_explicit_length(Some(40));
        assert_eq!(palette.color_for(10.0, 1000), palette.color_for(50.0, 1000));
        assert_eq!(palette.color_for(10.0, 1000), palette.color_for(490.0, 1000));
    }

    #[test]
    fn explicit_length_still_colors_interior_black() {
        let palette = two_stops().with_explicit_length(Some(40));
        assert_eq!(palette.color_for(1000.0, 1000), INTERIOR_COLOR);
    }

    #[test]
    fn repeat_cycles_colors_faster() {
        let once = two_stops();
        let twice = two_stops().with_repeat(2);
        assert_eq!(twice.color_for(12.5, 100), once.color_for(25.0, 100));
    }

    #[test]
    fn repeat_boundary_starts_the_next_pass() {
        // 50/100 * 400 = 200: exactly one full pass, so the first stop again.
        let palette = two_stops().with_repeat(2);
        assert_eq!(palette.color_for(50.0, 100), [0, 0, 0, 255]);
        assert_eq!(palette.color_for(50.0, 100), two_stops().color_for(0.0, 100));
    }

    #[test]
    fn huge_repeat_does_not_grow_the_palette() {
        let palette = two_stops().with_repeat(u32::MAX);
        assert_eq!(palette.total_length(), u32::MAX as f64 * 200.0);
        assert_eq!(palette.stops().len(), 2);
        assert_eq!(palette.color_for(0.0, 100), [0, 0, 0, 255]);
        assert_eq!(palette.color_for(99.0, 100)[3], 255);
        assert_eq!(
            palette.with_reverse(true).color_for(0.0, 100),
            [0, 0, 0, 255]
        );
    }

    #[test]
    fn negative_values_clamp_to_first_color() {
        assert_eq!(two_stops().color_for(-3.0, 100), [0, 0, 0, 255]);
    }

    #[test]
    fn free_function_matches_method() {
        let palette = four_stops();
        assert_eq!(color_for(123.4, &palette, 1000), palette.color_for(123.4, 1000));
    }

    #[test]
    fn color_stop_length_defaults_when_missing() {
        let stop: ColorStop = serde_json::from_str(r#"{"color":[1,2,3]}"#).unwrap();
        assert_eq!(stop, ColorStop::new([1, 2, 3], 0));
    }
}
