//! Zoom animation planning.
//!
//! The diameter shrinks by a constant percentage per frame, and the camera
//! centre moves in proportion to how much of the total diameter change has
//! happened so far. A linear diameter would make deep dives appear to
//! accelerate toward the end.

use crate::error::{FractalError, Result};
use crate::real::Real;
use crate::view_window::ViewWindow;

/// One intermediate camera position.
#[derive(Clone, Debug, PartialEq)]
pub struct FlightFrame<R> {
    pub index: u32,
    pub center_x: R,
    pub center_y: R,
    pub diameter_x: R,
}

impl<R: Real> FlightFrame<R> {
    pub fn view(&self, image_width: u32, image_height: u32) -> Result<ViewWindow<R>> {
        ViewWindow::new(
            self.center_x.clone(),
            self.center_y.clone(),
            self.diameter_x.clone(),
            image_width,
            image_height,
        )
    }
}

#[derive(Clone, Debug)]
pub struct FlightPlan<R> {
    start: ViewWindow<R>,
    end: ViewWindow<R>,
    frame_count: u32,
}

impl<R: Real> FlightPlan<R> {
    /// Plan a flight from `start` to `end` over `frame_count` steps.
    ///
    /// Both views must share the same image size.
    pub fn new(start: ViewWindow<R>, end: ViewWindow<R>, frame_count: u32) -> Result<Self> {
        if frame_count == 0 {
            return Err(FractalError::InvalidFlight(
                "frame count must be positive".to_string(),
            ));
        }
        if start.image_width() != end.image_width() || start.image_height() != end.image_height()
        {
            return Err(FractalError::InvalidFlight(format!(
                "image size changes from {}x{} to {}x{}",
                start.image_width(),
                start.image_height(),
                end.image_width(),
                end.image_height()
            )));
        }
        Ok(Self {
            start,
            end,
            frame_count,
        })
    }

    /// Plan a flight lasting `seconds` at `fps` frames per second.
    pub fn from_duration(
        start: ViewWindow<R>,
        end: ViewWindow<R>,
        seconds: f64,
        fps: f64,
    ) -> Result<Self> {
        let frames = (seconds * fps).round();
        if !(frames.is_finite() && frames >= 1.0 && frames <= u32::MAX as f64) {
            return Err(FractalError::InvalidFlight(format!(
                "{} seconds at {} fps does not give a usable frame count",
                seconds, fps
            )));
        }
        Self::new(start, end, frames as u32)
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn start(&self) -> &ViewWindow<R> {
        &self.start
    }

    pub fn end(&self) -> &ViewWindow<R> {
        &self.end
    }

    /// Per-frame diameter multiplier, `1 + p`.
    pub fn growth_factor(&self) -> f64 {
        let n = self.frame_count as f64;
        let ratio = self.end.diameter_x().to_f64() / self.start.diameter_x().to_f64();
        if ratio.is_normal() {
            ratio.powf(1.0 / n)
        } else {
            // Diameters outside the f64 range: go through log2.
            let log2_ratio =
                self.end.diameter_x().log2_approx() - self.start.diameter_x().log2_approx();
            (log2_ratio / n).exp2()
        }
    }

    /// All `frame_count + 1` frames, starting with the start view exactly.
    pub fn frames(&self) -> Vec<FlightFrame<R>> {
        let start_diameter = self.start.diameter_x();
        let end_diameter = self.end.diameter_x();
        let bits = start_diameter.precision_bits().max(end_diameter.precision_bits());

        let growth = self.growth_factor();
        log::debug!(
            "flight: {} frames, growth factor {:.12} per frame",
            self.frame_count,
            growth
        );
        let factor = R::from_f64(growth, bits);

        let delta_x = self.end.center_x().sub(self.start.center_x());
        let delta_y = self.end.center_y().sub(self.start.center_y());
        let total_change = end_diameter.sub(start_diameter).abs();
        let zoomless = !(total_change > total_change.constant(0.0));

        let mut frames = Vec::with_capacity(self.frame_count as usize + 1);
        let mut diameter = start_diameter.clone();
        for index in 0..=self.frame_count {
            if index > 0 {
                diameter = diameter.mul(&factor);
            }

            let fraction = if zoomless {
                R::from_f64(index as f64 / self.frame_count as f64, bits)
            } else {
                diameter.sub(start_diameter).abs().div(&total_change)
            };

            frames.push(FlightFrame {
                index,
                center_x: self.start.center_x().add(&delta_x.mul(&fraction)),
                center_y: self.start.center_y().add(&delta_y.mul(&fraction)),
                diameter_x: diameter.clone(),
            });
        }
        frames
    }

    /// The frames as view windows at the flight's image size.
    pub fn views(&self) -> Result<Vec<ViewWindow<R>>> {
        let (width, height) = (self.start.image_width(), self.start.image_height());
        self.frames()
            .iter()
            .map(|frame| frame.view(width, height))
            .collect()
    }
}
