pub mod bigfloat;
pub mod compute_block;
pub mod config;
pub mod error;
pub mod flight;
pub mod fractal;
pub mod palette;
pub mod precision;
pub mod presets;
pub mod real;
pub mod smooth;
pub mod view_window;

pub use bigfloat::{BigFloat, DEFAULT_PRECISION_BITS};
pub use compute_block::ComputeBlock;
pub use config::{RenderSettings, DEFAULT_BLOCK_SIZE, DEFAULT_WORKERS_PER_CPU};
pub use error::{FractalError, Result};
pub use flight::{FlightFrame, FlightPlan};
pub use fractal::{
    FractalKind, FractalSpec, IterationResult, DEFAULT_BAILOUT, DEFAULT_JULIA_CONSTANT,
};
pub use palette::{color_for, ColorStop, Palette, DEFAULT_STOP_LENGTH, INTERIOR_COLOR};
pub use precision::{
    required_precision_bits, NumericRegime, Precision, DEFAULT_DEEP_ZOOM_THRESHOLD,
};
pub use presets::{ColorPreset, FractalPreset, Presets};
pub use real::Real;
pub use smooth::smooth_iteration_value;
pub use view_window::{ViewDescriptor, ViewWindow};
