//! Construction-time error types.

use thiserror::Error;

/// Everything that can go wrong before a render starts.
///
/// Per-pixel computation is total, so once a render has been dispatched
/// none of these can occur.
#[derive(Debug, Error)]
pub enum FractalError {
    #[error("Invalid view window: {0}")]
    InvalidViewWindow(String),

    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    #[error("Unknown fractal function: {0}")]
    UnknownFractal(String),

    #[error("Invalid fractal parameters: {0}")]
    InvalidFractal(String),

    #[error("Failed to parse number: {0}")]
    InvalidNumber(String),

    #[error("Invalid flight: {0}")]
    InvalidFlight(String),

    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid block layout: {0}")]
    InvalidBlockLayout(String),

    #[error("No preset found: {0}")]
    UnknownPreset(String),

    #[error("Raster encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FractalError>;
