//! Render settings.
//!
//! Process-wide defaults live here and are applied at the boundary when a
//! caller builds a [`FractalSpec`] or a worker pool. Nothing inside the
//! compute path reads them as ambient state.

use crate::error::{FractalError, Result};
use crate::fractal::{FractalKind, FractalSpec, DEFAULT_BAILOUT};
use crate::precision::{Precision, DEFAULT_DEEP_ZOOM_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Edge length of a square compute block.
pub const DEFAULT_BLOCK_SIZE: u32 = 64;

/// Worker threads per logical CPU.
pub const DEFAULT_WORKERS_PER_CPU: usize = 2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub bailout: f64,
    pub block_size: u32,
    pub workers_per_cpu: usize,
    /// Exact worker count; overrides `workers_per_cpu` when set.
    pub worker_threads: Option<usize>,
    pub precision: Precision,
    pub deep_zoom_threshold: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            bailout: DEFAULT_BAILOUT,
            block_size: DEFAULT_BLOCK_SIZE,
            workers_per_cpu: DEFAULT_WORKERS_PER_CPU,
            worker_threads: None,
            precision: Precision::Auto,
            deep_zoom_threshold: DEFAULT_DEEP_ZOOM_THRESHOLD,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(FractalError::InvalidSettings(
                "block size must be positive".to_string(),
            ));
        }
        if self.workers_per_cpu == 0 || self.worker_threads == Some(0) {
            return Err(FractalError::InvalidSettings(
                "worker count must be positive".to_string(),
            ));
        }
        if !(self.deep_zoom_threshold.is_finite() && self.deep_zoom_threshold > 0.0) {
            return Err(FractalError::InvalidSettings(format!(
                "deep zoom threshold must be a positive number, got {}",
                self.deep_zoom_threshold
            )));
        }
        Ok(())
    }

    /// Build a fractal spec with this configuration's bailout.
    pub fn fractal_spec(&self, kind: FractalKind, max_iterations: u32) -> Result<FractalSpec> {
        FractalSpec::new(kind, max_iterations, self.bailout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = RenderSettings::default();
        assert_eq!(settings.bailout, 256.0);
        assert_eq!(settings.block_size, 64);
        assert_eq!(settings.workers_per_cpu, 2);
        assert_eq!(settings.worker_threads, None);
        assert_eq!(settings.precision, Precision::Auto);
        assert_eq!(settings.deep_zoom_threshold, 1e-13);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: RenderSettings = serde_json::from_str(r#"{"block_size":32}"#).unwrap();
        assert_eq!(settings.block_size, 32);
        assert_eq!(settings.bailout, DEFAULT_BAILOUT);
    }

    #[test]
    fn settings_serialization_roundtrip() {
        let original = RenderSettings {
            worker_threads: Some(3),
            precision: Precision::DeepZoom { precision_bits: 256 },
            ..RenderSettings::default()
        };
        let json = serde_json::to_string(&original).unwrap();
        let restored: RenderSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_block = RenderSettings {
            block_size: 0,
            ..RenderSettings::default()
        };
        assert!(matches!(
            zero_block.validate(),
            Err(FractalError::InvalidSettings(_))
        ));

        let zero_workers = RenderSettings {
            worker_threads: Some(0),
            ..RenderSettings::default()
        };
        assert!(zero_workers.validate().is_err());

        let bad_threshold = RenderSettings {
            deep_zoom_threshold: f64::NAN,
            ..RenderSettings::default()
        };
        assert!(bad_threshold.validate().is_err());
    }

    #[test]
    fn fractal_spec_uses_configured_bailout() {
        let settings = RenderSettings {
            bailout: 4.0,
            ..RenderSettings::default()
        };
        let spec = settings.fractal_spec(FractalKind::Mandelbrot3, 50).unwrap();
        assert_eq!(spec.bailout(), 4.0);
        assert_eq!(spec.max_iterations(), 50);
    }
}
