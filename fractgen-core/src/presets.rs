//! Named color and fractal presets.
//!
//! These are the already-parsed forms of a presets document. Reading the
//! document from disk is left to the caller; the structures deserialize from
//! its camelCase JSON with serde.

use crate::error::{FractalError, Result};
use crate::fractal::{FractalKind, FractalSpec, DEFAULT_JULIA_CONSTANT};
use crate::palette::{ColorStop, Palette};
use crate::view_window::ViewDescriptor;
use serde::{Deserialize, Deserializer, Serialize};

fn default_julia_kr() -> f64 {
    DEFAULT_JULIA_CONSTANT.0
}

fn default_julia_ki() -> f64 {
    DEFAULT_JULIA_CONSTANT.1
}

fn default_repeat() -> u32 {
    1
}

/// A coordinate written either as a JSON number or as a decimal string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    Text(String),
    Number(f64),
}

fn decimal_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Decimal::deserialize(deserializer)? {
        Decimal::Text(text) => text,
        Decimal::Number(number) => number.to_string(),
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorPreset {
    pub name: String,
    pub ident: String,
    pub colors: Vec<ColorStop>,
}

impl ColorPreset {
    pub fn palette(&self) -> Result<Palette> {
        Palette::new(self.colors.clone())
    }
}

/// A saved view of a fractal together with its coloring options.
///
/// Coordinates are decimal strings so deep positions keep their digits.
/// Documents that store them as plain JSON numbers are accepted as well.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FractalPreset {
    pub name: String,
    pub iter_func: String,
    #[serde(rename = "centerCX", deserialize_with = "decimal_string")]
    pub center_cx: String,
    #[serde(rename = "centerCY", deserialize_with = "decimal_string")]
    pub center_cy: String,
    #[serde(rename = "diameterCX", deserialize_with = "decimal_string")]
    pub diameter_cx: String,
    pub color_preset: String,
    #[serde(default = "default_julia_kr")]
    pub julia_kr: f64,
    #[serde(default = "default_julia_ki")]
    pub julia_ki: f64,
    pub max_iterations: u32,
    #[serde(default)]
    pub color_palette_length: u32,
    #[serde(default = "default_repeat")]
    pub color_palette_repeat: u32,
    #[serde(default)]
    pub color_palette_reverse: bool,
    #[serde(default)]
    pub color_palette_hard_stops: bool,
}

impl FractalPreset {
    pub fn fractal_kind(&self) -> Result<FractalKind> {
        FractalKind::from_name(&self.iter_func, (self.julia_kr, self.julia_ki))
    }

    pub fn fractal_spec(&self, bailout: f64) -> Result<FractalSpec> {
        FractalSpec::new(self.fractal_kind()?, self.max_iterations, bailout)
    }

    /// The preset's coloring options applied to `colors`.
    pub fn palette(&self, colors: &ColorPreset) -> Result<Palette> {
        Ok(colors
            .palette()?
            .with_repeat(self.color_palette_repeat)
            .with_explicit_length(Some(self.color_palette_length))
            .with_reverse(self.color_palette_reverse)
            .with_hard_stops(self.color_palette_hard_stops))
    }

    pub fn view(&self, image_width: u32, image_height: u32) -> ViewDescriptor {
        ViewDescriptor {
            center_x: self.center_cx.clone(),
            center_y: self.center_cy.clone(),
            diameter_x: self.diameter_cx.clone(),
            image_width,
            image_height,
        }
    }
}

/// Both preset lists, as loaded from one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presets {
    #[serde(default)]
    pub color_presets: Vec<ColorPreset>,
    #[serde(default)]
    pub fractal_presets: Vec<FractalPreset>,
}

impl Presets {
    pub fn color_by_ident(&self, ident: &str) -> Result<&ColorPreset> {
        self.color_presets
            .iter()
            .find(|preset| preset.ident.eq_ignore_ascii_case(ident))
            .ok_or_else(|| FractalError::UnknownPreset(format!("color preset '{}'", ident)))
    }

    pub fn fractal_by_name(&self, name: &str) -> Result<&FractalPreset> {
        self.fractal_presets
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FractalError::UnknownPreset(format!("fractal preset '{}'", name)))
    }

    /// Palette for a fractal preset, looked up through its color preset.
    pub fn palette_for(&self, fractal: &FractalPreset) -> Result<Palette> {
        fractal.palette(self.color_by_ident(&fractal.color_preset)?)
    }
}
