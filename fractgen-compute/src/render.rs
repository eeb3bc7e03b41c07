use crate::pixel_buffer::PixelBuffer;
use crate::scheduler::TileScheduler;
use fractgen_core::{
    BigFloat, FractalSpec, NumericRegime, Palette, RenderSettings, Result, ViewDescriptor,
    ViewWindow, DEFAULT_PRECISION_BITS,
};

/// Resolve the numeric regime for `view` and render it.
///
/// The descriptor is first read at the default deep-zoom precision, which is
/// enough to judge its scale, then parsed again in the chosen regime.
pub fn render_image(
    spec: &FractalSpec,
    view: &ViewDescriptor,
    palette: &Palette,
    settings: &RenderSettings,
) -> Result<PixelBuffer> {
    let scheduler = TileScheduler::from_settings(settings)?;
    let regime = resolve_regime(spec, view, settings)?;

    match regime {
        NumericRegime::Standard => {
            let window: ViewWindow<f64> = view.parse(f64::MANTISSA_DIGITS as usize)?;
            scheduler.render(spec, &window, palette)
        }
        NumericRegime::DeepZoom { precision_bits } => {
            let window: ViewWindow<BigFloat> = view.parse(precision_bits)?;
            scheduler.render(spec, &window, palette)
        }
    }
}

/// The regime `render_image` would use for `view`.
pub fn resolve_regime(
    spec: &FractalSpec,
    view: &ViewDescriptor,
    settings: &RenderSettings,
) -> Result<NumericRegime> {
    let probe: ViewWindow<BigFloat> = view.parse(DEFAULT_PRECISION_BITS)?;
    let regime = settings.precision.resolve(
        &probe,
        spec.max_iterations(),
        settings.deep_zoom_threshold,
    );
    log::debug!("rendering {} with {:?}", spec.kind(), regime);
    Ok(regime)
}
