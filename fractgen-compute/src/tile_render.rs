//! Per-block pixel pipeline: map, iterate, smooth, color, store.

use crate::iterate::iterate;
use crate::pixel_buffer::BlockRegion;
use fractgen_core::{smooth_iteration_value, FractalSpec, Palette, Real, ViewWindow};

/// Color for the image pixel `(x, y)`.
#[inline]
pub fn render_pixel<R: Real>(
    view: &ViewWindow<R>,
    spec: &FractalSpec,
    palette: &Palette,
    x: u32,
    y: u32,
) -> [u8; 4] {
    let (cx, cy) = view.pixel_to_complex(x, y);
    let result = iterate(spec, &cx, &cy);
    let value = smooth_iteration_value(&result, spec.max_iterations(), spec.bailout());
    palette.color_for(value, spec.max_iterations())
}

/// Render every pixel of `region`'s block into the region.
pub fn render_block<R: Real>(
    region: &mut BlockRegion<'_>,
    view: &ViewWindow<R>,
    spec: &FractalSpec,
    palette: &Palette,
) {
    let block = region.block();
    for local_y in 0..block.height {
        for local_x in 0..block.width {
            let rgba = render_pixel(view, spec, palette, block.x + local_x, block.y + local_y);
            region.put(local_x, local_y, rgba);
        }
    }
}
