use fractgen_core::ComputeBlock;

/// Generate blocks covering the image, sorted by distance from center.
///
/// Blocks tile the image exactly; edge blocks are clipped to the image.
/// The ordering only decides which blocks are picked up first and never
/// affects the rendered pixels.
pub fn generate_blocks(width: u32, height: u32, block_size: u32) -> Vec<ComputeBlock> {
    let block_size = block_size.max(1);
    let mut blocks = Vec::new();

    for y_start in (0..height).step_by(block_size as usize) {
        for x_start in (0..width).step_by(block_size as usize) {
            let w = block_size.min(width - x_start);
            let h = block_size.min(height - y_start);
            blocks.push(ComputeBlock::new(x_start, y_start, w, h));
        }
    }

    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let distance_sq = |block: &ComputeBlock| {
        let bx = block.x as f64 + block.width as f64 / 2.0;
        let by = block.y as f64 + block.height as f64 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    blocks.sort_by(|a, b| distance_sq(a).total_cmp(&distance_sq(b)));
    blocks
}
