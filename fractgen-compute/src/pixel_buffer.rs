//! The render target and its per-block write regions.

use fractgen_core::{ComputeBlock, FractalError, Result};

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Row-major RGBA raster, 8 bits per channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.data[offset..offset + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    /// Split the buffer into one exclusive region per block.
    ///
    /// Blocks must lie inside the image and must not overlap. Each returned
    /// region can be handed to a different thread; the borrow on `self` ends
    /// once every region has been dropped.
    pub fn regions_mut(&mut self, blocks: &[ComputeBlock]) -> Result<Vec<BlockRegion<'_>>> {
        if blocks.is_empty() {
            return Ok(Vec::new());
        }

        for block in blocks {
            if block.width == 0
                || block.height == 0
                || block.right() > self.width
                || block.bottom() > self.height
            {
                return Err(FractalError::InvalidBlockLayout(format!(
                    "{:?} does not fit a {}x{} image",
                    block, self.width, self.height
                )));
            }
        }

        // Horizontal spans per image row: (x, width, block index).
        let mut spans: Vec<Vec<(u32, u32, usize)>> = vec![Vec::new(); self.height as usize];
        for (index, block) in blocks.iter().enumerate() {
            for y in block.y..block.bottom() {
                spans[y as usize].push((block.x, block.width, index));
            }
        }

        let mut rows: Vec<Vec<&mut [u8]>> = blocks
            .iter()
            .map(|block| Vec::with_capacity(block.height as usize))
            .collect();

        let row_bytes = self.width as usize * BYTES_PER_PIXEL;
        for (row, row_spans) in self.data.chunks_exact_mut(row_bytes).zip(spans.iter_mut()) {
            row_spans.sort_unstable_by_key(|&(x, _, _)| x);

            let mut rest: &mut [u8] = row;
            let mut cursor = 0u32;
            for &(x, width, index) in row_spans.iter() {
                if x < cursor {
                    return Err(FractalError::InvalidBlockLayout(format!(
                        "{:?} overlaps another block",
                        blocks[index]
                    )));
                }
                let tail = std::mem::take(&mut rest);
                let (_, tail) = tail.split_at_mut((x - cursor) as usize * BYTES_PER_PIXEL);
                let (span, tail) = tail.split_at_mut(width as usize * BYTES_PER_PIXEL);
                rows[index].push(span);
                rest = tail;
                cursor = x + width;
            }
        }

        Ok(blocks
            .iter()
            .zip(rows)
            .map(|(&block, rows)| BlockRegion { block, rows })
            .collect())
    }
}

/// Exclusive write access to the pixels of one block.
#[derive(Debug)]
pub struct BlockRegion<'a> {
    block: ComputeBlock,
    rows: Vec<&'a mut [u8]>,
}

impl BlockRegion<'_> {
    pub fn block(&self) -> ComputeBlock {
        self.block
    }

    /// Write a pixel at block-local coordinates.
    ///
    /// Panics if the coordinates lie outside the block.
    #[inline]
    pub fn put(&mut self, local_x: u32, local_y: u32, rgba: [u8; 4]) {
        let offset = local_x as usize * BYTES_PER_PIXEL;
        self.rows[local_y as usize][offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }
}
