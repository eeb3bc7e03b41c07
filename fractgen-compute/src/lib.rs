pub mod iterate;
pub mod pixel_buffer;
pub mod raster;
pub mod render;
pub mod scheduler;
pub mod tile_render;
pub mod tiles;

pub use iterate::{iterate, julia, mandelbrot2, mandelbrot3, mandelbrot4};
pub use pixel_buffer::{BlockRegion, PixelBuffer};
pub use raster::RasterFormat;
pub use render::{render_image, resolve_regime};
pub use scheduler::{default_worker_threads, TileScheduler};
pub use tile_render::{render_block, render_pixel};
pub use tiles::generate_blocks;

// Re-export core types for convenience
pub use fractgen_core::*;
