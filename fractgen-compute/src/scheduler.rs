//! Parallel block rendering over a scoped worker pool.

use crate::pixel_buffer::{BlockRegion, PixelBuffer};
use crate::tile_render::render_block;
use crate::tiles::generate_blocks;
use crossbeam::queue::SegQueue;
use fractgen_core::{
    FractalError, FractalSpec, Palette, Real, RenderSettings, Result, ViewWindow,
    DEFAULT_BLOCK_SIZE, DEFAULT_WORKERS_PER_CPU,
};
use std::any::Any;
use std::time::Instant;

/// Splits an image into blocks and renders them on a pool of threads.
///
/// Each worker pulls block regions off a shared queue until it is empty.
/// Regions are disjoint slices of the output buffer, so workers write
/// without any locking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileScheduler {
    block_size: u32,
    worker_threads: usize,
}

impl Default for TileScheduler {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            worker_threads: default_worker_threads(DEFAULT_WORKERS_PER_CPU),
        }
    }
}

/// `workers_per_cpu` threads for every logical CPU.
pub fn default_worker_threads(workers_per_cpu: usize) -> usize {
    num_cpus::get().saturating_mul(workers_per_cpu).max(1)
}

impl TileScheduler {
    pub fn new(block_size: u32, worker_threads: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(FractalError::InvalidSettings(
                "block size must be positive".to_string(),
            ));
        }
        if worker_threads == 0 {
            return Err(FractalError::InvalidSettings(
                "worker count must be positive".to_string(),
            ));
        }
        Ok(Self {
            block_size,
            worker_threads,
        })
    }

    pub fn from_settings(settings: &RenderSettings) -> Result<Self> {
        settings.validate()?;
        let workers = settings
            .worker_threads
            .unwrap_or_else(|| default_worker_threads(settings.workers_per_cpu));
        Self::new(settings.block_size, workers)
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Render `view` and return the finished raster.
    ///
    /// Blocks the calling thread until every block is done. A panic on a
    /// worker is re-raised here.
    pub fn render<R: Real>(
        &self,
        spec: &FractalSpec,
        view: &ViewWindow<R>,
        palette: &Palette,
    ) -> Result<PixelBuffer> {
        let started = Instant::now();
        let (width, height) = (view.image_width(), view.image_height());
        let blocks = generate_blocks(width, height, self.block_size);
        let workers = self.worker_threads.min(blocks.len()).max(1);

        let mut buffer = PixelBuffer::new(width, height);
        {
            let queue: SegQueue<BlockRegion<'_>> = SegQueue::new();
            for region in buffer.regions_mut(&blocks)? {
                queue.push(region);
            }
            let queue = &queue;

            let outcome = crossbeam::scope(|scope| {
                for worker in 0..workers {
                    scope.spawn(move |_| {
                        while let Some(mut region) = queue.pop() {
                            render_block(&mut region, view, spec, palette);
                            log::trace!("worker {} finished {:?}", worker, region.block());
                        }
                    });
                }
            });
            if let Err(panic) = outcome {
                // The scope collects every worker's payload; re-raise the first.
                let payload: Box<dyn Any + Send> =
                    match panic.downcast::<Vec<Box<dyn Any + Send + 'static>>>() {
                        Ok(mut payloads) if !payloads.is_empty() => payloads.swap_remove(0),
                        Ok(_) => Box::new("render worker panicked"),
                        Err(other) => other,
                    };
                std::panic::resume_unwind(payload);
            }
        }

        log::debug!(
            "rendered {}x{} {} in {} blocks on {} workers, {:.1?}",
            width,
            height,
            spec.kind(),
            blocks.len(),
            workers,
            started.elapsed()
        );
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_render::render_pixel;
    use fractgen_core::{ColorStop, FractalKind};

    /// Number type whose multiplication panics, so any worker that maps a
    /// pixel dies.
    #[derive(Clone, Debug, PartialEq, PartialOrd)]
    struct Tripwire(f64);

    impl Real for Tripwire {
        fn from_f64(value: f64, _precision_bits: usize) -> Self {
            Tripwire(value)
        }

        fn parse(value: &str, precision_bits: usize) -> Result<Self> {
            <f64 as Real>::parse(value, precision_bits).map(Tripwire)
        }

        fn to_f64(&self) -> f64 {
            self.0
        }

        fn precision_bits(&self) -> usize {
            53
        }

        fn add(&self, other: &Self) -> Self {
            Tripwire(self.0 + other.0)
        }

        fn sub(&self, other: &Self) -> Self {
            Tripwire(self.0 - other.0)
        }

        fn mul(&self, _other: &Self) -> Self {
            panic!("tripwire multiplied");
        }

        fn div(&self, other: &Self) -> Self {
            Tripwire(self.0 / other.0)
        }

        fn abs(&self) -> Self {
            Tripwire(self.0.abs())
        }
    }

    fn palette() -> Palette {
        Palette::new(vec![
            ColorStop::new([255, 255, 255], 64),
            ColorStop::new([0, 64, 128], 64),
            ColorStop::new([255, 128, 0], 64),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_zero_block_size_and_workers() {
        assert!(TileScheduler::new(0, 4).is_err());
        assert!(TileScheduler::new(64, 0).is_err());
    }

    #[test]
    fn explicit_worker_count_wins() {
        let settings = RenderSettings {
            worker_threads: Some(3),
            block_size: 16,
            ..RenderSettings::default()
        };
        let scheduler = TileScheduler::from_settings(&settings).unwrap();
        assert_eq!(scheduler.worker_threads(), 3);
        assert_eq!(scheduler.block_size(), 16);
    }

    #[test]
    fn default_pool_scales_with_cpus() {
        let scheduler = TileScheduler::default();
        assert_eq!(scheduler.worker_threads(), num_cpus::get() * 2);
        assert_eq!(scheduler.block_size(), 64);
    }

    #[test_log::test]
    fn parallel_render_matches_serial_pixels() {
        let view = ViewWindow::<f64>::from_f64(-0.6, 0.1, 2.5, 37, 23, 53).unwrap();
        let spec = FractalSpec::new(FractalKind::Mandelbrot2, 80, 256.0).unwrap();
        let palette = palette();
        let buffer = TileScheduler::new(8, 4)
            .unwrap()
            .render(&spec, &view, &palette)
            .unwrap();

        assert_eq!(buffer.width(), 37);
        assert_eq!(buffer.height(), 23);
        for y in 0..23 {
            for x in 0..37 {
                assert_eq!(
                    buffer.pixel(x, y),
                    Some(render_pixel(&view, &spec, &palette, x, y))
                );
            }
        }
    }

    #[test_log::test]
    fn single_worker_and_many_workers_agree() {
        let view = ViewWindow::<f64>::from_f64(0.0, 0.0, 3.0, 50, 40, 53).unwrap();
        let spec = FractalSpec::new(FractalKind::Julia { kr: -0.2, ki: 0.8 }, 100, 256.0).unwrap();
        let palette = palette();

        let serial = TileScheduler::new(64, 1).unwrap().render(&spec, &view, &palette).unwrap();
        let parallel = TileScheduler::new(7, 16).unwrap().render(&spec, &view, &palette).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    #[should_panic(expected = "tripwire multiplied")]
    fn worker_panic_is_raised_on_the_caller() {
        let view = ViewWindow::<Tripwire>::from_f64(0.0, 0.0, 4.0, 32, 32, 53).unwrap();
        let spec = FractalSpec::new(FractalKind::Mandelbrot2, 10, 4.0).unwrap();
        let _ = TileScheduler::new(8, 4).unwrap().render(&spec, &view, &palette());
    }
}
