// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The scheduler: drives every pixel of an image through the
//! viewport transform, the escape iteration, and the smooth colorer,
//! spread across a pool of scoped worker threads.
//!
//! Two distribution strategies are supported.  The static partition
//! hands each worker a contiguous band of rows up front; the
//! producer/consumer strategy streams individual pixels through a
//! bounded queue.  Because a pixel's color is a pure function of its
//! coordinates and the render configuration, the two produce
//! byte-identical buffers at any worker count, and the choice is purely
//! a scheduling trade-off.

extern crate crossbeam;

use crossbeam::channel::bounded;
use itertools::iproduct;

use buffer::{write_rgb, PixelBuffer, BYTES_PER_PIXEL};
use errors::{Error, Result};
use escape::Fractal;
use palette::Palette;
use smooth::color_for;
use viewport::{Camera, Viewport};

/// Worker-pool size used when nothing else is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// Task-queue capacity used when nothing else is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 20;

/// One unit of work: compute the pixel at `(x, y)`.  Tasks carry no
/// relationship to each other; any worker may take any task in any
/// order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

/// How the scheduler spreads pixels over its workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Split the image into contiguous row bands, one scoped worker per
    /// band, writing into disjoint slices of the buffer.  No queue, no
    /// locks; the scope exit is the join.
    StaticPartition,
    /// A producer thread streams every pixel as a `Task` through a
    /// bounded queue to a fixed consumer pool, and computed colors come
    /// back over a second bounded queue to the scheduling thread, which
    /// owns the buffer.
    ProducerConsumer,
}

/// A configured scheduler, reusable across render passes.
#[derive(Copy, Clone, Debug)]
pub struct Renderer {
    workers: usize,
    strategy: Strategy,
    queue_capacity: usize,
}

impl Renderer {
    /// Builds a scheduler with the given pool size and strategy.  Zero
    /// workers could make no progress and is rejected.
    pub fn new(workers: usize, strategy: Strategy) -> Result<Renderer> {
        if workers == 0 {
            return Err(Error::InvalidConfiguration(
                "a renderer needs at least one worker".to_string(),
            ));
        }
        Ok(Renderer {
            workers,
            strategy,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        })
    }

    /// Sets the task-queue bound for the producer/consumer strategy.
    /// Zero is a legal rendezvous queue; the static partition ignores
    /// this entirely.
    pub fn queue_capacity(mut self, capacity: usize) -> Renderer {
        self.queue_capacity = capacity;
        self
    }

    /// Renders one image.  Every cell of the returned buffer has been
    /// written exactly once; a zero-area image comes back empty without
    /// spawning anything.
    pub fn render(
        &self,
        fractal: &Fractal,
        camera: Camera,
        palette: &Palette,
        width: usize,
        height: usize,
    ) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        if width == 0 || height == 0 {
            return buffer;
        }
        let viewport = Viewport::new(width, height, camera, fractal.extents);
        match self.strategy {
            Strategy::StaticPartition => {
                self.render_bands(fractal, &viewport, palette, &mut buffer)
            }
            Strategy::ProducerConsumer => {
                self.render_queue(fractal, &viewport, palette, &mut buffer)
            }
        }
        buffer
    }

    // Band worker indexes are band-relative; `top` restores the image
    // row for the viewport.
    fn render_bands(
        &self,
        fractal: &Fractal,
        viewport: &Viewport,
        palette: &Palette,
        buffer: &mut PixelBuffer,
    ) {
        let width = buffer.width();
        let rows_per_band = (buffer.height() + self.workers - 1) / self.workers;
        crossbeam::scope(|spawner| {
            let bands: Vec<&mut [u8]> = buffer.bands_mut(rows_per_band).collect();
            for (index, band) in bands.into_iter().enumerate() {
                let top = index * rows_per_band;
                spawner.spawn(move |_| {
                    let rows = band.len() / (width * BYTES_PER_PIXEL);
                    for row in 0..rows {
                        for x in 0..width {
                            let point = viewport.to_plane(x, top + row);
                            let color =
                                color_for(fractal.iterate(point), palette, fractal.color_scale);
                            write_rgb(band, row * width + x, color);
                        }
                    }
                });
            }
        })
        .unwrap();
    }

    fn render_queue(
        &self,
        fractal: &Fractal,
        viewport: &Viewport,
        palette: &Palette,
        buffer: &mut PixelBuffer,
    ) {
        let width = buffer.width();
        let height = buffer.height();
        crossbeam::scope(|spawner| {
            let (task_tx, task_rx) = bounded::<Task>(self.queue_capacity);
            let (done_tx, done_rx) = bounded(self.queue_capacity);

            // Consumers go up before the producer.  The task queue is
            // bounded, so the producer runs ahead only by the queue
            // depth and otherwise sits blocked waiting for the pool.
            for _ in 0..self.workers {
                let task_rx = task_rx.clone();
                let done_tx = done_tx.clone();
                spawner.spawn(move |_| {
                    for task in task_rx {
                        let point = viewport.to_plane(task.x, task.y);
                        let color =
                            color_for(fractal.iterate(point), palette, fractal.color_scale);
                        done_tx.send((task, color)).unwrap();
                    }
                });
            }
            // The drain below must see the done channel disconnect once
            // the last consumer finishes, so the originals go away here.
            drop(task_rx);
            drop(done_tx);

            spawner.spawn(move |_| {
                for (x, y) in iproduct!(0..width, 0..height) {
                    task_tx.send(Task { x, y }).unwrap();
                }
                // Dropping the sender closes the queue; exhaustion is
                // the consumers' termination signal.  A disconnected
                // channel still yields everything already queued, so no
                // task is lost at close.
            });

            for (task, color) in done_rx {
                buffer.set(task.x, task.y, color);
            }
        })
        .unwrap();
    }
}

impl Default for Renderer {
    /// Four queue-fed workers with the stock queue bound.
    fn default() -> Renderer {
        Renderer {
            workers: DEFAULT_WORKERS,
            strategy: Strategy::ProducerConsumer,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// One-call rendering: builds a scheduler and runs a full pass.
pub fn render_image(
    width: usize,
    height: usize,
    fractal: &Fractal,
    camera: Camera,
    palette: &Palette,
    workers: usize,
    strategy: Strategy,
) -> Result<PixelBuffer> {
    let renderer = Renderer::new(workers, strategy)?;
    Ok(renderer.render(fractal, camera, palette, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Rgb;

    #[test]
    fn zero_workers_are_rejected() {
        match Renderer::new(0, Strategy::StaticPartition) {
            Err(Error::InvalidConfiguration(_)) => {}
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn defaults_match_the_stock_configuration() {
        let renderer = Renderer::default();
        assert_eq!(renderer.workers, DEFAULT_WORKERS);
        assert_eq!(renderer.strategy, Strategy::ProducerConsumer);
        assert_eq!(renderer.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn strategies_agree_on_mandelbrot() {
        let fractal = Fractal::mandelbrot();
        let palette = Palette::mandelbrot_default();
        let baseline = Renderer::new(1, Strategy::StaticPartition)
            .unwrap()
            .render(&fractal, Camera::default(), &palette, 64, 48);
        for &workers in &[1usize, 2, 8] {
            for &strategy in &[Strategy::StaticPartition, Strategy::ProducerConsumer] {
                let image = Renderer::new(workers, strategy)
                    .unwrap()
                    .render(&fractal, Camera::default(), &palette, 64, 48);
                assert_eq!(
                    image.as_raw(),
                    baseline.as_raw(),
                    "strategy {:?} with {} workers diverged",
                    strategy,
                    workers
                );
            }
        }
    }

    #[test]
    fn strategies_agree_on_julia() {
        let fractal = Fractal::julia();
        let palette = Palette::julia_default();
        let baseline = Renderer::new(1, Strategy::StaticPartition)
            .unwrap()
            .render(&fractal, Camera::default(), &palette, 32, 24);
        for &workers in &[1usize, 2, 8] {
            for &strategy in &[Strategy::StaticPartition, Strategy::ProducerConsumer] {
                let image = Renderer::new(workers, strategy)
                    .unwrap()
                    .render(&fractal, Camera::default(), &palette, 32, 24);
                assert_eq!(
                    image.as_raw(),
                    baseline.as_raw(),
                    "strategy {:?} with {} workers diverged",
                    strategy,
                    workers
                );
            }
        }
    }

    #[test]
    fn center_of_the_default_mandelbrot_window_is_black() {
        // Pixel (5, 4) of a 10 x 8 image maps exactly to (-0.75, 0),
        // inside the main cardioid.
        let image = Renderer::default().render(
            &Fractal::mandelbrot(),
            Camera::default(),
            &Palette::mandelbrot_default(),
            10,
            8,
        );
        assert_eq!(image.get(5, 4), Rgb::BLACK);
    }

    #[test]
    fn zero_area_images_render_empty() {
        let renderer = Renderer::new(4, Strategy::ProducerConsumer).unwrap();
        let fractal = Fractal::mandelbrot();
        let palette = Palette::mandelbrot_default();
        for &(w, h) in &[(0usize, 0usize), (5, 0), (0, 5)] {
            let image = renderer.render(&fractal, Camera::default(), &palette, w, h);
            assert_eq!(image.width(), w);
            assert_eq!(image.height(), h);
            assert!(image.as_raw().is_empty());
        }
    }

    #[test]
    fn tiny_queue_capacity_changes_nothing() {
        let fractal = Fractal::mandelbrot();
        let palette = Palette::mandelbrot_default();
        let baseline = Renderer::new(1, Strategy::StaticPartition)
            .unwrap()
            .render(&fractal, Camera::default(), &palette, 16, 12);
        for &capacity in &[0usize, 1] {
            let image = Renderer::new(2, Strategy::ProducerConsumer)
                .unwrap()
                .queue_capacity(capacity)
                .render(&fractal, Camera::default(), &palette, 16, 12);
            assert_eq!(image.as_raw(), baseline.as_raw());
        }
    }

    #[test]
    fn more_workers_than_rows_still_covers_the_image() {
        let fractal = Fractal::mandelbrot();
        let palette = Palette::mandelbrot_default();
        let baseline = Renderer::new(1, Strategy::StaticPartition)
            .unwrap()
            .render(&fractal, Camera::default(), &palette, 16, 3);
        let image = Renderer::new(8, Strategy::StaticPartition)
            .unwrap()
            .render(&fractal, Camera::default(), &palette, 16, 3);
        assert_eq!(image.as_raw(), baseline.as_raw());
    }

    #[test]
    fn the_free_function_matches_the_renderer() {
        let fractal = Fractal::julia();
        let palette = Palette::julia_default();
        let via_renderer = Renderer::new(3, Strategy::ProducerConsumer)
            .unwrap()
            .render(&fractal, Camera::default(), &palette, 16, 12);
        let via_free = render_image(
            16,
            12,
            &fractal,
            Camera::default(),
            &palette,
            3,
            Strategy::ProducerConsumer,
        )
        .unwrap();
        assert_eq!(via_free.as_raw(), via_renderer.as_raw());

        assert!(render_image(
            16,
            12,
            &fractal,
            Camera::default(),
            &palette,
            0,
            Strategy::ProducerConsumer
        )
        .is_err());
    }
}
