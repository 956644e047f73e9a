#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! The Mandelbrot and Julia sets are drawn by the same experiment:
//! square a point on the complex plane and add a constant, then feed
//! the result back in, watching whether the orbit stays near the origin
//! or flies off.  For the Mandelbrot set the constant is the pixel's own
//! plane coordinate; for a Julia set every pixel shares one fixed
//! constant and the pixel supplies the starting value.  How many steps
//! the orbit survives is the raw material for the picture.
//!
//! Raw step counts paint in hard bands, one color per count.  This
//! renderer instead rescales the count by the logarithm of the final
//! orbit magnitude, landing on a fractional palette position, and
//! blends the two neighboring palette colors.  The bands dissolve into
//! continuous gradients.
//!
//! Every pixel is independent of every other, which makes the render an
//! embarrassingly parallel job.  The scheduler exploits that two ways:
//! by handing each worker a fixed band of rows, or by streaming single
//! pixels through a bounded queue to a worker pool.  Both produce
//! byte-identical images; rendering is deterministic no matter how the
//! work is carved up.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
extern crate num;

pub mod buffer;
pub mod errors;
pub mod escape;
pub mod palette;
pub mod render;
pub mod smooth;
pub mod viewport;

pub use buffer::PixelBuffer;
pub use errors::{Error, Result};
pub use escape::{EscapeResult, Fractal, DEFAULT_JULIA_C};
pub use palette::{Palette, Rgb};
pub use render::{
    render_image, Renderer, Strategy, Task, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS,
};
pub use smooth::{blend, color_for};
pub use viewport::{Camera, PlaneExtents, Viewport};
