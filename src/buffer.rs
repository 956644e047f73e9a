//! The render target: a packed, row-major RGB byte buffer.  The
//! scheduler owns it for the duration of a pass, splits it into
//! disjoint row bands when partitioning statically, and hands it off by
//! value to the encoder once every pixel has been written.

use std::slice::ChunksMut;

use palette::Rgb;

pub(crate) const BYTES_PER_PIXEL: usize = 3;

/// A width x height grid of RGB cells, stored as packed bytes in
/// row-major order.  Freshly constructed buffers are black.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a black buffer for a `width` x `height` image.
    pub fn new(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            data: vec![0; width * height * BYTES_PER_PIXEL],
        }
    }

    /// Pixels per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Writes one cell.  `x` and `y` must lie inside the image.
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        let pixel = y * self.width + x;
        write_rgb(&mut self.data, pixel, color);
    }

    /// Reads one cell back.  `x` and `y` must lie inside the image.
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        let at = (y * self.width + x) * BYTES_PER_PIXEL;
        Rgb::new(self.data[at], self.data[at + 1], self.data[at + 2])
    }

    /// The packed bytes, for encoders that borrow.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// The packed bytes, for encoders that take ownership.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Splits the buffer into mutable bands of `rows_per_band` whole
    /// rows (the last band may be shorter).  The bands are disjoint, so
    /// scoped workers can fill them concurrently with no locking.  Both
    /// `rows_per_band` and the image width must be nonzero.
    pub fn bands_mut(&mut self, rows_per_band: usize) -> ChunksMut<u8> {
        self.data.chunks_mut(rows_per_band * self.width * BYTES_PER_PIXEL)
    }
}

/// Writes `color` at pixel index `pixel` of a packed RGB region.  Band
/// workers use this with band-relative pixel indexes.
pub(crate) fn write_rgb(region: &mut [u8], pixel: usize, color: Rgb) {
    let at = pixel * BYTES_PER_PIXEL;
    region[at] = color.r;
    region[at + 1] = color.g;
    region[at + 2] = color.b;
}
