//! Color data for the renderer: the `Rgb` triple every pixel ends up as,
//! and the `Palette`, an ordered cyclic sequence of colors that the smooth
//! colorer interpolates over.  A palette never changes once built; workers
//! share it freely by reference.

use errors::{Error, Result};

/// An 8-bit-per-channel RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// The sentinel painted for points presumed inside the set.
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Builds a color from its three channels.
    pub fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

const MANDELBROT_COLORS: [Rgb; 16] = [
    Rgb { r: 66, g: 30, b: 15 },
    Rgb { r: 25, g: 7, b: 26 },
    Rgb { r: 9, g: 1, b: 47 },
    Rgb { r: 4, g: 4, b: 73 },
    Rgb { r: 0, g: 7, b: 100 },
    Rgb { r: 12, g: 44, b: 138 },
    Rgb { r: 24, g: 82, b: 177 },
    Rgb { r: 57, g: 125, b: 209 },
    Rgb { r: 134, g: 181, b: 229 },
    Rgb { r: 211, g: 236, b: 248 },
    Rgb { r: 241, g: 233, b: 191 },
    Rgb { r: 248, g: 201, b: 95 },
    Rgb { r: 255, g: 170, b: 0 },
    Rgb { r: 204, g: 128, b: 0 },
    Rgb { r: 153, g: 87, b: 0 },
    Rgb { r: 106, g: 52, b: 3 },
];

const JULIA_COLORS: [Rgb; 23] = [
    Rgb { r: 0, g: 0, b: 51 },
    Rgb { r: 0, g: 0, b: 77 },
    Rgb { r: 0, g: 0, b: 102 },
    Rgb { r: 26, g: 26, b: 127 },
    Rgb { r: 51, g: 26, b: 153 },
    Rgb { r: 77, g: 26, b: 153 },
    Rgb { r: 77, g: 51, b: 153 },
    Rgb { r: 102, g: 51, b: 127 },
    Rgb { r: 102, g: 51, b: 127 },
    Rgb { r: 127, g: 77, b: 127 },
    Rgb { r: 153, g: 77, b: 127 },
    Rgb { r: 153, g: 77, b: 127 },
    Rgb { r: 189, g: 102, b: 102 },
    Rgb { r: 204, g: 102, b: 102 },
    Rgb { r: 204, g: 102, b: 102 },
    Rgb { r: 230, g: 127, b: 77 },
    Rgb { r: 230, g: 127, b: 51 },
    Rgb { r: 230, g: 127, b: 51 },
    Rgb { r: 230, g: 153, b: 51 },
    Rgb { r: 230, g: 153, b: 51 },
    Rgb { r: 230, g: 153, b: 51 },
    Rgb { r: 230, g: 189, b: 51 },
    Rgb { r: 230, g: 189, b: 77 },
];

/// An ordered, cyclic sequence of colors.  Lookups wrap modulo the length,
/// so the smooth colorer can walk the palette forever in either direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Builds a palette from an ordered color list.  An empty list cannot
    /// color anything and is rejected.  A single color is degenerate but
    /// well-defined: every lookup and every blend returns that color.
    pub fn new(colors: Vec<Rgb>) -> Result<Palette> {
        if colors.is_empty() {
            return Err(Error::InvalidConfiguration(
                "a palette needs at least one color".to_string(),
            ));
        }
        Ok(Palette { colors })
    }

    /// The earth-and-blues gradient the Mandelbrot renderer ships with.
    pub fn mandelbrot_default() -> Palette {
        Palette {
            colors: MANDELBROT_COLORS.to_vec(),
        }
    }

    /// The dusk gradient the Julia renderer ships with.
    pub fn julia_default() -> Palette {
        Palette {
            colors: JULIA_COLORS.to_vec(),
        }
    }

    /// Number of colors in one cycle.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false after construction; kept for the usual pairing.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Cyclic lookup.  Negative indexes wrap to the tail end, so callers
    /// can feed any signed offset without range bookkeeping.
    pub fn cycle(&self, index: i64) -> Rgb {
        let len = self.colors.len() as i64;
        self.colors[index.rem_euclid(len) as usize]
    }
}
