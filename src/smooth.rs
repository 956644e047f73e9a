//! Continuous coloring of escape results.  A raw iteration count paints
//! the image in hard bands, one per count; rescaling the count by the
//! logarithm of the final orbit magnitude spreads each band across a
//! fractional palette position, and blending the two palette neighbors
//! at that position removes the contour lines entirely.

use std::f64::consts::LN_2;

use escape::EscapeResult;
use palette::{Palette, Rgb};

/// Converts one escape result into a color.
///
/// Points that never escaped take the sentinel black.  Escapes on
/// iteration 0 or 1 sit too close to the seed for the logarithmic
/// rescale and take the sentinel as well.  Everything else lands on a
/// fractional palette index
///
/// ```text
/// index = iterations / divisor + 1 - ln(ln(|z|^2) / 2 / ln 2) / ln 2
/// ```
///
/// and blends the palette colors on either side of it.  The index is
/// wrapped onto the palette with a true floor and Euclidean remainder,
/// so the rare orbit whose rescale overshoots into negative territory
/// cycles around to the palette tail instead of collapsing to the first
/// entry.  `divisor` stretches each color over that many iterations; the
/// Julia variant uses 10 to tame banding, Mandelbrot uses 1.
pub fn color_for(result: EscapeResult, palette: &Palette, divisor: f64) -> Rgb {
    if !result.escaped || result.iterations <= 1 {
        return Rgb::BLACK;
    }

    let mut index = result.iterations as f64 / divisor;
    let zn = result.z.norm_sqr().ln() / 2.0;
    let nu = (zn / LN_2).ln() / LN_2;
    index = index + 1.0 - nu;

    let floor = index.floor();
    let frac = index - floor;
    let lower = palette.cycle(floor as i64);
    let upper = palette.cycle(floor as i64 + 1);
    blend(lower, upper, frac)
}

/// Linear interpolation between two colors, per channel, with the result
/// truncated (not rounded) to 8 bits.  The truncation is visible in the
/// output and is kept as-is.  `frac` 0 returns `first` exactly, 1
/// returns `second`; callers keep it within [0, 1].
pub fn blend(first: Rgb, second: Rgb, frac: f64) -> Rgb {
    Rgb {
        r: (first.r as f64 * (1.0 - frac) + second.r as f64 * frac) as u8,
        g: (first.g as f64 * (1.0 - frac) + second.g as f64 * frac) as u8,
        b: (first.b as f64 * (1.0 - frac) + second.b as f64 * frac) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    fn escaped_at(iterations: usize, z: Complex<f64>) -> EscapeResult {
        EscapeResult {
            iterations,
            escaped: true,
            z,
        }
    }

    #[test]
    fn inside_points_take_the_sentinel() {
        let palette = Palette::mandelbrot_default();
        let inside = EscapeResult {
            iterations: 1000,
            escaped: false,
            z: Complex::new(0.3, 0.2),
        };
        assert_eq!(color_for(inside, &palette, 1.0), Rgb::BLACK);
    }

    #[test]
    fn earliest_escapes_take_the_sentinel() {
        let palette = Palette::mandelbrot_default();
        for iterations in 0..2 {
            let early = escaped_at(iterations, Complex::new(5.0, 0.0));
            assert_eq!(color_for(early, &palette, 1.0), Rgb::BLACK);
        }
    }

    #[test]
    fn blend_endpoints_are_exact() {
        let first = Rgb::new(10, 100, 200);
        let second = Rgb::new(21, 111, 211);
        assert_eq!(blend(first, second, 0.0), first);
        assert_eq!(blend(first, second, 1.0), second);
    }

    #[test]
    fn blend_truncates_toward_zero() {
        // All products here are exact dyadic fractions: each channel
        // computes to x.75 and must come out as x, not x + 1.
        let first = Rgb::new(10, 100, 200);
        let second = Rgb::new(21, 111, 211);
        assert_eq!(blend(first, second, 0.25), Rgb::new(12, 102, 202));
    }

    #[test]
    fn blend_stays_strictly_between_differing_endpoints() {
        let first = Rgb::new(10, 100, 200);
        let second = Rgb::new(21, 111, 211);
        let mid = blend(first, second, 0.5);
        assert!(mid.r > first.r && mid.r < second.r);
        assert!(mid.g > first.g && mid.g < second.g);
        assert!(mid.b > first.b && mid.b < second.b);
    }

    #[test]
    fn uniform_palette_collapses_to_its_color() {
        let palette = Palette::new(vec![Rgb::new(7, 50, 200); 3]).unwrap();
        let color = color_for(escaped_at(5, Complex::new(10.0, 0.0)), &palette, 1.0);
        // Both endpoints are the same color.  Truncation can shave at
        // most one unit off a channel; anything further off means the
        // palette lookup went wrong.
        assert!(color.r >= 6 && color.r <= 7);
        assert!(color.g >= 49 && color.g <= 50);
        assert!(color.b >= 199 && color.b <= 200);
    }

    #[test]
    fn negative_index_wraps_to_the_palette_tail() {
        // iterations 2 with divisor 10 and a far-flung final orbit puts
        // the rescaled index near -1.5: the blend must read palette
        // entries 1 and 2, not fault and not pin to entry 0.
        let palette = Palette::new(vec![
            Rgb::new(0, 0, 0),
            Rgb::new(100, 0, 0),
            Rgb::new(200, 0, 0),
        ])
        .unwrap();
        let color = color_for(escaped_at(2, Complex::new(100.0, 0.0)), &palette, 10.0);
        assert!(color.r > 100 && color.r < 200);
        assert_eq!(color.g, 0);
        assert_eq!(color.b, 0);
    }
}
