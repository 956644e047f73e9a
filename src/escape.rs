//! The escape-time iteration at the heart of the renderer.  Both fractal
//! variants run the same quadratic recurrence `z = z*z + c`; they differ
//! only in where the seed and the constant come from, and in how much
//! wandering an orbit is allowed before it counts as escaped.  Those
//! tunables ride on the `Fractal` value so the rest of the pipeline
//! never branches on the variant.

use num::Complex;
use viewport::PlaneExtents;

/// The Julia constant the renderer ships with, the classic
/// demonstration parameter whose set renders as swirling filaments.
pub const DEFAULT_JULIA_C: Complex<f64> = Complex {
    re: -0.7,
    im: 0.27015,
};

/// What one bounded orbit reported back.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeResult {
    /// Completed iterations when the loop stopped.
    pub iterations: usize,
    /// True when the orbit left the escape radius before the cap; false
    /// means the point is presumed inside the set.
    pub escaped: bool,
    /// Final orbit value.  The smooth colorer reads its magnitude.
    pub z: Complex<f64>,
}

#[derive(Copy, Clone, Debug)]
enum Formula {
    Mandelbrot,
    Julia { c: Complex<f64> },
}

/// One fractal variant plus its tuned constants.  The constants are
/// defaults, not laws: they were chosen by inspection, so they stay
/// adjustable fields rather than baked-in literals.
#[derive(Copy, Clone, Debug)]
pub struct Fractal {
    formula: Formula,
    /// Iteration cap; an orbit still bounded after this many steps is
    /// presumed inside the set.
    pub max_iterations: usize,
    /// Escape radius.  The iteration compares squared magnitudes, so
    /// this is squared once per orbit.
    pub escape_radius: f64,
    /// Divisor applied to the iteration count before smooth coloring;
    /// larger values stretch each palette color over more iterations.
    pub color_scale: f64,
    /// The plane window this variant wants on screen at zoom 1.0.
    pub extents: PlaneExtents,
}

impl Fractal {
    /// The Mandelbrot set: seed at the origin, the pixel's plane point
    /// as the constant.  Radius 2, cap 1000, window 3.5 x 2.0 framing
    /// re in [-2.5, 1.0] and im in [-1.0, 1.0].
    pub fn mandelbrot() -> Fractal {
        Fractal {
            formula: Formula::Mandelbrot,
            max_iterations: 1000,
            escape_radius: 2.0,
            color_scale: 1.0,
            extents: PlaneExtents::new(3.5, 2.0, 2.5, 1.0),
        }
    }

    /// The Julia set for the stock constant.  See [`julia_with_c`].
    ///
    /// [`julia_with_c`]: #method.julia_with_c
    pub fn julia() -> Fractal {
        Fractal::julia_with_c(DEFAULT_JULIA_C)
    }

    /// A Julia set: the pixel's plane point as the seed, a fixed `c` as
    /// the constant.  Radius 3, cap 10000, a square window spanning
    /// [-1.5, 1.5] on both axes, and a tenfold color stretch to tame
    /// banding in the slowly diverging regions.
    pub fn julia_with_c(c: Complex<f64>) -> Fractal {
        let r = 3.0;
        Fractal {
            formula: Formula::Julia { c },
            max_iterations: 10_000,
            escape_radius: r,
            color_scale: 10.0,
            extents: PlaneExtents::new(r, r, r / 2.0, r / 2.0),
        }
    }

    /// Runs the bounded orbit for one plane point.  The Mandelbrot test
    /// keeps an orbit sitting exactly on the radius; the Julia test
    /// counts the boundary as out.  Both conventions are part of the
    /// rendered output and are preserved as-is.
    pub fn iterate(&self, point: Complex<f64>) -> EscapeResult {
        let bail = self.escape_radius * self.escape_radius;
        match self.formula {
            Formula::Mandelbrot => self.orbit(Complex::new(0.0, 0.0), point, |n| n <= bail),
            Formula::Julia { c } => self.orbit(point, c, |n| n < bail),
        }
    }

    // The escape test runs before each step, so `iterations` counts
    // completed steps and the returned z is the first value that failed
    // the test (or the capped value).
    fn orbit<F>(&self, seed: Complex<f64>, c: Complex<f64>, still_in: F) -> EscapeResult
    where
        F: Fn(f64) -> bool,
    {
        let mut z = seed;
        let mut iterations = 0;
        while still_in(z.norm_sqr()) && iterations < self.max_iterations {
            z = z * z + c;
            iterations += 1;
        }
        EscapeResult {
            iterations,
            escaped: iterations < self.max_iterations,
            z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_leaves_the_mandelbrot_set() {
        let result = Fractal::mandelbrot().iterate(Complex::new(0.0, 0.0));
        assert!(!result.escaped);
        assert_eq!(result.iterations, 1000);
    }

    #[test]
    fn far_point_escapes_immediately() {
        let result = Fractal::mandelbrot().iterate(Complex::new(2.0, 2.0));
        assert!(result.escaped);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn mandelbrot_keeps_orbiting_on_the_radius() {
        // c = -2 pins the orbit at magnitude exactly 2 (0, -2, 2, 2, ...),
        // which must run to the cap under the inclusive test.
        let result = Fractal::mandelbrot().iterate(Complex::new(-2.0, 0.0));
        assert!(!result.escaped);
        assert_eq!(result.iterations, 1000);
    }

    #[test]
    fn julia_counts_the_radius_as_out() {
        // A seed sitting exactly on the radius never enters the loop.
        let result = Fractal::julia().iterate(Complex::new(3.0, 0.0));
        assert!(result.escaped);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.z, Complex::new(3.0, 0.0));
    }

    #[test]
    fn julia_origin_escapes_for_the_stock_constant() {
        // The critical orbit for the stock constant leaves radius 3 on
        // step 96, so the origin is outside the filled set.
        let result = Fractal::julia().iterate(Complex::new(0.0, 0.0));
        assert!(result.escaped);
        assert!(result.iterations < 200);
    }

    #[test]
    fn julia_with_a_zero_constant_holds_the_origin() {
        let result = Fractal::julia_with_c(Complex::new(0.0, 0.0)).iterate(Complex::new(0.0, 0.0));
        assert!(!result.escaped);
        assert_eq!(result.iterations, 10_000);
    }

    #[test]
    fn variants_carry_their_tuned_constants() {
        let m = Fractal::mandelbrot();
        assert_eq!(m.max_iterations, 1000);
        assert_eq!(m.escape_radius, 2.0);
        assert_eq!(m.color_scale, 1.0);
        assert_eq!(m.extents, PlaneExtents::new(3.5, 2.0, 2.5, 1.0));

        let j = Fractal::julia();
        assert_eq!(j.max_iterations, 10_000);
        assert_eq!(j.escape_radius, 3.0);
        assert_eq!(j.color_scale, 10.0);
        assert_eq!(j.extents, PlaneExtents::new(3.0, 3.0, 1.5, 1.5));
    }
}
