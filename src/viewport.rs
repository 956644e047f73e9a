//! Maps pixel coordinates to points on the complex plane.  The image is
//! an integral grid with its origin at the top left; the plane window is
//! described by a `PlaneExtents` (how much of the plane is visible and
//! where its center sits) and a `Camera` (pan offsets and a zoom factor
//! that narrows the window).  Every fractal variant carries its own
//! extents; the camera is the user's knob.

use num::Complex;

/// Pan and zoom state.  Offsets are in pixel units and are scaled by the
/// zoom factor, so a preset found at one zoom level stays meaningful at
/// another.  `zoom` must be positive; callers enforce that before a
/// render starts, and the transform divides by it without checking.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// Horizontal pan, in pixels.
    pub offset_x: i32,
    /// Vertical pan, in pixels.
    pub offset_y: i32,
    /// Magnification.  1.0 shows the fractal's whole default window.
    pub zoom: f64,
}

impl Camera {
    /// Builds a camera from its pan offsets and zoom factor.
    pub fn new(offset_x: i32, offset_y: i32, zoom: f64) -> Camera {
        Camera {
            offset_x,
            offset_y,
            zoom,
        }
    }

    /// Repositions the camera.  Only meaningful between render passes;
    /// the scheduler takes the camera by value when a pass begins.
    pub fn set(&mut self, offset_x: i32, offset_y: i32, zoom: f64) {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self.zoom = zoom;
    }
}

impl Default for Camera {
    /// No pan, no magnification.
    fn default() -> Camera {
        Camera::new(0, 0, 1.0)
    }
}

/// The rectangle of the complex plane a fractal wants on screen at zoom
/// 1.0: a width and height in plane units, and the offsets that place the
/// window's center.  A pixel at the image origin maps to
/// `(-center_x, -center_y)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneExtents {
    /// Plane units spanned by the image width.
    pub width: f64,
    /// Plane units spanned by the image height.
    pub height: f64,
    /// Distance from the window's left edge to plane zero.
    pub center_x: f64,
    /// Distance from the window's top edge to plane zero.
    pub center_y: f64,
}

impl PlaneExtents {
    /// Builds an extents description from its four measures.
    pub fn new(width: f64, height: f64, center_x: f64, center_y: f64) -> PlaneExtents {
        PlaneExtents {
            width,
            height,
            center_x,
            center_y,
        }
    }
}

/// The composed pixel-to-plane transform for one render pass: image
/// dimensions, camera, and plane extents, frozen together.
#[derive(Copy, Clone, Debug)]
pub struct Viewport {
    width: usize,
    height: usize,
    camera: Camera,
    extents: PlaneExtents,
}

impl Viewport {
    /// Builds the transform for an image of `width` x `height` pixels.
    pub fn new(width: usize, height: usize, camera: Camera, extents: PlaneExtents) -> Viewport {
        Viewport {
            width,
            height,
            camera,
            extents,
        }
    }

    /// Maps one pixel to its plane point.  The zoomed image is
    /// `zoom * width` pixels wide, and the pan offsets ride along in
    /// those zoomed units; the extents then scale and recenter the
    /// result.  The arithmetic order here is fixed: both scheduling
    /// strategies and the tests rely on every pixel going through the
    /// identical float operations.
    pub fn to_plane(&self, px: usize, py: usize) -> Complex<f64> {
        let full_width = self.camera.zoom * (self.width as f64);
        let full_height = self.camera.zoom * (self.height as f64);
        let re = ((px as f64 + (self.camera.offset_x as f64) * self.camera.zoom)
            * self.extents.width
            / full_width)
            - self.extents.center_x;
        let im = ((py as f64 + (self.camera.offset_y as f64) * self.camera.zoom)
            * self.extents.height
            / full_height)
            - self.extents.center_y;
        Complex::new(re, im)
    }
}
