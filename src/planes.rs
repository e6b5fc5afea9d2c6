//! Contains the Viewport, which describes which rectangle of the
//! complex plane is visible, and the PlaneMapper, which maps pixels
//! of an integral plane with its origin at the upper left onto that
//! rectangle.  The complex plane has its imaginary axis pointing up,
//! so screen rows are flipped on the way through.
use num::Complex;

/// Describes the width and height of a rectangle, either in pixels or
/// in complex-plane units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region<T> {
    /// Horizontal extent
    pub width: T,
    /// Vertical extent
    pub height: T,
}

impl<T> Region<T> {
    /// Constructor.
    pub fn new(width: T, height: T) -> Region<T> {
        Region { width, height }
    }
}

/// Describes the column, row of a pixel on the integral plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel(pub usize, pub usize);

/// The part of the complex plane currently on screen.  Only the
/// coordinator changes it, and only while no worker is drawing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// The complex number under the lower-left corner of the canvas.
    pub offset: Complex<f64>,
    /// How much of the complex plane the whole canvas spans.
    pub fractal_size: Region<f64>,
    /// Accumulated magnification relative to the initial view.
    pub zoom_level: f64,
}

impl Viewport {
    /// A viewport centered on `center` whose shorter side spans
    /// `base_extent` units of the complex plane.
    pub fn new(canvas: Region<usize>, center: Complex<f64>, base_extent: f64) -> Viewport {
        let fractal_size = Viewport::fit(canvas, base_extent, 1.0);
        Viewport {
            offset: Complex::new(
                center.re - fractal_size.width / 2.0,
                center.im - fractal_size.height / 2.0,
            ),
            fractal_size,
            zoom_level: 1.0,
        }
    }

    /// The complex-plane extent that keeps the canvas aspect ratio with
    /// the shorter side spanning `base_extent / zoom_level`.
    pub fn fit(canvas: Region<usize>, base_extent: f64, zoom_level: f64) -> Region<f64> {
        let (w, h) = (canvas.width as f64, canvas.height as f64);
        if canvas.width < canvas.height {
            Region::new(base_extent / zoom_level, (base_extent / w * h) / zoom_level)
        } else {
            Region::new((base_extent / h * w) / zoom_level, base_extent / zoom_level)
        }
    }

    /// Maps a (possibly fractional) screen position to the complex
    /// plane.
    pub fn screen_to_fractal(&self, canvas: Region<usize>, x: f64, y: f64) -> Complex<f64> {
        let (w, h) = (canvas.width as f64, canvas.height as f64);
        Complex::new(
            x * (self.fractal_size.width / w) + self.offset.re,
            (h - y) * (self.fractal_size.height / h) + self.offset.im,
        )
    }

    /// Inverse of `screen_to_fractal`.
    pub fn fractal_to_screen(&self, canvas: Region<usize>, point: Complex<f64>) -> (f64, f64) {
        let (w, h) = (canvas.width as f64, canvas.height as f64);
        let x = (point.re - self.offset.re) / (self.fractal_size.width / w);
        let y = h - (point.im - self.offset.im) / (self.fractal_size.height / h);
        (x, y)
    }

    /// Moves the view so that content follows a drag of `(dx, dy)`
    /// screen pixels.
    pub fn pan(&mut self, canvas: Region<usize>, dx: f64, dy: f64) {
        let (w, h) = (canvas.width as f64, canvas.height as f64);
        self.offset.re -= dx * (self.fractal_size.width / w);
        self.offset.im += dy * (self.fractal_size.height / h);
    }

    /// Magnifies by `amount` while keeping the complex number under the
    /// screen position `focus` in place.
    pub fn zoom_about(&mut self, canvas: Region<usize>, focus: (f64, f64), amount: f64) {
        let before = self.screen_to_fractal(canvas, focus.0, focus.1);
        self.zoom_level *= amount;
        self.fractal_size.width /= amount;
        self.fractal_size.height /= amount;
        let after = self.screen_to_fractal(canvas, focus.0, focus.1);
        self.offset = self.offset + (before - after);
    }

    /// Recomputes the visible extent for a new canvas size, keeping the
    /// aspect ratio and the current zoom level.  The lower-left corner
    /// stays put.
    pub fn resize(&mut self, canvas: Region<usize>, base_extent: f64) {
        self.fractal_size = Viewport::fit(canvas, base_extent, self.zoom_level);
    }
}

/// A viewport frozen together with the canvas size it is drawn onto.
/// Workers build one per tile and use it to find the complex number
/// behind each pixel.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    viewport: Viewport,
    canvas: Region<usize>,
}

impl PlaneMapper {
    /// Constructor.
    pub fn new(viewport: Viewport, canvas: Region<usize>) -> PlaneMapper {
        PlaneMapper { viewport, canvas }
    }

    /// The integral plane being mapped.
    pub fn canvas(&self) -> Region<usize> {
        self.canvas
    }

    /// Given the column and row of a pixel, return the complex number
    /// it shows.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        self.viewport
            .screen_to_fractal(self.canvas, pixel.0 as f64, pixel.1 as f64)
    }

    /// Given a complex number, return the pixel it lands on, if that
    /// pixel is on the canvas.
    pub fn point_to_pixel(&self, point: Complex<f64>) -> Option<Pixel> {
        let (x, y) = self.viewport.fractal_to_screen(self.canvas, point);
        let (x, y) = (x.round(), y.round());
        if x < 0.0 || y < 0.0 || x >= self.canvas.width as f64 || y >= self.canvas.height as f64 {
            return None;
        }
        Some(Pixel(x as usize, y as usize))
    }
}
