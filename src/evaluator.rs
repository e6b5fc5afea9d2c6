// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time evaluation of a single pixel.
//!
//! Both fractals iterate `z <- z^2 + c`.  For the Mandelbrot set the
//! pixel's point is `c` and `z` starts at zero; for a Julia set the
//! pixel's point is the starting `z` and `c` is a constant fixed when
//! the evaluator is built.  Points that escape are colored from a
//! continuous iteration count, so neighbouring escape counts blend into
//! each other instead of forming bands.

use num::Complex;
use std::f64::consts::LN_2;
use std::sync::Arc;

use crate::color::{Color, Palette};
use crate::planes::{Pixel, PlaneMapper};

/// Escape radius used for the Mandelbrot set: `radius^2 == 2^16`.
pub const MANDELBROT_ESCAPE_RADIUS: f64 = 256.0;

/// Escape radius used for Julia sets.
pub const JULIA_ESCAPE_RADIUS: f64 = 100.0;

/// Which fractal to draw.  Chosen once, when the explorer is built.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FractalKind {
    /// The point under each pixel is the recurrence parameter.
    Mandelbrot,
    /// The point under each pixel seeds the recurrence, whose parameter
    /// is this constant.
    Julia(Complex<f64>),
}

/// What happened to a point under iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// Hit the iteration cap, or the arithmetic stopped being finite.
    Interior,
    /// Left the escape disk after `iterations` steps, at `z`.
    Escaped {
        /// Steps taken
        iterations: u32,
        /// The first iterate outside the disk
        z: Complex<f64>,
    },
}

/// Colors pixels for one fractal.
#[derive(Clone, Debug)]
pub struct Evaluator {
    kind: FractalKind,
    max_iterations: u32,
    escape_radius_sq: f64,
    palette: Arc<Palette>,
}

impl Evaluator {
    /// Constructor.  `escape_radius` is the radius itself, not its
    /// square.
    pub fn new(
        kind: FractalKind,
        max_iterations: u32,
        escape_radius: f64,
        palette: Arc<Palette>,
    ) -> Evaluator {
        Evaluator {
            kind,
            max_iterations,
            escape_radius_sq: escape_radius * escape_radius,
            palette,
        }
    }

    /// A Mandelbrot evaluator with the customary radius.
    pub fn mandelbrot(max_iterations: u32, palette: Arc<Palette>) -> Evaluator {
        Evaluator::new(
            FractalKind::Mandelbrot,
            max_iterations,
            MANDELBROT_ESCAPE_RADIUS,
            palette,
        )
    }

    /// A Julia evaluator for parameter `c` with the customary radius.
    pub fn julia(c: Complex<f64>, max_iterations: u32, palette: Arc<Palette>) -> Evaluator {
        Evaluator::new(
            FractalKind::Julia(c),
            max_iterations,
            JULIA_ESCAPE_RADIUS,
            palette,
        )
    }

    /// The fractal being drawn.
    pub fn kind(&self) -> FractalKind {
        self.kind
    }

    /// The iteration cap.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The palette escape counts are looked up in.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Iterates the recurrence for `point` until it leaves the escape
    /// disk or the cap is reached.
    pub fn escape_time(&self, point: Complex<f64>) -> Escape {
        let (mut z, c) = match self.kind {
            FractalKind::Mandelbrot => (Complex::new(0.0, 0.0), point),
            FractalKind::Julia(c) => (point, c),
        };
        // A Mandelbrot orbit sitting exactly on the radius is still
        // inside; a Julia orbit there has already escaped.
        let inside = |z: Complex<f64>| match self.kind {
            FractalKind::Mandelbrot => z.norm_sqr() <= self.escape_radius_sq,
            FractalKind::Julia(_) => z.norm_sqr() < self.escape_radius_sq,
        };
        let mut iterations = 0;
        while iterations < self.max_iterations && inside(z) {
            z = z * z + c;
            iterations += 1;
        }
        if iterations >= self.max_iterations || !z.norm_sqr().is_finite() {
            return Escape::Interior;
        }
        Escape::Escaped { iterations, z }
    }

    /// The continuous escape count `n + 1 - log2(log2(|z|))`, or `None`
    /// for points that never escape.
    pub fn smooth_count(&self, point: Complex<f64>) -> Option<f64> {
        match self.escape_time(point) {
            Escape::Interior => None,
            Escape::Escaped { iterations, z } => {
                let log_zn = z.norm_sqr().ln() / 2.0;
                let nu = (log_zn / LN_2).ln() / LN_2;
                let k = f64::from(iterations) + 1.0 - nu;
                if k.is_finite() {
                    Some(k)
                } else {
                    None
                }
            }
        }
    }

    /// The color for a point of the complex plane.
    pub fn color_at(&self, point: Complex<f64>) -> Color {
        match self.smooth_count(point) {
            Some(k) => self.palette.interpolate(k),
            None => Color::INTERIOR,
        }
    }

    /// The color for screen pixel `(x, y)` under `mapper`.
    #[inline]
    pub fn evaluate(&self, mapper: &PlaneMapper, x: usize, y: usize) -> Color {
        self.color_at(mapper.pixel_to_point(Pixel(x, y)))
    }
}
