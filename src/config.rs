// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Construction-time settings for an explorer.

use num::Complex;
use std::sync::Arc;

use crate::color::Palette;
use crate::error::{ExplorerError, Result};
use crate::evaluator::{Evaluator, FractalKind, JULIA_ESCAPE_RADIUS, MANDELBROT_ESCAPE_RADIUS};

/// Default size of the worker pool.
pub const DEFAULT_WORKERS: usize = 16;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Everything fixed when an explorer is built.  The two escape radii
/// are kept apart on purpose; only the one matching `fractal` is used.
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of long-lived worker threads.
    pub workers: usize,
    /// Iteration cap per pixel.
    pub max_iterations: u32,
    /// Mandelbrot or Julia (with its constant).
    pub fractal: FractalKind,
    /// Escape radius when drawing the Mandelbrot set.
    pub mandelbrot_escape_radius: f64,
    /// Escape radius when drawing a Julia set.
    pub julia_escape_radius: f64,
    /// Complex-plane units spanned by the shorter canvas side at zoom 1.
    pub base_extent: f64,
    /// The complex number shown at the center of the initial view.
    pub center: Complex<f64>,
    /// Colors for escaped points.
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workers: DEFAULT_WORKERS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            fractal: FractalKind::Mandelbrot,
            mandelbrot_escape_radius: MANDELBROT_ESCAPE_RADIUS,
            julia_escape_radius: JULIA_ESCAPE_RADIUS,
            base_extent: 4.0,
            center: Complex::new(0.0, 0.0),
            palette: Palette::warm(),
        }
    }
}

impl Config {
    /// Defaults, drawing a Julia set for `c`.
    pub fn julia(c: Complex<f64>) -> Config {
        Config {
            fractal: FractalKind::Julia(c),
            ..Config::default()
        }
    }

    /// Fails fast on settings the explorer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers < 1 {
            return Err(ExplorerError::NoWorkers);
        }
        if self.palette.is_empty() {
            return Err(ExplorerError::InvalidPalette);
        }
        Ok(())
    }

    /// The escape radius for the configured fractal.
    pub fn escape_radius(&self) -> f64 {
        match self.fractal {
            FractalKind::Mandelbrot => self.mandelbrot_escape_radius,
            FractalKind::Julia(_) => self.julia_escape_radius,
        }
    }

    /// The evaluator these settings describe.
    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(
            self.fractal,
            self.max_iterations,
            self.escape_radius(),
            Arc::new(self.palette.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let c = Config::default();
        assert_eq!(c.workers, 16);
        assert_eq!(c.max_iterations, 1000);
        assert_eq!(c.fractal, FractalKind::Mandelbrot);
        assert_eq!(c.escape_radius() * c.escape_radius(), 65536.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn julia_picks_its_own_radius() {
        let c = Config {
            julia_escape_radius: 7.0,
            ..Config::julia(Complex::new(-0.4, 0.6))
        };
        assert_eq!(c.escape_radius(), 7.0);
        assert_eq!(c.evaluator().kind(), FractalKind::Julia(Complex::new(-0.4, 0.6)));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let c = Config {
            workers: 0,
            ..Config::default()
        };
        match c.validate() {
            Err(ExplorerError::NoWorkers) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
