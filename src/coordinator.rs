// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The public face of the explorer.
//!
//! The coordinator owns the canvas, the viewport and the worker pool,
//! and it is the only thing that ever changes the first two.  Every
//! change follows the same shape:
//!
//! 1. `stop_drawing` raises the cancellation flag, empties the queue,
//!    withdraws the "work available" signal, and blocks until every
//!    worker is idle.  After it returns no worker holds a tile, and
//!    none can claim one, because the queue is empty and only
//!    `start_drawing` refills it.
//! 2. The canvas and viewport are changed.  Nobody is writing to the
//!    canvas at this point; a display may still be reading it.
//! 3. `start_drawing` cuts a fresh set of tiles for the new state,
//!    clears the flag and wakes the pool.
//!
//! Panning by a small amount is no exception: the pixel shift below
//! relies on the pool being drained.

use num::Complex;
use std::sync::Arc;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::Config;
use crate::error::{ExplorerError, Result};
use crate::evaluator::Evaluator;
use crate::planes::{PlaneMapper, Region, Viewport};
use crate::pool::{Frame, Job, WorkerPool};
use crate::tiles::{partition, tile_edge};

/// See the module documentation.
#[derive(Debug)]
pub struct Coordinator {
    pool: WorkerPool,
    canvas: Arc<Canvas>,
    viewport: Viewport,
    base_extent: f64,
    drawing: bool,
    generation: u64,
    drains: u64,
}

impl Coordinator {
    /// Validates `config`, allocates a `width` x `height` canvas, starts
    /// the pool and begins drawing the initial view.
    pub fn new(config: Config, width: usize, height: usize) -> Result<Coordinator> {
        config.validate()?;
        let canvas = Canvas::new(width, height)?;
        canvas.fill(Color::INTERIOR);
        let viewport = Viewport::new(canvas.size(), config.center, config.base_extent);
        let pool = WorkerPool::new(config.workers, config.evaluator())?;
        let mut coordinator = Coordinator {
            pool,
            canvas: Arc::new(canvas),
            viewport,
            base_extent: config.base_extent,
            drawing: false,
            generation: 0,
            drains: 0,
        };
        coordinator.start_drawing();
        Ok(coordinator)
    }

    /// Cancels the current generation and waits until every worker is
    /// idle.  On return the queue is empty and no worker can claim a
    /// tile until `start_drawing` is called.  A second call without a
    /// `start_drawing` in between returns at once.
    pub fn stop_drawing(&mut self) {
        if !self.drawing {
            return;
        }
        let dropped = self.pool.queue().cancel();
        self.pool.barrier().wait_idle();
        self.drawing = false;
        self.drains += 1;
        debug!(
            "drained generation {} ({} tiles never started)",
            self.generation, dropped
        );
    }

    /// Cuts the canvas into tiles for the current viewport and hands
    /// them to the pool.  Drains the pool first if it is still busy, so
    /// two generations never overlap.
    pub fn start_drawing(&mut self) {
        self.stop_drawing();
        self.generation += 1;
        let size = self.canvas.size();
        let frame = Arc::new(Frame {
            canvas: self.canvas.clone(),
            mapper: PlaneMapper::new(self.viewport, size),
            generation: self.generation,
        });
        let tiles = partition(size.width, size.height, tile_edge(size.width, size.height));
        debug!(
            "generation {}: {} tiles over {}x{}",
            self.generation,
            tiles.len(),
            size.width,
            size.height
        );
        self.pool.queue().publish(tiles.into_iter().map(|tile| Job {
            tile,
            frame: frame.clone(),
        }));
        self.drawing = true;
    }

    /// Blocks until the current generation has been fully drawn,
    /// without cancelling anything.
    pub fn wait_rendered(&self) {
        if !self.drawing {
            return;
        }
        self.pool.queue().wait_empty();
        self.pool.barrier().wait_idle();
    }

    /// Replaces the canvas with one of the new size, carrying over the
    /// overlapping top-left content, and widens or narrows the view to
    /// match.  If the new buffer cannot be allocated the old canvas and
    /// view are kept, drawing resumes on them, and the error is
    /// returned.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ExplorerError::EmptyCanvas { width, height });
        }
        self.stop_drawing();
        let next = match self.canvas.resized(width, height) {
            Ok(next) => next,
            Err(err) => {
                warn!("resize to {}x{} abandoned: {}", width, height, err);
                self.start_drawing();
                return Err(err);
            }
        };
        self.canvas = Arc::new(next);
        self.viewport.resize(self.canvas.size(), self.base_extent);
        self.start_drawing();
        Ok(())
    }

    /// Drags the view by `delta` screen pixels.  A zero delta does
    /// nothing at all, not even a drain.
    pub fn pan(&mut self, delta: (f64, f64)) {
        let (dx, dy) = delta;
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        if !dx.is_finite() || !dy.is_finite() {
            debug!("ignoring pan by {:?}", delta);
            return;
        }
        self.stop_drawing();
        self.canvas.shift(dx.floor() as i64, dy.floor() as i64);
        self.viewport.pan(self.canvas.size(), dx, dy);
        self.start_drawing();
    }

    /// Magnifies by `amount` around the screen position `focus`, which
    /// stays over the same complex number.  When zooming in, the old
    /// pixels are stretched as a preview until the new ones arrive.  An
    /// amount of exactly one leaves the view untouched but still
    /// restarts drawing.
    pub fn zoom(&mut self, focus: (f64, f64), amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ExplorerError::InvalidZoom(amount));
        }
        self.stop_drawing();
        if amount != 1.0 {
            self.viewport.zoom_about(self.canvas.size(), focus, amount);
            if amount > 1.0 {
                self.canvas.magnify(focus, amount);
            }
        }
        self.start_drawing();
        Ok(())
    }

    /// A read-only handle on the canvas being drawn.  After a resize
    /// this handle keeps pointing at the old buffer; fetch a new one.
    pub fn canvas(&self) -> Arc<Canvas> {
        self.canvas.clone()
    }

    /// Current canvas size.
    pub fn size(&self) -> Region<usize> {
        self.canvas.size()
    }

    /// The current view.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The complex number under screen position `(x, y)`.
    pub fn screen_to_fractal(&self, x: f64, y: f64) -> Complex<f64> {
        self.viewport.screen_to_fractal(self.canvas.size(), x, y)
    }

    /// The evaluator the workers use.
    pub fn evaluator(&self) -> &Evaluator {
        self.pool.evaluator()
    }

    /// Whether a generation is in progress (or finished but not yet
    /// stopped).
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// How many times drawing has been (re)started.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// How many drains have actually waited on the pool.
    pub fn drains(&self) -> u64 {
        self.drains
    }

    /// Size of the worker pool.
    pub fn workers(&self) -> usize {
        self.pool.size()
    }

    /// Workers not currently working through the queue.
    pub fn idle_workers(&self) -> usize {
        self.pool.idle_workers()
    }

    /// Tiles of the current generation nobody has claimed yet.
    pub fn queued_tiles(&self) -> usize {
        self.pool.queue().len()
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop_drawing();
        self.pool.shutdown();
    }
}
