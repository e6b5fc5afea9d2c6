#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fractal explorer
//!
//! Draws the Mandelbrot set, or a Julia set, onto a canvas that a
//! display can show while it is still being drawn.  The canvas is cut
//! into square tiles, and a fixed pool of worker threads claims tiles
//! one at a time and colors their pixels from a smoothed escape count.
//!
//! The interesting part is what happens when the user pans, zooms or
//! resizes the window in the middle of all that.  The `Coordinator`
//! first drains the pool: it cancels the current batch of tiles and
//! waits until every worker has let go of the tile it was on.  Only
//! then does it touch the canvas or the view, after which it cuts a
//! new batch of tiles and lets the workers go again.  Workers check for
//! cancellation once per row of a tile, so a drain never waits for
//! much more than a row's worth of iterations.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod barrier;
pub mod canvas;
pub mod color;
pub mod config;
pub mod coordinator;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod planes;
pub mod pool;
pub mod queue;
pub mod tiles;

pub use canvas::Canvas;
pub use color::{Color, Palette};
pub use config::Config;
pub use coordinator::Coordinator;
pub use display::{drive, Display, HeadlessDisplay, InputEvent, InputState};
pub use error::{ExplorerError, Result};
pub use evaluator::{Evaluator, FractalKind};
pub use planes::{Region, Viewport};
pub use tiles::Tile;
