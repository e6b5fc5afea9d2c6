// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Failures the explorer reports to its caller.  Numeric blow-ups
//! inside the iteration are not errors: those points are simply
//! painted with the interior color.

use failure::Fail;
use std::io;

/// Everything that can go wrong while building or steering an
/// explorer.
#[derive(Debug, Fail)]
pub enum ExplorerError {
    /// The worker pool needs at least one thread.
    #[fail(display = "worker count must be at least 1")]
    NoWorkers,

    /// A canvas must have at least one pixel in each direction.
    #[fail(display = "canvas dimensions must be positive, got {}x{}", width, height)]
    EmptyCanvas {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// The pixel buffer for a new canvas could not be allocated.  The
    /// previous canvas is still in place when this is returned.
    #[fail(display = "could not allocate a {}x{} canvas", width, height)]
    CanvasAllocation {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// Zoom factors must be finite and strictly positive.
    #[fail(display = "invalid zoom amount {}", _0)]
    InvalidZoom(f64),

    /// A palette needs at least one color to interpolate between.
    #[fail(display = "palette must contain at least one color")]
    InvalidPalette,

    /// The operating system refused to start a worker thread.
    #[fail(display = "could not start worker thread: {}", _0)]
    Spawn(#[cause] io::Error),

    /// Writing an exported image failed.
    #[fail(display = "could not export image: {}", _0)]
    Export(#[cause] io::Error),
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = ExplorerError::EmptyCanvas {
            width: 0,
            height: 12,
        };
        assert_eq!(err.to_string(), "canvas dimensions must be positive, got 0x12");
        assert_eq!(
            ExplorerError::InvalidZoom(-1.5).to_string(),
            "invalid zoom amount -1.5"
        );
    }
}
