// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tiles are the unit of work handed to the pool.  A fresh set is cut
//! every time drawing restarts, and together the tiles cover the
//! canvas exactly once.

use itertools::iproduct;
use std::cmp::{max, min};

/// Tiles never get smaller than this many pixels on a side, however
/// small the canvas.
pub const MIN_TILE_EDGE: usize = 50;

/// An axis-aligned rectangle of pixels.  The `min` bounds are
/// inclusive, the `max` bounds exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Leftmost column
    pub min_x: usize,
    /// One past the rightmost column
    pub max_x: usize,
    /// Top row
    pub min_y: usize,
    /// One past the bottom row
    pub max_y: usize,
}

impl Tile {
    /// Columns covered.
    pub fn width(&self) -> usize {
        self.max_x - self.min_x
    }

    /// Rows covered.
    pub fn height(&self) -> usize {
        self.max_y - self.min_y
    }

    /// Pixels covered.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Whether pixel `(x, y)` falls inside.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.min_x <= x && x < self.max_x && self.min_y <= y && y < self.max_y
    }

    /// Whether the two tiles share at least one pixel.
    pub fn overlaps(&self, other: &Tile) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// The edge length used to cut a `width` x `height` canvas: a tenth of
/// the shorter side, but never below `MIN_TILE_EDGE`.
pub fn tile_edge(width: usize, height: usize) -> usize {
    max(MIN_TILE_EDGE, min(width, height) / 10)
}

/// Cuts the canvas into square tiles of side `edge`, clipping the last
/// row and column to the canvas.  Tiles come out in raster order.
pub fn partition(width: usize, height: usize, edge: usize) -> Vec<Tile> {
    let edge = max(edge, 1);
    iproduct!((0..height).step_by(edge), (0..width).step_by(edge))
        .map(|(y, x)| Tile {
            min_x: x,
            max_x: min(x + edge, width),
            min_y: y,
            max_y: min(y + edge, height),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_has_a_floor() {
        assert_eq!(tile_edge(100, 100), 50);
        assert_eq!(tile_edge(1920, 1080), 108);
        assert_eq!(tile_edge(3000, 20), 50);
    }

    #[test]
    fn partition_clips_the_border() {
        let tiles = partition(120, 60, 50);
        assert_eq!(tiles.len(), 6);
        assert_eq!(
            tiles[2],
            Tile {
                min_x: 100,
                max_x: 120,
                min_y: 0,
                max_y: 50
            }
        );
        assert_eq!(tiles[5].height(), 10);
        assert_eq!(tiles.iter().map(Tile::area).sum::<usize>(), 120 * 60);
    }

    #[test]
    fn small_canvas_is_a_single_tile() {
        let tiles = partition(10, 7, tile_edge(10, 7));
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].area(), 70);
    }

    #[test]
    fn overlap_is_strict() {
        let a = Tile {
            min_x: 0,
            max_x: 10,
            min_y: 0,
            max_y: 10,
        };
        let b = Tile {
            min_x: 10,
            max_x: 20,
            min_y: 0,
            max_y: 10,
        };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&a));
        assert!(a.contains(9, 9));
        assert!(!a.contains(10, 0));
    }
}
