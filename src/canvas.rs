// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel buffer workers draw into and the display reads from.
//!
//! Every cell is an `AtomicU32` holding `0xAARRGGBB`, accessed with
//! relaxed ordering.  Workers write disjoint tiles, so no two of them
//! ever touch the same cell at once; a reader running alongside them
//! may see a frame that is half old and half new, which is fine for a
//! preview.  The pan and zoom previews below run only while the pool
//! is drained.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::color::Color;
use crate::error::{ExplorerError, Result};
use crate::planes::Region;

/// See the module documentation.
pub struct Canvas {
    size: Region<usize>,
    pixels: Vec<AtomicU32>,
}

fn allocate(width: usize, height: usize) -> Result<Vec<AtomicU32>> {
    let failed = || ExplorerError::CanvasAllocation { width, height };
    let len = width.checked_mul(height).ok_or_else(failed)?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len).map_err(|_| failed())?;
    pixels.extend((0..len).map(|_| AtomicU32::new(0)));
    Ok(pixels)
}

impl Canvas {
    /// A zero-filled canvas.  Both dimensions must be positive.
    pub fn new(width: usize, height: usize) -> Result<Canvas> {
        if width == 0 || height == 0 {
            return Err(ExplorerError::EmptyCanvas { width, height });
        }
        Ok(Canvas {
            size: Region::new(width, height),
            pixels: allocate(width, height)?,
        })
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Both dimensions.
    pub fn size(&self) -> Region<usize> {
        self.size
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size.width && y < self.size.height);
        y * self.size.width + x
    }

    /// The raw `0xAARRGGBB` word at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[self.index(x, y)].load(Ordering::Relaxed)
    }

    /// Stores a raw `0xAARRGGBB` word at `(x, y)`.
    #[inline]
    pub fn set(&self, x: usize, y: usize, word: u32) {
        self.pixels[self.index(x, y)].store(word, Ordering::Relaxed);
    }

    /// The color at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        Color::from_argb(self.get(x, y))
    }

    /// Paints `(x, y)`.
    pub fn put(&self, x: usize, y: usize, color: Color) {
        self.set(x, y, color.to_argb());
    }

    /// Paints every pixel.
    pub fn fill(&self, color: Color) {
        let word = color.to_argb();
        for p in &self.pixels {
            p.store(word, Ordering::Relaxed);
        }
    }

    /// A copy of every word, row by row.
    pub fn snapshot(&self) -> Vec<u32> {
        self.pixels.iter().map(|p| p.load(Ordering::Relaxed)).collect()
    }

    /// Packed 8-bit RGB triples, row by row, ready for an encoder.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            let c = Color::from_argb(p.load(Ordering::Relaxed));
            out.extend_from_slice(&[c.r, c.g, c.b]);
        }
        out
    }

    /// A new canvas of the given size carrying over the region it
    /// shares with this one at the top-left; the rest is zero.  On
    /// failure `self` is untouched.
    pub fn resized(&self, width: usize, height: usize) -> Result<Canvas> {
        let next = Canvas::new(width, height)?;
        let cols = width.min(self.size.width);
        for y in 0..height.min(self.size.height) {
            for x in 0..cols {
                next.set(x, y, self.get(x, y));
            }
        }
        Ok(next)
    }

    /// Moves the content by whole pixels.  What scrolls off is lost;
    /// the strip that scrolls in keeps its old, stale content.  A shift
    /// of a full width or height or more scrolls everything off, which
    /// leaves the whole canvas stale.
    pub fn shift(&self, dx: i64, dy: i64) {
        if dx.unsigned_abs() >= self.size.width as u64
            || dy.unsigned_abs() >= self.size.height as u64
        {
            return;
        }
        let old = self.snapshot();
        let (w, h) = (self.size.width as i64, self.size.height as i64);
        for y in 0..h {
            let ty = y + dy;
            if ty < 0 || ty >= h {
                continue;
            }
            for x in 0..w {
                let tx = x + dx;
                if tx < 0 || tx >= w {
                    continue;
                }
                self.set(tx as usize, ty as usize, old[(y * w + x) as usize]);
            }
        }
    }

    /// Blows the current content up by `amount` around `focus` with
    /// bilinear filtering and crops it back to the canvas, as a stand-in
    /// until the exact pixels are recomputed.  Factors of one or less
    /// leave the canvas alone.
    pub fn magnify(&self, focus: (f64, f64), amount: f64) {
        if amount.is_nan() || amount <= 1.0 || amount.is_infinite() {
            return;
        }
        let old = self.snapshot();
        let (w, h) = (self.size.width, self.size.height);
        let (fx, fy) = (focus.0.floor(), focus.1.floor());
        let (dx, dy) = ((fx * amount).floor() - fx, (fy * amount).floor() - fy);
        let sample = |x: usize, y: usize| Color::from_argb(old[y * w + x]);

        for y in 0..h {
            let sy = ((y as f64 + dy) / amount).max(0.0).min((h - 1) as f64);
            let y1 = sy as usize;
            let y2 = (y1 + 1).min(h - 1);
            let ty = sy - y1 as f64;
            for x in 0..w {
                let sx = ((x as f64 + dx) / amount).max(0.0).min((w - 1) as f64);
                let x1 = sx as usize;
                let x2 = (x1 + 1).min(w - 1);
                let tx = sx - x1 as f64;
                let top = sample(x1, y1).lerp(sample(x2, y1), tx);
                let bottom = sample(x1, y2).lerp(sample(x2, y2), tx);
                self.put(x, y, top.lerp(bottom, ty));
            }
        }
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.size.width)
            .field("height", &self.size.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(w: usize, h: usize) -> Canvas {
        let c = Canvas::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                c.set(x, y, (y * w + x) as u32);
            }
        }
        c
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(Canvas::new(0, 10).is_err());
        assert!(Canvas::new(10, 0).is_err());
    }

    #[test]
    fn impossible_allocation_is_an_error() {
        match Canvas::new(usize::MAX, 2) {
            Err(ExplorerError::CanvasAllocation { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn resize_keeps_top_left_and_zeroes_the_rest() {
        let c = numbered(3, 2);
        let bigger = c.resized(4, 3).unwrap();
        assert_eq!(bigger.get(2, 1), 5);
        assert_eq!(bigger.get(3, 0), 0);
        assert_eq!(bigger.get(0, 2), 0);
        let smaller = c.resized(2, 1).unwrap();
        assert_eq!(smaller.snapshot(), vec![0, 1]);
    }

    #[test]
    fn shift_moves_content_and_leaves_stale_strip() {
        let c = numbered(3, 3);
        c.shift(1, 0);
        assert_eq!(c.snapshot(), vec![0, 0, 1, 3, 3, 4, 6, 6, 7]);
        let c = numbered(3, 3);
        c.shift(0, -1);
        assert_eq!(c.snapshot(), vec![3, 4, 5, 6, 7, 8, 6, 7, 8]);
    }

    #[test]
    fn shift_past_the_edge_leaves_everything_stale() {
        let c = numbered(3, 3);
        let before = c.snapshot();
        c.shift(3, 0);
        c.shift(0, -3);
        c.shift(std::i64::MAX, 1);
        c.shift(1, std::i64::MIN);
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn magnify_by_one_is_a_no_op() {
        let c = numbered(5, 5);
        let before = c.snapshot();
        c.magnify((2.0, 2.0), 1.0);
        c.magnify((2.0, 2.0), 0.5);
        c.magnify((2.0, 2.0), std::f64::NAN);
        c.magnify((2.0, 2.0), std::f64::INFINITY);
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn magnify_keeps_a_uniform_canvas_uniform() {
        let c = Canvas::new(8, 6).unwrap();
        c.fill(Color::new(10, 20, 30));
        c.magnify((3.0, 4.0), 2.5);
        assert!(c.snapshot().iter().all(|&w| w == Color::new(10, 20, 30).to_argb()));
    }

    #[test]
    fn magnify_keeps_the_focus_pixel() {
        let c = Canvas::new(10, 10).unwrap();
        c.put(4, 4, Color::new(200, 0, 0));
        c.magnify((4.0, 4.0), 2.0);
        assert_eq!(c.pixel(4, 4), Color::new(200, 0, 0));
    }

    #[test]
    fn rgb_export_drops_alpha() {
        let c = Canvas::new(1, 1).unwrap();
        c.put(0, 0, Color::new(1, 2, 3));
        assert_eq!(c.to_rgb(), vec![1, 2, 3]);
    }
}
