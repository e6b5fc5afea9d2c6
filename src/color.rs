// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors and the palette table escape counts are mapped through.
//!
//! A `Palette` is built once and then only ever read; evaluators hold
//! it behind an `Arc` so every worker shares the same table.

use crate::error::{ExplorerError, Result};

/// Number of entries in the generated palettes.
pub const PALETTE_SIZE: usize = 200;

/// An opaque RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Points that never escape are painted with this.
    pub const INTERIOR: Color = Color { r: 0, g: 0, b: 0 };

    /// Constructor.
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Packs the color as `0xAARRGGBB` with a fully opaque alpha, the
    /// layout the canvas stores.
    pub fn to_argb(self) -> u32 {
        0xff00_0000 | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Unpacks an `0xAARRGGBB` word, ignoring alpha.
    pub fn from_argb(word: u32) -> Color {
        Color {
            r: ((word >> 16) & 0xff) as u8,
            g: ((word >> 8) & 0xff) as u8,
            b: (word & 0xff) as u8,
        }
    }

    /// Convex combination `(1 - t) * self + t * other`, per channel.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| -> u8 {
            let v = (1.0 - t) * f64::from(a) + t * f64::from(b);
            v.round().max(0.0).min(255.0) as u8
        };
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Hue, saturation and value all in `[0, 1]`.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Color {
        let sector = (hue * 6.0).floor();
        let f = hue * 6.0 - sector;
        let p = value * (1.0 - saturation);
        let q = value * (1.0 - f * saturation);
        let t = value * (1.0 - (1.0 - f) * saturation);
        let (r, g, b) = match (sector as i32).rem_euclid(6) {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };
        let channel = |c: f32| (c.max(0.0).min(1.0) * 255.0).round() as u8;
        Color::new(channel(r), channel(g), channel(b))
    }
}

/// An immutable, non-empty table of colors indexed modulo its length.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Wraps an explicit list of colors.
    pub fn new(colors: Vec<Color>) -> Result<Palette> {
        if colors.is_empty() {
            return Err(ExplorerError::InvalidPalette);
        }
        Ok(Palette { colors })
    }

    /// A warm ramp: brighten, then desaturate, then step the hue and
    /// start over.
    pub fn warm() -> Palette {
        let mut colors = Vec::with_capacity(PALETTE_SIZE);
        let (mut hue, mut value, mut saturation) = (0.6_f32, 0.2_f32, 1.0_f32);
        let mut phase = 0;
        for _ in 0..PALETTE_SIZE {
            match phase {
                0 => value += 0.1,
                1 => saturation -= 0.1,
                _ => {
                    hue += 0.1;
                    value = 0.2;
                    phase = 0;
                }
            }

            if saturation <= 0.5 {
                saturation = 1.0;
                phase = 2;
            } else if hue >= 1.0 {
                hue = 0.0;
            } else if value >= 1.0 {
                value = 1.0;
                phase = 1;
            }

            colors.push(Color::from_hsv(hue, saturation, value));
        }
        Palette { colors }
    }

    /// A single-hue ramp that brightens to full value and then fades
    /// towards white.
    pub fn monochrome(hue: f32) -> Palette {
        let step = 2.0 / PALETTE_SIZE as f32;
        let (mut value, mut saturation) = (0.2_f32, 1.0_f32);
        let mut brightening = true;
        let mut colors = Vec::with_capacity(PALETTE_SIZE);
        for _ in 0..PALETTE_SIZE {
            colors.push(Color::from_hsv(hue, saturation, value));
            if brightening {
                value += step;
            } else {
                saturation = (saturation - step).max(0.0);
            }
            if value > 1.0 {
                value = 1.0;
                brightening = false;
            }
        }
        Palette { colors }
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Never true; palettes are validated on construction.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entry `i`, wrapping around the end of the table.
    pub fn color(&self, i: usize) -> Color {
        self.colors[i % self.colors.len()]
    }

    /// Blends the two entries adjacent to a fractional index, which is
    /// what removes the banding from smooth escape counts.
    pub fn interpolate(&self, k: f64) -> Color {
        let k = k.max(0.0);
        let base = k.floor();
        let i = base as usize;
        self.color(i).lerp(self.color(i + 1), k - base)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::warm()
    }
}
