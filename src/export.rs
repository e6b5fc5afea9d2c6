// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a canvas to disk as a binary PPM.

use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::canvas::Canvas;
use crate::error::{ExplorerError, Result};

/// Encodes whatever the canvas holds right now.  If workers are still
/// drawing, the image may mix old and new pixels.
pub fn write_pnm<P: AsRef<Path>>(path: P, canvas: &Canvas) -> Result<()> {
    let output = BufWriter::new(File::create(path).map_err(ExplorerError::Export)?);
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    let pixels = canvas.to_rgb();
    encoder
        .encode(
            &pixels[..],
            canvas.width() as u32,
            canvas.height() as u32,
            ColorType::RGB(8),
        )
        .map_err(ExplorerError::Export)
}
