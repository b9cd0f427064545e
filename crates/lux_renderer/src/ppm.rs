//! ASCII PPM (P3) output and chunk merging.
//!
//! Files carry a three-line header (`P3`, `width height`, `255`) and one
//! `R G B` line per pixel, rows top to bottom. Reading goes through the
//! `image` crate's PNM decoder, which also accepts binary P6 files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{RenderError, RenderResult};
use crate::ImageBuffer;

/// Write an image as ASCII PPM.
pub fn write_ppm<W: Write>(writer: &mut W, image: &ImageBuffer) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for [r, g, b] in image.to_rgb() {
        writeln!(writer, "{r} {g} {b}")?;
    }

    writer.flush()
}

/// Write an image to `path` as ASCII PPM, replacing any existing file.
pub fn write_ppm_file(path: impl AsRef<Path>, image: &ImageBuffer) -> RenderResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| RenderError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_ppm(&mut writer, image).map_err(|e| RenderError::io(path, e))
}

/// Read a PPM file into a linear image with channels in [0, 1].
pub fn read_ppm(path: impl AsRef<Path>) -> RenderResult<ImageBuffer> {
    let path = path.as_ref();
    let rgb = image::open(path)
        .map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgb8();

    Ok(ImageBuffer::from_rgb8(rgb.width(), rgb.height(), rgb.as_raw()))
}

/// Concatenate partial rasters in the given order and write the result.
///
/// Every chunk must have the same width; heights add up.
pub fn merge_chunks(chunks: &[PathBuf], output: impl AsRef<Path>) -> RenderResult<ImageBuffer> {
    let parts = chunks
        .iter()
        .map(|path| read_ppm(path))
        .collect::<RenderResult<Vec<_>>>()?;

    let merged = ImageBuffer::vstack(parts)?;
    write_ppm_file(output.as_ref(), &merged)?;

    log::debug!(
        "Merged {} chunks into {} ({}x{})",
        chunks.len(),
        output.as_ref().display(),
        merged.width,
        merged.height
    );
    Ok(merged)
}
