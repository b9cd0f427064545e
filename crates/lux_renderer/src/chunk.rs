//! Row-chunked parallel rendering.
//!
//! Divides the image into contiguous row ranges, one per worker, rendered
//! in parallel using rayon and merged strictly in chunk order. Each chunk
//! owns its generator, seeded from the render seed and the chunk index.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::RenderResult;
use crate::ppm::{merge_chunks, write_ppm_file};
use crate::random::chunk_seed;
use crate::renderer::render_rows;
use crate::{Camera, ImageBuffer, RenderConfig, Scene};

/// Default number of worker threads (and chunks).
pub const DEFAULT_THREADS: usize = 10;

/// A contiguous range of image rows rendered by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowChunk {
    /// First row (inclusive)
    pub start: u32,
    /// Last row (exclusive)
    pub end: u32,
    /// Position of this chunk in merge order
    pub index: usize,
}

impl RowChunk {
    /// Create a new chunk.
    pub fn new(start: u32, end: u32, index: usize) -> Self {
        Self { start, end, index }
    }

    /// Get the number of rows in this chunk.
    pub fn rows(&self) -> u32 {
        self.end - self.start
    }
}

/// Split `height` rows into `count` near-equal chunks.
///
/// The last chunk absorbs the remainder. `count` is clamped to
/// `1..=height` so no chunk is empty.
pub fn split_rows(height: u32, count: usize) -> Vec<RowChunk> {
    let count = count.clamp(1, height.max(1) as usize) as u32;
    let per_chunk = height / count;

    (0..count)
        .map(|i| {
            let start = i * per_chunk;
            let end = if i + 1 == count { height } else { start + per_chunk };
            RowChunk::new(start, end, i as usize)
        })
        .collect()
}

/// Render one chunk with its own seeded generator.
pub fn render_chunk(
    chunk: &RowChunk,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
) -> ImageBuffer {
    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(chunk_seed(config.seed, chunk.index));

    let image = render_rows(camera, scene, config, chunk.start..chunk.end, &mut rng);

    log::debug!(
        "Chunk {} (rows {}..{}) done in {:.2?}",
        chunk.index,
        chunk.start,
        chunk.end,
        start.elapsed()
    );
    image
}

fn build_pool(threads: usize) -> RenderResult<rayon::ThreadPool> {
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("lux-render-{i}"))
        .build()?)
}

/// Render across `threads` workers and merge the chunks in memory.
///
/// A single-thread render reproduces [`render`](crate::render) exactly.
pub fn render_parallel(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    threads: usize,
) -> RenderResult<ImageBuffer> {
    let start = Instant::now();
    let chunks = split_rows(camera.image_height, threads);
    let pool = build_pool(chunks.len())?;

    let parts: Vec<ImageBuffer> = pool.install(|| {
        chunks
            .par_iter()
            .map(|chunk| render_chunk(chunk, camera, scene, config))
            .collect()
    });

    let image = ImageBuffer::vstack(parts)?;
    log::info!(
        "Rendered {}x{} on {} threads in {:.2?}",
        image.width,
        image.height,
        chunks.len(),
        start.elapsed()
    );
    Ok(image)
}

/// Temporary file holding chunk `index` of `output`.
pub fn chunk_path(output: &Path, index: usize) -> PathBuf {
    output.with_extension(format!("chunk{index}.ppm"))
}

/// Render across `threads` workers, each writing its own PPM chunk file,
/// then merge the chunks into `output`.
///
/// Chunk files are removed afterwards, including when rendering or the
/// merge fails. Returns the merged image as written.
pub fn render_to_file(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    threads: usize,
    output: impl AsRef<Path>,
) -> RenderResult<ImageBuffer> {
    let output = output.as_ref();
    let start = Instant::now();
    let chunks = split_rows(camera.image_height, threads);
    let paths: Vec<PathBuf> = chunks.iter().map(|c| chunk_path(output, c.index)).collect();
    let pool = build_pool(chunks.len())?;

    log::info!(
        "Rendering {}x{} to {} on {} threads",
        camera.image_width,
        camera.image_height,
        output.display(),
        chunks.len()
    );

    let written: Vec<RenderResult<()>> = pool.install(|| {
        chunks
            .par_iter()
            .zip(paths.par_iter())
            .map(|(chunk, path)| write_ppm_file(path, &render_chunk(chunk, camera, scene, config)))
            .collect()
    });

    let result = written
        .into_iter()
        .collect::<RenderResult<Vec<()>>>()
        .and_then(|_| merge_chunks(&paths, output));

    for path in &paths {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != ErrorKind::NotFound {
                log::warn!("Failed to remove chunk file {}: {}", path.display(), e);
            }
        }
    }

    if result.is_ok() {
        log::info!("Wrote {} in {:.2?}", output.display(), start.elapsed());
    }
    result
}
