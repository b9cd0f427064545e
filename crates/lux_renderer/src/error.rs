//! Error types for rendering output and scene loading.

use std::path::PathBuf;

use lux_core::TextureError;
use thiserror::Error;

/// Errors raised outside the per-ray hot path.
///
/// Intersection and shading never fail; only file output, chunk merging,
/// thread pool setup and texture binding do.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode raster {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Chunk {index} is {found} pixels wide, expected {expected}")]
    ChunkMismatch {
        index: usize,
        expected: u32,
        found: u32,
    },

    #[error("No chunks to merge")]
    NoChunks,

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
