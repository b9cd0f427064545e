//! Texture loading and caching for materials.
//!
//! Textures are stored as raw 8-bit RGB rasters exactly as decoded from
//! disk. No colour-space conversion is applied.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lux_math::Vec3;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data, one `[R, G, B]` per pixel, row-major order
    pub pixels: Vec<[u8; 3]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 3]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1). `color` is in [0, 1].
    pub fn solid_color(color: Vec3) -> Self {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            width: 1,
            height: 1,
            pixels: vec![[to_byte(color.x), to_byte(color.y), to_byte(color.z)]],
            path: "<solid>".to_string(),
        }
    }

    /// Look up the colour at surface coordinates (u, v).
    ///
    /// Nearest-texel lookup, no filtering. Any real (u, v) wraps into the
    /// raster: `x = floor(u * width) mod width`, likewise for y.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        if self.width == 0 || self.height == 0 {
            return Vec3::ZERO;
        }

        let x = wrap_index(u, self.width);
        let y = wrap_index(v, self.height);
        let [r, g, b] = self.get_pixel(x, y);

        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels.get(idx).copied().unwrap_or([0, 0, 0])
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[u8; 3]>()
    }
}

#[inline]
fn wrap_index(coord: f32, extent: u32) -> u32 {
    let scaled = (coord * extent as f32).floor() as i64;
    scaled.rem_euclid(extent as i64) as u32
}

/// Cache for loaded textures.
///
/// Textures are loaded on-demand and cached for reuse, so shapes sharing
/// one texture file (a cylinder and its caps) share one raster.
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Insert an already-built texture under a path key.
    pub fn insert(&mut self, path: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(path.into(), texture.clone());
        texture
    }

    /// Check if a texture is cached.
    pub fn is_cached(&self, path: &str) -> bool {
        self.textures.contains_key(path)
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a texture from a file path (PPM or any format `image` decodes).
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let display = path.to_string_lossy().to_string();
    let img = image::open(path).map_err(|source| TextureError::Load {
        path: display.clone(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty(display));
    }

    let pixels: Vec<[u8; 3]> = rgb.pixels().map(|p| p.0).collect();

    Ok(Texture::new(width, height, pixels, display))
}
