//! Core render loop.
//!
//! Implements per-pixel supersampling over the shading engine:
//! - Anti-aliasing and depth of field via [`Camera::get_ray`]
//! - Background substitution for pixels whose samples all miss
//! - Fixed scale-and-clamp conversion to 8-bit output (no gamma curve)

use std::ops::Range;
use std::time::Instant;

use crate::error::{RenderError, RenderResult};
use crate::{Camera, Color, Scene};
use lux_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Minimum accepted ray parameter; keeps rays from re-hitting their origin.
pub const T_MIN: f32 = 0.001;

/// Pixel color in binary mode when any sample hits geometry.
pub const BINARY_HIT_COLOR: Color = Color::new(1.0, 0.0, 0.0);

/// How hit pixels are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Full Phong shading with indirect bounces
    #[default]
    Shaded,
    /// Coverage only: hit pixels are painted [`BINARY_HIT_COLOR`]
    Binary,
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Background color when no sample hits anything
    pub background: Color,
    pub mode: RenderMode,
    /// Base seed for the per-thread generators
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 10,
            background: Color::ZERO,
            mode: RenderMode::Shaded,
            seed: 0,
        }
    }
}

/// Render a single pixel with multi-sampling.
///
/// Misses contribute nothing to the average; a pixel with no hits at all
/// takes the background color.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let eye = camera.position();
    let ray_t = Interval::from_min(T_MIN);

    let mut pixel_color = Color::ZERO;
    let mut hits = 0u32;

    for _ in 0..samples {
        let ray = camera.get_ray(x, y, rng);
        let traced = match config.mode {
            // Coverage needs no shading
            RenderMode::Binary => scene.hit_nearest(&ray, ray_t).map(|_| Color::ZERO),
            RenderMode::Shaded => scene.trace(&ray, ray_t, eye, rng).map(|hit| hit.radiance),
        };

        if let Some(radiance) = traced {
            pixel_color += radiance;
            hits += 1;
        }
    }

    if hits == 0 {
        return config.background;
    }

    match config.mode {
        RenderMode::Binary => BINARY_HIT_COLOR,
        RenderMode::Shaded => pixel_color / samples as f32,
    }
}

/// Convert a linear color to 8-bit RGB by scale-and-clamp.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = color.clamp(Color::ZERO, Color::ONE);
    [
        (255.999 * c.x) as u8,
        (255.999 * c.y) as u8,
        (255.999 * c.z) as u8,
    ]
}

/// Row-major buffer of linear colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Build an image from packed 8-bit RGB data, mapping 0..=255 to 0..=1.
    pub fn from_rgb8(width: u32, height: u32, data: &[u8]) -> Self {
        let pixels = data
            .chunks_exact(3)
            .map(|p| Color::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0)
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Stack images top to bottom. All parts must share one width.
    pub fn vstack(parts: Vec<ImageBuffer>) -> RenderResult<ImageBuffer> {
        let mut parts = parts.into_iter().enumerate();
        let (_, mut merged) = parts.next().ok_or(RenderError::NoChunks)?;

        for (index, part) in parts {
            if part.width != merged.width {
                return Err(RenderError::ChunkMismatch {
                    index,
                    expected: merged.width,
                    found: part.width,
                });
            }
            merged.height += part.height;
            merged.pixels.extend(part.pixels);
        }

        Ok(merged)
    }

    /// Row-major offset of (x, y), computed in `usize`.
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert to 8-bit RGB triples in row-major order.
    pub fn to_rgb(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().map(|c| color_to_rgb(*c)).collect()
    }
}

/// Render a contiguous range of image rows into a buffer of full width.
pub fn render_rows(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    rows: Range<u32>,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let height = rows.end.saturating_sub(rows.start);
    let mut image = ImageBuffer::new(camera.image_width, height);

    for (local_y, y) in rows.enumerate() {
        for x in 0..camera.image_width {
            let color = render_pixel(camera, scene, x, y, config, rng);
            image.set(x, local_y as u32, color);
        }
    }

    image
}

/// Render the entire scene on the calling thread.
///
/// Seeded from `config.seed`, so two calls give bit-identical images.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(config.seed);

    let image = render_rows(camera, scene, config, 0..camera.image_height, &mut rng);

    log::info!(
        "Rendered {}x{} ({} spp) in {:.2?}",
        image.width,
        image.height,
        config.samples_per_pixel,
        start.elapsed()
    );
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, PointLight, Sphere};
    use lux_math::Vec3;

    fn test_scene(bounces: u32) -> Scene {
        let mut scene = Scene::new(bounces);
        scene.add(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Material::phong(0.8, 0.2, 10.0, Color::new(0.4, 0.2, 0.1), Color::splat(0.5)),
        ));
        scene.add_light(PointLight::new(Vec3::new(1.0, 2.0, 1.0), Color::splat(0.6)));
        scene
    }

    fn test_camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(0.5, 2.0, -1.0)), [127, 255, 0]);
    }

    #[test]
    fn test_rgb8_maps_back_to_same_bytes() {
        let bytes: Vec<u8> = (0..=255u8).flat_map(|b| [b, b, b]).collect();
        let image = ImageBuffer::from_rgb8(256, 1, &bytes);
        let back: Vec<u8> = image.to_rgb().into_iter().flatten().collect();
        assert_eq!(back, bytes);
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let scene = test_scene(0);
        let camera = test_camera(10, 10);
        let config = RenderConfig {
            samples_per_pixel: 4,
            background: Color::new(0.5, 0.7, 1.0),
            ..Default::default()
        };

        let mut rng = StdRng::seed_from_u64(42);
        let color = render_pixel(&camera, &scene, 5, 5, &config, &mut rng);

        // At least the ambient term of the sphere, never the background
        assert_ne!(color, config.background);
        assert!(color.x >= 0.4 - 1e-4);
    }

    #[test]
    fn test_render_pixel_miss_uses_background() {
        let scene = test_scene(0);
        let camera = test_camera(10, 10);
        let config = RenderConfig {
            background: Color::new(0.1, 0.2, 0.3),
            ..Default::default()
        };

        let mut rng = StdRng::seed_from_u64(42);
        let corner = render_pixel(&camera, &scene, 0, 0, &config, &mut rng);
        assert_eq!(corner, config.background);
    }

    #[test]
    fn test_binary_mode_paints_red() {
        let scene = test_scene(3);
        let camera = test_camera(10, 10);
        let config = RenderConfig {
            mode: RenderMode::Binary,
            background: Color::splat(0.25),
            ..Default::default()
        };

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(render_pixel(&camera, &scene, 5, 5, &config, &mut rng), BINARY_HIT_COLOR);
        assert_eq!(render_pixel(&camera, &scene, 0, 0, &config, &mut rng), Color::splat(0.25));
    }

    #[test]
    fn test_render_is_deterministic() {
        let scene = test_scene(2);
        let camera = test_camera(12, 8);
        let config = RenderConfig {
            samples_per_pixel: 3,
            seed: 99,
            ..Default::default()
        };

        let a = render(&camera, &scene, &config);
        let b = render(&camera, &scene, &config);

        assert_eq!(a.width, 12);
        assert_eq!(a.height, 8);
        assert_eq!(a.pixels.len(), 96);
        let bits = |img: &ImageBuffer| -> Vec<u32> {
            img.pixels.iter().flat_map(|c| c.to_array()).map(f32::to_bits).collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_vstack_checks_width() {
        let top = ImageBuffer::new(4, 2);
        let mut bottom = ImageBuffer::new(4, 3);
        bottom.set(0, 0, Color::ONE);

        let merged = ImageBuffer::vstack(vec![top.clone(), bottom]).unwrap();
        assert_eq!(merged.height, 5);
        assert_eq!(merged.get(0, 2), Color::ONE);

        let narrow = ImageBuffer::new(3, 1);
        assert!(matches!(
            ImageBuffer::vstack(vec![top, narrow]),
            Err(RenderError::ChunkMismatch { index: 1, expected: 4, found: 3 })
        ));
        assert!(matches!(ImageBuffer::vstack(Vec::new()), Err(RenderError::NoChunks)));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_pixel_index_does_not_wrap_u32() {
        let image = ImageBuffer {
            width: 100_000,
            height: 100_000,
            pixels: Vec::new(),
        };
        assert_eq!(image.index(99_999, 99_999), 9_999_999_999);
    }
}
