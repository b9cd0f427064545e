//! lux renderer - CPU Phong ray tracing
//!
//! A recursive Whitted-style ray tracer with stochastic indirect bounces:
//! - Spheres, triangles, finite cylinders and disks behind one `Hittable` contract
//! - Phong direct lighting with shadow rays towards point lights
//! - Supersampled camera with a thin-lens defocus disk
//! - Row-chunked parallel rendering with per-chunk seeded generators
//! - ASCII PPM output and Reinhard tone mapping

mod hittable;
mod material;
mod sphere;
mod triangle;
mod cylinder;
mod disk;
mod light;
mod scene;
mod camera;
mod renderer;
mod chunk;
mod ppm;
mod loader;
mod error;
pub mod random;
pub mod tonemap;

pub use hittable::{HitRecord, Hittable, Shape};
pub use material::{reflect, Color, Material};
pub use sphere::Sphere;
pub use triangle::Triangle;
pub use cylinder::Cylinder;
pub use disk::Disk;
pub use light::PointLight;
pub use scene::{indirect_samples, Scene, TraceHit};
pub use camera::{Camera, DEFAULT_DEFOCUS_ANGLE, DEFAULT_FOCUS_DIST};
pub use renderer::{
    color_to_rgb, render, render_pixel, render_rows, ImageBuffer, RenderConfig, RenderMode,
    BINARY_HIT_COLOR, T_MIN,
};
pub use chunk::{
    chunk_path, render_chunk, render_parallel, render_to_file, split_rows, RowChunk,
    DEFAULT_THREADS,
};
pub use ppm::{merge_chunks, read_ppm, write_ppm, write_ppm_file};
pub use loader::{load_scene, LoadedScene};
pub use error::{RenderError, RenderResult};

/// Re-export Vec3 and common math types from lux_math
pub use lux_math::{Aabb, Interval, Ray, Vec3};
