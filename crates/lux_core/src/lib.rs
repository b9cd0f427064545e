//! lux core - scene description and texture support.
//!
//! This crate provides the renderer-agnostic inputs of a render:
//!
//! - **Scene description**: serde types for the JSON scene format
//!   (camera, background, bounce limit, shapes, point lights)
//! - **Textures**: 8-bit RGB rasters, file loading and a path-keyed cache
//!
//! # Example
//!
//! ```ignore
//! use lux_core::SceneDescription;
//!
//! let desc = SceneDescription::load("scenes/simple_phong.json")?;
//! println!("{} shapes, {} lights",
//!     desc.scene.shapes.len(),
//!     desc.scene.lightsources.len());
//! ```

pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use scene::{
    CameraDesc, LightDesc, MaterialDesc, SceneDescription, SceneError, SceneResult, ShapeDesc,
    WorldDesc,
};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
