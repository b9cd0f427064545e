//! Phong surface material.

use std::sync::Arc;

use lux_core::{MaterialDesc, Texture};
use lux_math::Vec3;

/// Color type alias (linear RGB, nominally 0-1)
pub type Color = Vec3;

/// Reflectance parameters of a surface.
///
/// A material optionally carries a texture. Textured materials never reach
/// the shading code directly: [`Material::at_surface`] bakes the texel into
/// `diffuse_color` and returns an untextured copy, which is what a
/// [`HitRecord`](crate::HitRecord) stores.
#[derive(Debug, Clone, Default)]
pub struct Material {
    /// Diffuse reflection coefficient
    pub kd: f32,
    /// Specular reflection coefficient
    pub ks: f32,
    /// Phong specular exponent
    pub shininess: f32,
    pub diffuse_color: Color,
    pub specular_color: Color,
    /// Mirror-like surface; bounce rays lean towards the reflection direction
    pub reflective: bool,
    /// Blend weight between mirror direction (1) and hemisphere sample (0)
    pub reflectivity: f32,
    pub refractive: bool,
    pub refractive_index: f32,
    pub texture: Option<Arc<Texture>>,
}

impl Material {
    /// Create a plain Phong material without reflection or refraction.
    pub fn phong(kd: f32, ks: f32, shininess: f32, diffuse_color: Color, specular_color: Color) -> Self {
        Self {
            kd,
            ks,
            shininess,
            diffuse_color,
            specular_color,
            ..Default::default()
        }
    }

    /// Mark the material as reflective with the given mirror weight.
    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflective = true;
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    /// Bind a texture that replaces the diffuse color.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Check if this material has a bound texture.
    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    /// Snapshot of this material as seen at surface coordinates (u, v).
    ///
    /// The returned copy has no texture and owns no shared state.
    pub fn at_surface(&self, u: f32, v: f32) -> Material {
        let diffuse_color = match &self.texture {
            Some(texture) => texture.sample(u, v),
            None => self.diffuse_color,
        };

        Material {
            kd: self.kd,
            ks: self.ks,
            shininess: self.shininess,
            diffuse_color,
            specular_color: self.specular_color,
            reflective: self.reflective,
            reflectivity: self.reflectivity,
            refractive: self.refractive,
            refractive_index: self.refractive_index,
            texture: None,
        }
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        Self {
            kd: desc.kd,
            ks: desc.ks,
            shininess: desc.specularexponent,
            diffuse_color: Vec3::from_array(desc.diffusecolor),
            specular_color: Vec3::from_array(desc.specularcolor),
            reflective: desc.isreflective,
            reflectivity: desc.reflectivity,
            refractive: desc.isrefractive,
            refractive_index: desc.refractiveindex,
            texture: None,
        }
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
