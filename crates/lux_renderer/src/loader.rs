//! Build a renderable scene from a parsed scene description.

use lux_core::{LightDesc, MaterialDesc, SceneDescription, ShapeDesc, TextureCache};
use lux_math::Vec3;

use crate::camera::{DEFAULT_DEFOCUS_ANGLE, DEFAULT_FOCUS_DIST};
use crate::error::RenderResult;
use crate::{
    Camera, Color, Cylinder, Disk, Material, PointLight, RenderConfig, RenderMode, Scene, Sphere,
    Triangle,
};

/// Everything needed to render one scene file.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub scene: Scene,
    /// Initialized camera
    pub camera: Camera,
    pub background: Color,
    pub mode: RenderMode,
}

impl LoadedScene {
    /// Render settings for this scene with the given sampling parameters.
    pub fn render_config(&self, samples_per_pixel: u32, seed: u64) -> RenderConfig {
        RenderConfig {
            samples_per_pixel,
            background: self.background,
            mode: self.mode,
            seed,
        }
    }
}

/// Convert a scene description into geometry, lights and a camera.
///
/// Textures go through `textures`, so repeated references load once.
/// Unknown shape and light types are skipped with a warning; a texture
/// that fails to load is an error.
pub fn load_scene(desc: &SceneDescription, textures: &mut TextureCache) -> RenderResult<LoadedScene> {
    let mut scene = Scene::new(desc.nbounces);

    for (index, light) in desc.scene.lightsources.iter().enumerate() {
        match light {
            LightDesc::PointLight {
                position,
                intensity,
            } => scene.add_light(PointLight::new(
                Vec3::from_array(*position),
                Color::from_array(*intensity),
            )),
            LightDesc::Unsupported => {
                log::warn!("Skipping light {}: unsupported light type", index);
            }
        }
    }

    for (index, shape) in desc.scene.shapes.iter().enumerate() {
        match shape {
            ShapeDesc::Sphere {
                center,
                radius,
                material,
                texture,
            } => {
                let material = bind_material(material.as_ref(), texture.as_deref(), textures)?;
                scene.add(Sphere::new(Vec3::from_array(*center), *radius, material));
            }
            ShapeDesc::Triangle {
                v0,
                v1,
                v2,
                material,
                texture,
            } => {
                let material = bind_material(material.as_ref(), texture.as_deref(), textures)?;
                scene.add(Triangle::new(
                    Vec3::from_array(*v0),
                    Vec3::from_array(*v1),
                    Vec3::from_array(*v2),
                    material,
                ));
            }
            ShapeDesc::Cylinder {
                center,
                radius,
                height,
                axis,
                material,
                texture,
            } => {
                let material = bind_material(material.as_ref(), texture.as_deref(), textures)?;
                let axis = match Vec3::from_array(*axis).try_normalize() {
                    Some(axis) => axis,
                    None => {
                        log::warn!("Cylinder {} has a zero axis, using +Y", index);
                        Vec3::Y
                    }
                };
                add_capped_cylinder(
                    &mut scene,
                    Vec3::from_array(*center),
                    axis,
                    *radius,
                    *height,
                    material,
                );
            }
            ShapeDesc::Unsupported => {
                log::warn!("Skipping shape {}: unsupported shape type", index);
            }
        }
    }

    let cam = &desc.camera;
    let mut camera = Camera::new()
        .with_resolution(cam.width, cam.height)
        .with_position(
            Vec3::from_array(cam.position),
            Vec3::from_array(cam.look_at),
            Vec3::from_array(cam.up_vector),
        )
        .with_lens(cam.fov, DEFAULT_DEFOCUS_ANGLE, DEFAULT_FOCUS_DIST);
    camera.initialize();

    let mode = if desc.is_binary() {
        RenderMode::Binary
    } else {
        RenderMode::Shaded
    };

    log::info!(
        "Loaded scene: {} objects, {} lights, {} bounces, {:?} mode",
        scene.len(),
        scene.lights().len(),
        scene.max_bounces(),
        mode
    );

    Ok(LoadedScene {
        scene,
        camera,
        background: Color::from_array(desc.scene.backgroundcolor),
        mode,
    })
}

/// Material from an optional description plus an optional texture file.
///
/// A missing material is all zeros.
fn bind_material(
    desc: Option<&MaterialDesc>,
    texture: Option<&str>,
    textures: &mut TextureCache,
) -> RenderResult<Material> {
    let material = desc.map(Material::from).unwrap_or_default();

    match texture {
        Some(path) => Ok(material.with_texture(textures.load(path)?)),
        None => Ok(material),
    }
}

/// Open side centered on `center` plus a disk on each end.
fn add_capped_cylinder(
    scene: &mut Scene,
    center: Vec3,
    axis: Vec3,
    radius: f32,
    height: f32,
    material: Material,
) {
    let half = axis * (height * 0.5);

    scene.add(Cylinder::new(center - half, axis, radius, height, material.clone()));
    scene.add(Disk::new(center + half, axis, radius, material.clone()));
    scene.add(Disk::new(center - half, -axis, radius, material));
}
