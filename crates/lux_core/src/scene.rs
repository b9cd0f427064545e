//! Scene description types.
//!
//! These mirror the JSON scene format one-to-one and stay renderer-agnostic:
//! the renderer turns a [`SceneDescription`] into its own geometry, lights
//! and camera. Required fields are enforced by serde, so a malformed file
//! fails at load time instead of producing a partial scene.

use std::fs;
use std::path::Path;

use lux_math::Vec3;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Top-level scene file.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDescription {
    /// Maximum indirect bounce depth (0 = direct lighting only)
    #[serde(default)]
    pub nbounces: u32,

    /// Render mode name; `"binary"` renders a hit/miss mask
    #[serde(default)]
    pub rendermode: String,

    pub camera: CameraDesc,

    pub scene: WorldDesc,
}

impl SceneDescription {
    /// Load and validate a scene description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a scene description from a JSON string.
    pub fn from_json(text: &str) -> SceneResult<Self> {
        let desc: SceneDescription = serde_json::from_str(text)?;
        desc.camera.validate()?;
        Ok(desc)
    }

    /// True when the scene asks for the binary (hit mask) render mode.
    pub fn is_binary(&self) -> bool {
        self.rendermode == "binary"
    }
}

/// Camera parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraDesc {
    pub width: u32,
    pub height: u32,
    pub position: [f32; 3],
    #[serde(rename = "lookAt")]
    pub look_at: [f32; 3],
    #[serde(rename = "upVector")]
    pub up_vector: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl CameraDesc {
    fn validate(&self) -> SceneResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidCamera(format!(
                "image size {}x{} is empty",
                self.width, self.height
            )));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(SceneError::InvalidCamera(format!(
                "fov {} is outside (0, 180)",
                self.fov
            )));
        }
        if self.position == self.look_at {
            return Err(SceneError::InvalidCamera(
                "position and lookAt coincide".to_string(),
            ));
        }

        // Up hint must span a plane with the view axis
        let view = Vec3::from_array(self.position) - Vec3::from_array(self.look_at);
        let view = view.normalize_or_zero();
        let up = Vec3::from_array(self.up_vector).normalize_or_zero();
        if up.cross(view).length_squared() < 1e-12 {
            return Err(SceneError::InvalidCamera(format!(
                "upVector {:?} is zero or parallel to the view direction",
                self.up_vector
            )));
        }
        Ok(())
    }
}

/// Background, lights and shapes.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldDesc {
    pub backgroundcolor: [f32; 3],

    #[serde(default)]
    pub lightsources: Vec<LightDesc>,

    #[serde(default)]
    pub shapes: Vec<ShapeDesc>,
}

/// Light source entry. Unknown light types deserialize as `Unsupported`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LightDesc {
    PointLight {
        position: [f32; 3],
        intensity: [f32; 3],
    },
    #[serde(other)]
    Unsupported,
}

/// Shape entry. Unknown shape types deserialize as `Unsupported`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDesc {
    Sphere {
        center: [f32; 3],
        radius: f32,
        #[serde(default)]
        material: Option<MaterialDesc>,
        #[serde(default)]
        texture: Option<String>,
    },
    Triangle {
        v0: [f32; 3],
        v1: [f32; 3],
        v2: [f32; 3],
        #[serde(default)]
        material: Option<MaterialDesc>,
        #[serde(default)]
        texture: Option<String>,
    },
    /// `center` is the middle of the cylinder; it extends `height / 2`
    /// along `axis` in both directions.
    Cylinder {
        center: [f32; 3],
        radius: f32,
        height: f32,
        axis: [f32; 3],
        #[serde(default)]
        material: Option<MaterialDesc>,
        #[serde(default)]
        texture: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

/// Blinn-Phong style material block. Every field is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialDesc {
    pub ks: f32,
    pub kd: f32,
    pub specularexponent: f32,
    pub diffusecolor: [f32; 3],
    pub specularcolor: [f32; 3],
    pub isreflective: bool,
    pub reflectivity: f32,
    pub isrefractive: bool,
    pub refractiveindex: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "nbounces": 3,
        "rendermode": "phong",
        "camera": {
            "type": "pinhole",
            "width": 64,
            "height": 48,
            "position": [0.0, 0.0, 5.0],
            "lookAt": [0.0, 0.0, 0.0],
            "upVector": [0.0, 1.0, 0.0],
            "fov": 45.0,
            "exposure": 0.1
        },
        "scene": {
            "backgroundcolor": [0.25, 0.25, 0.25],
            "lightsources": [
                { "type": "pointlight", "position": [0, 3, 3], "intensity": [0.5, 0.5, 0.5] },
                { "type": "arealight", "position": [0, 3, 3] }
            ],
            "shapes": [
                {
                    "type": "sphere", "center": [0, 0, 0], "radius": 1.0,
                    "material": {
                        "ks": 0.1, "kd": 0.9, "specularexponent": 20,
                        "diffusecolor": [0.8, 0.5, 0.5], "specularcolor": [1, 1, 1],
                        "isreflective": false, "reflectivity": 1.0,
                        "isrefractive": false, "refractiveindex": 1.0
                    }
                },
                { "type": "triangle", "v0": [0, 0, 0], "v1": [1, 0, 0], "v2": [0, 1, 0] },
                {
                    "type": "cylinder", "center": [1, 0, 0], "radius": 0.5,
                    "height": 2.0, "axis": [0, 1, 0], "texture": "wood.ppm"
                },
                { "type": "torus", "center": [0, 0, 0] }
            ]
        }
    }"#;

    #[test]
    fn test_parse_full_scene() {
        let desc = SceneDescription::from_json(SCENE).unwrap();

        assert_eq!(desc.nbounces, 3);
        assert!(!desc.is_binary());
        assert_eq!(desc.camera.width, 64);
        assert_eq!(desc.camera.look_at, [0.0, 0.0, 0.0]);
        assert_eq!(desc.scene.backgroundcolor, [0.25, 0.25, 0.25]);
        assert_eq!(desc.scene.lightsources.len(), 2);
        assert!(matches!(desc.scene.lightsources[1], LightDesc::Unsupported));
        assert_eq!(desc.scene.shapes.len(), 4);
        assert!(matches!(desc.scene.shapes[3], ShapeDesc::Unsupported));
    }

    #[test]
    fn test_parse_material_and_texture() {
        let desc = SceneDescription::from_json(SCENE).unwrap();

        match &desc.scene.shapes[0] {
            ShapeDesc::Sphere { radius, material: Some(m), texture, .. } => {
                assert_eq!(*radius, 1.0);
                assert_eq!(m.specularexponent, 20.0);
                assert_eq!(m.diffusecolor, [0.8, 0.5, 0.5]);
                assert!(texture.is_none());
            }
            other => panic!("expected sphere with material, got {:?}", other),
        }

        match &desc.scene.shapes[2] {
            ShapeDesc::Cylinder { texture, material, .. } => {
                assert_eq!(texture.as_deref(), Some("wood.ppm"));
                assert!(material.is_none());
            }
            other => panic!("expected cylinder, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_bounces_defaults_to_zero() {
        let text = SCENE.replace("\"nbounces\": 3,", "");
        let desc = SceneDescription::from_json(&text).unwrap();
        assert_eq!(desc.nbounces, 0);
    }

    #[test]
    fn test_binary_render_mode() {
        let text = SCENE.replace("\"phong\"", "\"binary\"");
        let desc = SceneDescription::from_json(&text).unwrap();
        assert!(desc.is_binary());
    }

    #[test]
    fn test_incomplete_material_fails_fast() {
        let text = SCENE.replace("\"ks\": 0.1, ", "");
        let err = SceneDescription::from_json(&text).unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_missing_camera_fails_fast() {
        let err = SceneDescription::from_json(r#"{ "scene": { "backgroundcolor": [0, 0, 0] } }"#)
            .unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_degenerate_camera_is_rejected() {
        let text = SCENE.replace("\"width\": 64", "\"width\": 0");
        let err = SceneDescription::from_json(&text).unwrap_err();
        assert!(matches!(err, SceneError::InvalidCamera(_)));
    }

    #[test]
    fn test_up_vector_parallel_to_view_is_rejected() {
        let text = SCENE.replace(
            "\"upVector\": [0.0, 1.0, 0.0]",
            "\"upVector\": [0.0, 0.0, -2.0]",
        );
        assert_ne!(text, SCENE);
        let err = SceneDescription::from_json(&text).unwrap_err();
        assert!(matches!(err, SceneError::InvalidCamera(_)));

        let zero = SCENE.replace("\"upVector\": [0.0, 1.0, 0.0]", "\"upVector\": [0.0, 0.0, 0.0]");
        assert!(matches!(
            SceneDescription::from_json(&zero),
            Err(SceneError::InvalidCamera(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SceneDescription::load("/nonexistent/lux/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }
}
