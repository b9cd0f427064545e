//! Point light sources.

use crate::Color;
use lux_math::Vec3;

/// An infinitesimal emitter. Lights are not geometry: camera and bounce
/// rays never hit them, only shadow probes aim at them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Light intensity per channel
    pub color: Color,
}

impl PointLight {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }
}
