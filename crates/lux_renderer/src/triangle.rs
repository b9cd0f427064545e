//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lux_math::{Aabb, Interval, Vec3};

/// Determinant magnitude below which the ray counts as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, zero for degenerate triangles)
    normal: Vec3,
    material: Material,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The outward normal follows the winding `(v1 - v0) x (v2 - v0)`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        // Aabb pads the thin dimension of axis-aligned triangles
        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);
        let bbox = Aabb::from_points(min, max);

        Self {
            v0,
            v1,
            v2,
            normal,
            material,
            bbox,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    ///
    /// The barycentric (u, v) of the hit doubles as texture coordinates.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if !self.grid_hit(ray, ray_t) {
            return None;
        }

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle (or the triangle is degenerate)
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, u, v, &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
