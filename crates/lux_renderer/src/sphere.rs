//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lux_math::{Aabb, Interval, Vec3};
use std::f32::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    ///
    /// u follows the azimuth around +Y, v the polar angle (0 at the top).
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        let u = 0.5 + p.z.atan2(p.x) / (2.0 * PI);
        let v = 0.5 - p.y.clamp(-1.0, 1.0).asin() / PI;
        (u, v)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if !self.grid_hit(ray, ray_t) {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = ((ray.at(root) - self.center) / self.radius).normalize_or_zero();
        let (u, v) = Self::get_sphere_uv(outward_normal);

        Some(HitRecord::new(ray, root, outward_normal, u, v, &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
