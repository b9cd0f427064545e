//! Bounded disk primitive (cylinder caps).

use crate::{
    cylinder::disk_sweep_bounds,
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lux_math::{Aabb, Interval, Vec3};
use std::f32::consts::TAU;

/// A flat disk of `radius` around `center`, facing `normal`.
#[derive(Debug, Clone)]
pub struct Disk {
    center: Vec3,
    normal: Vec3,
    radius: f32,
    tangent: Vec3,
    bitangent: Vec3,
    material: Material,
    bbox: Aabb,
}

impl Disk {
    /// Create a disk. `normal` is normalized; a zero normal falls back to +Y.
    pub fn new(center: Vec3, normal: Vec3, radius: f32, material: Material) -> Self {
        let normal = match normal.try_normalize() {
            Some(normal) => normal,
            None => Vec3::Y,
        };
        let radius = radius.max(0.0);
        let (tangent, bitangent) = normal.any_orthonormal_pair();
        let bbox = disk_sweep_bounds(center, center, normal, radius);

        Self {
            center,
            normal,
            radius,
            tangent,
            bitangent,
            material,
            bbox,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Disk {
    /// Plane intersection followed by a radial distance check.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if !self.grid_hit(ray, ray_t) {
            return None;
        }

        let denom = ray.direction().dot(self.normal);
        if denom.abs() < 1e-6 {
            return None;
        }

        let t = (self.center - ray.origin()).dot(self.normal) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let to_center = p - self.center;
        let distance_squared = to_center.length_squared();
        if distance_squared > self.radius * self.radius {
            return None;
        }

        // Polar parametrization: u = angle around the normal, v = radius fraction
        let mut phi = to_center.dot(self.bitangent).atan2(to_center.dot(self.tangent));
        if phi < 0.0 {
            phi += TAU;
        }
        let u = phi / TAU;
        let v = if self.radius > 0.0 {
            distance_squared.sqrt() / self.radius
        } else {
            0.0
        };

        Some(HitRecord::new(ray, t, self.normal, u, v, &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
