//! Finite open cylinder primitive.
//!
//! The side surface only; caps are separate [`Disk`](crate::Disk) objects.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lux_math::{Aabb, Interval, Vec3};
use std::f32::consts::TAU;

/// A cylinder standing on `base`, extending `height` along `axis`.
#[derive(Debug, Clone)]
pub struct Cylinder {
    base: Vec3,
    axis: Vec3,
    radius: f32,
    height: f32,
    /// Orthonormal pair perpendicular to `axis`, origin of the azimuth
    tangent: Vec3,
    bitangent: Vec3,
    material: Material,
    bbox: Aabb,
}

impl Cylinder {
    /// Create a cylinder. `axis` is normalized; a zero axis falls back to +Y.
    pub fn new(base: Vec3, axis: Vec3, radius: f32, height: f32, material: Material) -> Self {
        let axis = match axis.try_normalize() {
            Some(axis) => axis,
            None => Vec3::Y,
        };
        let radius = radius.max(0.0);
        let height = height.max(0.0);
        let (tangent, bitangent) = axis.any_orthonormal_pair();
        let bbox = disk_sweep_bounds(base, base + axis * height, axis, radius);

        Self {
            base,
            axis,
            radius,
            height,
            tangent,
            bitangent,
            material,
            bbox,
        }
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Accept `t` if it is in range and inside the axial extent.
    fn accept(&self, ray: &Ray, t: f32, ray_t: Interval) -> Option<HitRecord> {
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let along = (p - self.base).dot(self.axis);
        if !Interval::new(0.0, self.height).contains(along) {
            return None;
        }

        let outward_normal = (p - self.base - along * self.axis).normalize_or_zero();
        let mut phi = outward_normal
            .dot(self.bitangent)
            .atan2(outward_normal.dot(self.tangent));
        if phi < 0.0 {
            phi += TAU;
        }
        let u = phi / TAU;
        let v = if self.height > 0.0 { along / self.height } else { 0.0 };

        Some(HitRecord::new(ray, t, outward_normal, u, v, &self.material))
    }
}

impl Hittable for Cylinder {
    /// Quadratic in the plane orthogonal to the axis, clipped to [0, height].
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if !self.grid_hit(ray, ray_t) {
            return None;
        }

        let d = ray.direction();
        let oc = ray.origin() - self.base;
        let d_perp = d - self.axis * d.dot(self.axis);
        let oc_perp = oc - self.axis * oc.dot(self.axis);

        let a = d_perp.length_squared();
        // Ray runs along the axis: never crosses the side surface
        if a < 1e-12 {
            return None;
        }
        let b = 2.0 * oc_perp.dot(d_perp);
        let c = oc_perp.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = (-b - sqrtd) / (2.0 * a);
        let far = (-b + sqrtd) / (2.0 * a);

        self.accept(ray, near, ray_t)
            .or_else(|| self.accept(ray, far, ray_t))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Bounds of a disk of `radius` (normal `axis`) swept from `a` to `b`.
///
/// A disk with unit normal n extends `radius * sqrt(1 - n_i^2)` along
/// world axis i.
pub(crate) fn disk_sweep_bounds(a: Vec3, b: Vec3, axis: Vec3, radius: f32) -> Aabb {
    let extent = |n: f32| radius * (1.0 - n * n).max(0.0).sqrt();
    let e = Vec3::new(extent(axis.x), extent(axis.y), extent(axis.z));
    Aabb::from_points(a.min(b) - e, a.max(b) + e)
}
