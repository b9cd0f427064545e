//! Hittable trait, HitRecord and the closed `Shape` set.

use crate::{Cylinder, Disk, Material, Ray, Sphere, Triangle};
use lux_math::{Aabb, Interval, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Snapshot of the surface material, texture already applied
    pub material: Material,
    /// Surface parametrization used for the texture lookup
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Build a record for a hit at `t`.
    ///
    /// `outward_normal` must be unit length. The material is copied as seen
    /// at (u, v), so later readers never look at the shape again.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, u: f32, v: f32, material: &Material) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material: material.at_surface(u, v),
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
///
/// A miss is `None`, never an error: no root in range, a missed bounding
/// box and degenerate denominators all report "no hit".
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `ray_t.min < t < ray_t.max`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Slab test of the ray against the bounding box over `[t0, t1]`.
    fn bounding_box_hit(&self, ray: &Ray, t0: f32, t1: f32) -> bool {
        self.bounding_box().hit(ray, Interval::new(t0, t1))
    }

    /// Broad-phase reject run before the exact test.
    fn grid_hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.bounding_box_hit(ray, ray_t.min, ray_t.max)
    }
}

/// Every primitive the scene can hold.
///
/// Dispatch is a `match`, keeping virtual calls off the per-ray path.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Cylinder(Cylinder),
    Disk(Disk),
}

impl Hittable for Shape {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            Shape::Sphere(s) => s.hit(ray, ray_t),
            Shape::Triangle(s) => s.hit(ray, ray_t),
            Shape::Cylinder(s) => s.hit(ray, ray_t),
            Shape::Disk(s) => s.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.bounding_box(),
            Shape::Triangle(s) => s.bounding_box(),
            Shape::Cylinder(s) => s.bounding_box(),
            Shape::Disk(s) => s.bounding_box(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Triangle> for Shape {
    fn from(s: Triangle) -> Self {
        Shape::Triangle(s)
    }
}

impl From<Cylinder> for Shape {
    fn from(s: Cylinder) -> Self {
        Shape::Cylinder(s)
    }
}

impl From<Disk> for Shape {
    fn from(s: Disk) -> Self {
        Shape::Disk(s)
    }
}
