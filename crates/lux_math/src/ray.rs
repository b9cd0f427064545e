use crate::Vec3;

/// A ray in 3D space with origin, unit direction and bounce depth.
///
/// Camera rays start at depth 0. Every indirect bounce spawned from a hit
/// point is one level deeper, which is what bounds the shading recursion.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub depth: u32,
}

impl Ray {
    /// Create a new ray. The direction is normalized; a zero direction
    /// stays zero and will not intersect anything.
    pub fn new(origin: Vec3, direction: Vec3, depth: u32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            depth,
        }
    }

    /// Create a depth-0 (primary) ray.
    #[inline]
    pub fn primary(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0)
    }

    /// Spawn a ray one bounce deeper than this one.
    #[inline]
    pub fn bounce(&self, origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, self.depth + 1)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the (unit) direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the bounce depth of the ray.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
