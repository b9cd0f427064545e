//! Scene aggregator and shading engine.
//!
//! Holds the objects and point lights, answers nearest-hit and shadow
//! queries, and computes the radiance leaving a hit point:
//!
//! - ambient: the hit material's diffuse color
//! - direct: Phong diffuse + specular from every unoccluded light
//! - indirect: stochastic bounce rays, recursively traced while the ray
//!   depth is below the scene's bounce limit

use crate::{reflect, Color, HitRecord, Hittable, PointLight, Ray, Shape};
use crate::random::random_hemisphere;
use lux_math::{Interval, Vec3};
use rand::RngCore;

/// Distance bounce rays are pushed off the surface along the normal.
const BOUNCE_OFFSET: f32 = 0.01;

/// Result of shading a ray: the nearest surface and the radiance it sends
/// back along the ray.
#[derive(Debug, Clone)]
pub struct TraceHit {
    pub record: HitRecord,
    pub radiance: Color,
}

/// Number of indirect samples taken at a hit of the given bounce depth.
///
/// Wide at the camera hit, a single sample from depth 2 on.
pub fn indirect_samples(depth: u32) -> u32 {
    match depth {
        0 => 15,
        1 => 2,
        _ => 1,
    }
}

/// Objects, lights and the bounce limit of a renderable scene.
///
/// Read-only while rendering; worker threads share it by reference.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Shape>,
    lights: Vec<PointLight>,
    max_bounces: u32,
}

impl Scene {
    /// Create an empty scene with the given bounce limit.
    pub fn new(max_bounces: u32) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            max_bounces,
        }
    }

    /// Add an object. Insertion order is kept.
    pub fn add(&mut self, object: impl Into<Shape>) {
        self.objects.push(object.into());
    }

    /// Add a point light.
    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn objects(&self) -> &[Shape] {
        &self.objects
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn max_bounces(&self) -> u32 {
        self.max_bounces
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Closest intersection over all objects, without shading.
    pub fn hit_nearest(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    /// True if any object blocks the segment from `point` to `light`.
    pub fn occluded(&self, point: Vec3, light: &PointLight, t_min: f32) -> bool {
        let to_light = light.position - point;
        let distance = to_light.length();
        if distance <= t_min {
            return false;
        }

        let probe = Ray::primary(point, to_light);
        let segment = Interval::new(t_min, distance);
        self.objects
            .iter()
            .any(|object| object.hit(&probe, segment).is_some())
    }

    /// Phong lighting from all unoccluded lights at a hit.
    ///
    /// `eye` is the camera position used for the view-dependent term.
    pub fn direct_lighting(&self, rec: &HitRecord, eye: Vec3, t_min: f32) -> Color {
        let material = &rec.material;
        let n = rec.normal;
        let view = (eye - rec.p).normalize_or_zero();

        let mut total = Color::ZERO;
        for light in &self.lights {
            if self.occluded(rec.p, light, t_min) {
                continue;
            }

            let l = (light.position - rec.p).normalize_or_zero();
            let n_dot_l = n.dot(l);
            let r = 2.0 * n_dot_l * n - l;

            let diffuse = material.kd * n_dot_l.max(0.0) * material.diffuse_color * light.color;
            let specular = material.ks
                * r.dot(view).max(0.0).powf(material.shininess)
                * material.specular_color
                * light.color;

            total += diffuse + specular;
        }

        total
    }

    /// Trace a ray: nearest hit plus the radiance it carries back.
    ///
    /// Returns `None` on a miss; the caller substitutes its background.
    pub fn trace(
        &self,
        ray: &Ray,
        ray_t: Interval,
        eye: Vec3,
        rng: &mut dyn RngCore,
    ) -> Option<TraceHit> {
        let record = self.hit_nearest(ray, ray_t)?;

        let ambient = record.material.diffuse_color;
        let direct = self.direct_lighting(&record, eye, ray_t.min);
        let indirect = if ray.depth() < self.max_bounces {
            self.indirect_lighting(ray, &record, ray_t, eye, rng)
        } else {
            Color::ZERO
        };

        Some(TraceHit {
            radiance: ambient + direct + indirect,
            record,
        })
    }

    /// Average of recursively traced bounce rays leaving `rec`.
    fn indirect_lighting(
        &self,
        ray: &Ray,
        rec: &HitRecord,
        ray_t: Interval,
        eye: Vec3,
        rng: &mut dyn RngCore,
    ) -> Color {
        let samples = indirect_samples(ray.depth());
        let material = &rec.material;
        let origin = rec.p + BOUNCE_OFFSET * rec.normal;
        let mirror = reflect(ray.direction(), rec.normal).normalize_or_zero();
        let bounce_t = Interval::from_min(ray_t.min);

        let mut collected = Color::ZERO;
        for _ in 0..samples {
            let sampled = random_hemisphere(rec.normal, rng);
            let direction = if material.reflective {
                let blended =
                    material.reflectivity * mirror + (1.0 - material.reflectivity) * sampled;
                if blended.length_squared() < 1e-12 {
                    rec.normal
                } else {
                    blended
                }
            } else {
                sampled
            };

            let bounce = ray.bounce(origin, direction);
            if let Some(hit) = self.trace(&bounce, bounce_t, eye, rng) {
                let weight = rec.normal.dot(-hit.record.normal).max(0.0);
                collected += weight * material.specular_color * hit.radiance;
            }
        }

        collected / samples as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Sphere, Triangle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const T_MIN: f32 = 0.001;

    fn matte(color: Color) -> Material {
        Material::phong(1.0, 0.0, 1.0, color, Color::ONE)
    }

    /// Triangle in the y = `height` plane with the origin column well inside.
    fn plane_triangle(height: f32, half: f32, material: Material) -> Triangle {
        Triangle::new(
            Vec3::new(-half, height, half),
            Vec3::new(half, height, half),
            Vec3::new(0.0, height, -2.0 * half),
            material,
        )
    }

    fn add_floor(scene: &mut Scene, half: f32, material: Material) {
        scene.add(plane_triangle(0.0, half, material));
    }

    #[test]
    fn test_indirect_sample_falloff() {
        assert_eq!(indirect_samples(0), 15);
        assert_eq!(indirect_samples(1), 2);
        assert_eq!(indirect_samples(2), 1);
        assert_eq!(indirect_samples(10), 1);
    }

    #[test]
    fn test_nearest_hit_is_global_minimum() {
        // Inserted far-to-near so a first-hit search would fail
        let mut scene = Scene::new(0);
        for z in [-10.0, -6.0, -3.0, -8.0] {
            scene.add(Sphere::new(Vec3::new(0.0, 0.0, z), 1.0, Material::default()));
        }

        let ray = Ray::primary(Vec3::ZERO, -Vec3::Z);
        let rec = scene.hit_nearest(&ray, Interval::from_min(T_MIN)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::new(3);
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::primary(Vec3::ZERO, Vec3::Z);

        assert!(scene.is_empty());
        assert!(scene.trace(&ray, Interval::from_min(T_MIN), Vec3::ZERO, &mut rng).is_none());
    }

    #[test]
    fn test_ambient_plus_direct_without_bounces() {
        let mut scene = Scene::new(0);
        add_floor(&mut scene, 10.0, matte(Color::new(0.5, 0.25, 0.125)));
        scene.add_light(PointLight::new(Vec3::new(0.0, 4.0, 0.0), Color::splat(0.5)));

        let eye = Vec3::new(0.0, 2.0, 0.0);
        let ray = Ray::primary(eye, -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(1);
        let hit = scene.trace(&ray, Interval::from_min(T_MIN), eye, &mut rng).unwrap();

        // N.L = 1, kd = 1, ks = 0: ambient + diffuse * light
        let base = Color::new(0.5, 0.25, 0.125);
        let expected = base + base * 0.5;
        assert!((hit.radiance - expected).length() < 1e-5);
        assert_eq!(hit.record.normal, Vec3::Y);
    }

    #[test]
    fn test_specular_highlight() {
        let mut scene = Scene::new(0);
        let material = Material::phong(0.0, 1.0, 8.0, Color::ZERO, Color::ONE);
        add_floor(&mut scene, 10.0, material);
        scene.add_light(PointLight::new(Vec3::new(0.0, 4.0, 0.0), Color::ONE));

        // Light, eye and normal aligned: R.V = 1
        let eye = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::primary(eye, -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(1);
        let hit = scene.trace(&ray, Interval::from_min(T_MIN), eye, &mut rng).unwrap();

        assert!((hit.radiance - Color::ONE).length() < 1e-4);
    }

    #[test]
    fn test_occluded_light_contributes_nothing() {
        let mut scene = Scene::new(0);
        add_floor(&mut scene, 10.0, matte(Color::splat(0.2)));
        scene.add_light(PointLight::new(Vec3::new(0.0, 4.0, 0.0), Color::ONE));
        // Blocker between the floor point and the light
        scene.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5, matte(Color::ZERO)));

        let point_ray = Ray::primary(Vec3::new(0.0, 1.0, 1.5), Vec3::new(0.0, -1.0, -1.5));
        let rec = scene.hit_nearest(&point_ray, Interval::from_min(T_MIN)).unwrap();
        assert!(rec.p.length() < 1e-3);

        assert!(scene.occluded(rec.p, &scene.lights()[0], T_MIN));
        let direct = scene.direct_lighting(&rec, Vec3::new(0.0, 1.0, 1.5), T_MIN);
        assert_eq!(direct, Color::ZERO);
    }

    #[test]
    fn test_objects_beyond_light_do_not_shadow() {
        let mut scene = Scene::new(0);
        add_floor(&mut scene, 10.0, matte(Color::splat(0.2)));
        let light = PointLight::new(Vec3::new(0.0, 4.0, 0.0), Color::ONE);
        scene.add_light(light);
        scene.add(Sphere::new(Vec3::new(0.0, 8.0, 0.0), 1.0, matte(Color::ZERO)));

        assert!(!scene.occluded(Vec3::ZERO, &light, T_MIN));
    }

    #[test]
    fn test_shadow_ray_points_at_light() {
        // Light far from the origin: a probe along the raw light position
        // would miss this blocker.
        let mut scene = Scene::new(0);
        let light = PointLight::new(Vec3::new(10.0, 5.0, 0.0), Color::ONE);
        scene.add_light(light);
        scene.add(Sphere::new(Vec3::new(7.0, 3.0, 0.0), 0.5, Material::default()));

        let point = Vec3::new(4.0, 1.0, 0.0);
        assert!(scene.occluded(point, &light, T_MIN));
    }

    #[test]
    fn test_bounces_add_indirect_light() {
        let build = |bounces| {
            let mut scene = Scene::new(bounces);
            let material = Material::phong(0.0, 0.0, 1.0, Color::splat(0.5), Color::ONE);
            add_floor(&mut scene, 50.0, material.clone());
            scene.add(plane_triangle(3.0, 50.0, material));
            scene
        };

        let eye = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::primary(eye, -Vec3::Y);
        let ray_t = Interval::from_min(T_MIN);

        let mut rng = StdRng::seed_from_u64(5);
        let flat = build(0).trace(&ray, ray_t, eye, &mut rng).unwrap();
        assert!((flat.radiance - Color::splat(0.5)).length() < 1e-6);

        let mut rng = StdRng::seed_from_u64(5);
        let bounced = build(2).trace(&ray, ray_t, eye, &mut rng).unwrap();
        assert!(bounced.radiance.x > flat.radiance.x);
        assert!(bounced.radiance.x.is_finite());
    }

    #[test]
    fn test_zero_bounces_consumes_no_randomness() {
        let mut scene = Scene::new(0);
        add_floor(&mut scene, 10.0, matte(Color::splat(0.5)));

        let eye = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::primary(eye, -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(3);
        scene.trace(&ray, Interval::from_min(T_MIN), eye, &mut rng).unwrap();

        let mut fresh = StdRng::seed_from_u64(3);
        assert_eq!(rng.next_u64(), fresh.next_u64());
    }

    #[test]
    fn test_trace_is_deterministic_for_seed() {
        let mut scene = Scene::new(3);
        add_floor(&mut scene, 10.0, matte(Color::splat(0.5)));
        scene.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, matte(Color::new(0.9, 0.1, 0.1))));
        scene.add_light(PointLight::new(Vec3::new(3.0, 5.0, 3.0), Color::ONE));

        let eye = Vec3::new(0.0, 1.0, 5.0);
        let ray = Ray::primary(eye, Vec3::new(0.2, -0.5, -1.0));
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            scene
                .trace(&ray, Interval::from_min(T_MIN), eye, &mut rng)
                .map(|hit| hit.radiance)
        };

        let a = run(17).unwrap();
        let b = run(17).unwrap();
        assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
    }

    /// Counts every value drawn from the wrapped generator.
    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    #[test]
    fn test_deeper_limit_keeps_samples_at_each_depth() {
        // Inside a closed sphere every bounce hits; no lights, so only
        // hemisphere sampling draws (three values per sample).
        let enclosed = |bounces| {
            let mut scene = Scene::new(bounces);
            scene.add(Sphere::new(Vec3::ZERO, 10.0, matte(Color::splat(0.5))));
            scene
        };

        for depth in 0..3 {
            let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, -1.0, 0.2), depth);
            let draws = |bounces| {
                let mut rng = CountingRng {
                    inner: StdRng::seed_from_u64(21),
                    draws: 0,
                };
                enclosed(bounces)
                    .trace(&ray, Interval::from_min(T_MIN), Vec3::ZERO, &mut rng)
                    .unwrap();
                rng.draws
            };

            let here = indirect_samples(depth) as usize;
            let below = indirect_samples(depth + 1) as usize;

            // Children are leaves at depth + 1
            assert_eq!(draws(depth + 1), 3 * here);
            // Same sample count at this depth, plus one more level below
            assert_eq!(draws(depth + 2), 3 * here * (1 + below));
            // At the limit nothing recurses
            assert_eq!(draws(depth), 0);
        }
    }
}
