//! Sampling helpers.
//!
//! Every render thread owns its own generator; nothing here touches shared
//! state. Generators are passed around as `&mut dyn RngCore`.

use lux_math::Vec3;
use rand::{Rng, RngCore};

/// Offset between per-chunk seeds (64-bit golden ratio).
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Seed for the generator of chunk `index`. Chunk 0 uses the base seed.
pub fn chunk_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(SEED_STRIDE))
}

/// Random point in the square [-0.5, 0.5) x [-0.5, 0.5).
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

/// Random point in the unit disk (z = 0), by rejection.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Coarse hemisphere sample around `normal`.
///
/// Three uniform [0, 1) components, flipped to the normal's side and
/// normalized. Not cosine weighted and not uniform over the hemisphere.
pub fn random_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let v = Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng));
    let v = if v.dot(normal) < 0.0 { -v } else { v };

    let unit = v.normalize_or_zero();
    if unit == Vec3::ZERO {
        normal
    } else {
        unit
    }
}
