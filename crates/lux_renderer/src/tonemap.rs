//! Reinhard global tone mapping.

use crate::{Color, ImageBuffer};

/// Default key value (middle grey).
pub const DEFAULT_KEY: f32 = 0.18;

/// Rec. 709 relative luminance.
#[inline]
pub fn luminance(c: Color) -> f32 {
    0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}

/// Apply the Reinhard operator `c·e / (1 + c·e)` per channel.
///
/// The exposure `e` is `key` over the average luminance of the image.
/// Black (or empty) images are returned unchanged.
pub fn reinhard(image: &ImageBuffer, key: f32) -> ImageBuffer {
    let total: f32 = image.pixels.iter().map(|c| luminance(*c)).sum();
    let average = total / image.pixels.len().max(1) as f32;

    if average <= 0.0 {
        return image.clone();
    }

    let exposure = key / average;
    let pixels = image
        .pixels
        .iter()
        .map(|c| {
            let scaled = *c * exposure;
            scaled / (Color::ONE + scaled)
        })
        .collect();

    ImageBuffer {
        width: image.width,
        height: image.height,
        pixels,
    }
}
