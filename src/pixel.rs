//! Unpacked ↔ packed pixel conversion
//!
//! Unpacked samples hold one integer per channel per pixel (gray: 1, color: 3,
//! channel-interleaved). Packed samples hold one `0x00RRGGBB` integer per pixel
//! and are only used for rendering. Every component is clamped to [0, 255]
//! while packing; the unpacked source is never modified.

use crate::error::{ImageError, Result};

/// Force a sample into the displayable [0, 255] range
#[inline]
pub fn clamp_component(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Pack three already-clamped components into `0x00RRGGBB`
#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split a packed value back into its `[r, g, b]` components
#[inline]
pub fn unpack_rgb(packed: u32) -> [u8; 3] {
    [
        ((packed >> 16) & 0xff) as u8,
        ((packed >> 8) & 0xff) as u8,
        (packed & 0xff) as u8,
    ]
}

/// Convert unpacked gray samples to packed RGB
///
/// Each gray value is clamped and replicated into all three components, so the
/// result has exactly one packed value per input sample.
pub fn pack_gray_to_rgb(samples: &[i32]) -> Vec<u32> {
    samples
        .iter()
        .map(|&g| {
            let g = clamp_component(g);
            pack_rgb(g, g, g)
        })
        .collect()
}

/// Convert unpacked, interleaved (r, g, b) samples to packed RGB
///
/// # Errors
/// * [`ImageError::InvalidLength`] if `samples.len()` is not a multiple of 3
pub fn pack_color_to_rgb(samples: &[i32]) -> Result<Vec<u32>> {
    if samples.len() % 3 != 0 {
        return Err(ImageError::InvalidLength(samples.len()));
    }

    Ok(pack_triples(samples))
}

/// Pack every complete `[r, g, b]` triple; callers guarantee `len % 3 == 0`
pub(crate) fn pack_triples(samples: &[i32]) -> Vec<u32> {
    debug_assert_eq!(samples.len() % 3, 0);
    samples
        .chunks_exact(3)
        .map(|rgb| {
            pack_rgb(
                clamp_component(rgb[0]),
                clamp_component(rgb[1]),
                clamp_component(rgb[2]),
            )
        })
        .collect()
}

/// Expand packed RGB into tightly packed RGBA bytes (alpha = 255) for upload
/// to a renderer
pub fn packed_to_rgba8(packed: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(packed.len() * 4);
    for &p in packed {
        let [r, g, b] = unpack_rgb(p);
        bytes.extend_from_slice(&[r, g, b, 255]);
    }
    bytes
}
