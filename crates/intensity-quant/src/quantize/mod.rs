//! The per-pixel intensity-bucket mapping.
//!
//! ```text
//! intensity   = (c0 + c1 + c2) / 3            truncating, in [0, 255]
//! quant_index = intensity * (K - 1) / 255     truncating, in [0, K - 1]
//! output      = palette[quant_index]          written in input channel order
//! ```
//!
//! Each output pixel depends only on its own input pixel, so callers may
//! split buffers at any pixel boundary and process the pieces in parallel.

use crate::image::{ImageError, CHANNELS};
use crate::level::QuantLevel;
use crate::palette::{Color, Palette, REFERENCE_PALETTE};

/// Unweighted channel average, truncated.
#[inline]
pub fn intensity(color: Color) -> u8 {
    color.intensity()
}

/// Palette index for an intensity at level K.
///
/// Truncating division, not rounding: 0 maps to 0 and 255 maps to K-1;
/// everything in between rounds toward zero. The product is at most
/// `255 * 9`, well inside `u32`.
#[inline]
pub fn quant_index(intensity: u8, level: QuantLevel) -> usize {
    (intensity as u32 * (level.get() as u32 - 1) / 255) as usize
}

/// Quantize a single pixel against the reference palette.
#[inline]
pub fn map_pixel(color: Color, level: QuantLevel) -> Color {
    REFERENCE_PALETTE.get(quant_index(color.intensity(), level))
}

/// Quantize whole pixels from `src` into `dst` against the reference palette.
///
/// Both slices must have the same length, a multiple of three.
pub fn quantize_into(src: &[u8], dst: &mut [u8], level: QuantLevel) -> Result<(), ImageError> {
    quantize_with_palette(src, dst, level, &REFERENCE_PALETTE)
}

pub(crate) fn quantize_with_palette(
    src: &[u8],
    dst: &mut [u8],
    level: QuantLevel,
    palette: &Palette,
) -> Result<(), ImageError> {
    check_buffers(src, dst)?;
    let active = palette.active(level);
    for (out, px) in dst.chunks_exact_mut(CHANNELS).zip(src.chunks_exact(CHANNELS)) {
        let color = Color::new(px[0], px[1], px[2]);
        out.copy_from_slice(&active[quant_index(color.intensity(), level)].to_bytes());
    }
    Ok(())
}

pub(crate) fn check_buffers(src: &[u8], dst: &[u8]) -> Result<(), ImageError> {
    if src.len() % CHANNELS != 0 {
        return Err(ImageError::PartialPixel { len: src.len() });
    }
    if dst.len() != src.len() {
        return Err(ImageError::BufferLength {
            expected: src.len(),
            actual: dst.len(),
        });
    }
    Ok(())
}
