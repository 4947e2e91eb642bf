//! Quantizer -- the reusable entry point for whole-image quantization.
//!
//! [`Quantizer`] binds a validated [`QuantLevel`] to a palette and
//! precomputes the 256-entry intensity lookup, so per-pixel work is one
//! add, one divide and one table read.

use crate::image::{PixelImage, CHANNELS};
use crate::level::QuantLevel;
use crate::palette::{Color, Palette, REFERENCE_PALETTE};
use crate::quantize::{check_buffers, quant_index};

use super::error::QuantizeError;

/// Whole-image quantizer for one level K.
///
/// - Constructor takes an already validated [`QuantLevel`], so no call can
///   fail on the level
/// - [`quantize()`](Self::quantize) takes `&self` and never mutates its
///   input, so one quantizer serves any number of images
///
/// # Example
///
/// ```
/// use intensity_quant::{Color, PixelImage, QuantLevel, Quantizer};
///
/// let quantizer = Quantizer::new(QuantLevel::new(10).unwrap());
/// let image = PixelImage::filled(4, 3, Color::new(255, 255, 255)).unwrap();
/// let out = quantizer.quantize(&image).unwrap();
///
/// assert_eq!((out.width(), out.height()), (4, 3));
/// assert!(out.pixels().all(|c| c == Color::new(0, 127, 127)));
/// ```
#[derive(Debug, Clone)]
pub struct Quantizer {
    level: QuantLevel,
    palette: Palette,
    index_table: [u8; 256],
    color_table: [Color; 256],
}

impl Quantizer {
    /// Quantizer over [`REFERENCE_PALETTE`].
    pub fn new(level: QuantLevel) -> Self {
        Self::with_palette(level, REFERENCE_PALETTE.clone())
    }

    /// Quantizer over a caller-supplied palette.
    pub fn with_palette(level: QuantLevel, palette: Palette) -> Self {
        let mut index_table = [0u8; 256];
        let mut color_table = [Color::BLACK; 256];
        for i in 0..256 {
            let index = quant_index(i as u8, level);
            index_table[i] = index as u8;
            color_table[i] = palette.get(index);
        }
        Self {
            level,
            palette,
            index_table,
            color_table,
        }
    }

    #[inline]
    pub fn level(&self) -> QuantLevel {
        self.level
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette index for every intensity 0..=255.
    #[inline]
    pub fn index_table(&self) -> &[u8; 256] {
        &self.index_table
    }

    /// Output color for one input pixel.
    #[inline]
    pub fn map(&self, color: Color) -> Color {
        self.color_table[color.intensity() as usize]
    }

    /// Quantize `image` into a new image of identical dimensions.
    pub fn quantize(&self, image: &PixelImage) -> Result<PixelImage, QuantizeError> {
        let mut out = vec![0u8; image.as_bytes().len()];
        self.quantize_slice(image.as_bytes(), &mut out)?;
        Ok(PixelImage::from_raw(image.width(), image.height(), out)?)
    }

    /// Quantize whole pixels from `src` into `dst`.
    ///
    /// This is the unit of work for parallel callers: any split of an image
    /// buffer at pixel boundaries can be processed independently.
    pub fn quantize_slice(&self, src: &[u8], dst: &mut [u8]) -> Result<(), QuantizeError> {
        check_buffers(src, dst)?;
        for (out, px) in dst.chunks_exact_mut(CHANNELS).zip(src.chunks_exact(CHANNELS)) {
            let color = self.map(Color::new(px[0], px[1], px[2]));
            out.copy_from_slice(&color.to_bytes());
        }
        Ok(())
    }
}
