//! Owned, tightly packed three-channel image.

use super::error::ImageError;
use crate::palette::Color;

/// Bytes per pixel.
pub const CHANNELS: usize = 3;

/// A non-empty image of three-channel 8-bit pixels in row-major order.
///
/// Rows are tightly packed (`stride == width * 3`), so the buffer length
/// is always `width * height * 3`. A `PixelImage` can only be built with
/// valid dimensions, which lets the quantizer skip per-call checks.
///
/// # Example
///
/// ```
/// use intensity_quant::{Color, PixelImage};
///
/// let image = PixelImage::from_raw(2, 1, vec![0, 0, 0, 255, 255, 255]).unwrap();
/// assert_eq!(image.pixel(1, 0), Some(Color::new(255, 255, 255)));
/// assert!(PixelImage::from_raw(0, 1, vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelImage {
    /// Wrap a raw buffer after validating it against the dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = buffer_len(width, height)?;
        if data.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// An image with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Color) -> Result<Self, ImageError> {
        let len = buffer_len(width, height)?;
        let data = color
            .to_bytes()
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build an image whose pixel at `(x, y)` is `f(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, ImageError>
    where
        F: FnMut(usize, usize) -> Color,
    {
        let mut data = Vec::with_capacity(buffer_len(width, height)?);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y).to_bytes());
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width * CHANNELS
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// The raw interleaved channel bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and return its buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of row `y`, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride();
        Some(&self.data[start..start + self.stride()])
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * CHANNELS;
        Some(Color::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|c| Color::new(c[0], c[1], c[2]))
    }

    /// Swap the first and last channel of every pixel in place.
    pub fn reverse_channels(&mut self) {
        for px in self.data.chunks_exact_mut(CHANNELS) {
            px.swap(0, 2);
        }
    }
}

fn buffer_len(width: usize, height: usize) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::ZeroDimension { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(ImageError::DimensionOverflow { width, height })
}
