//! Error type for malformed image buffers.

use std::fmt;

/// Error type for image buffer validation.
///
/// Returned when a pixel buffer cannot describe a non-empty,
/// tightly packed three-channel image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Width or height is zero
    ZeroDimension {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// `width * height * 3` does not fit in `usize`
    DimensionOverflow {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// Buffer holds a trailing partial pixel
    PartialPixel {
        /// Bytes supplied
        len: usize,
    },
    /// Buffer length does not match the dimensions
    BufferLength {
        /// Bytes required by the dimensions
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::ZeroDimension { width, height } => {
                write!(f, "image has zero dimension ({}x{})", width, height)
            }
            ImageError::DimensionOverflow { width, height } => {
                write!(f, "image dimensions {}x{} overflow buffer size", width, height)
            }
            ImageError::PartialPixel { len } => write!(
                f,
                "pixel buffer of {} bytes is not a whole number of pixels",
                len
            ),
            ImageError::BufferLength { expected, actual } => write!(
                f,
                "pixel buffer has {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for ImageError {}
