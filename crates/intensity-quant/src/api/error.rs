//! Unified error type for the intensity-quant public API.

use crate::image::ImageError;
use crate::level::LevelError;
use std::fmt;

/// Unified error type for the intensity-quant public API.
///
/// Wraps the crate's error types into a single enum for convenient `?`
/// propagation in application code.
///
/// # Example
///
/// ```
/// use intensity_quant::{PixelImage, QuantLevel, QuantizeError, Quantizer};
///
/// fn quantize_raw(w: usize, h: usize, data: Vec<u8>, k: u8) -> Result<PixelImage, QuantizeError> {
///     let quantizer = Quantizer::new(QuantLevel::new(k)?);
///     let image = PixelImage::from_raw(w, h, data)?;
///     quantizer.quantize(&image)
/// }
///
/// assert!(matches!(quantize_raw(0, 0, vec![], 10), Err(QuantizeError::InvalidInput(_))));
/// assert!(matches!(quantize_raw(1, 1, vec![0; 3], 11), Err(QuantizeError::Level(_))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizeError {
    /// Malformed image input (zero dimension, wrong buffer length)
    InvalidInput(ImageError),
    /// Quantization level outside the accepted range
    Level(LevelError),
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::InvalidInput(err) => write!(f, "invalid input: {}", err),
            QuantizeError::Level(err) => write!(f, "level error: {}", err),
        }
    }
}

impl std::error::Error for QuantizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuantizeError::InvalidInput(err) => Some(err),
            QuantizeError::Level(err) => Some(err),
        }
    }
}

impl From<ImageError> for QuantizeError {
    fn from(err: ImageError) -> Self {
        QuantizeError::InvalidInput(err)
    }
}

impl From<LevelError> for QuantizeError {
    fn from(err: LevelError) -> Self {
        QuantizeError::Level(err)
    }
}
