//! Three-channel pixel buffers and their validation errors.

mod error;
mod pixel_image;

pub use error::ImageError;
pub use pixel_image::{PixelImage, CHANNELS};
