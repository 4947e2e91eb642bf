#![allow(clippy::needless_range_loop, clippy::module_inception)]

//! intensity-quant: intensity-bucket color quantization
//!
//! Every pixel is replaced by one of the first K entries of a fixed
//! ten-color palette, chosen from the pixel's average intensity. There is
//! no dithering, blending or adaptive palette: the output of a pixel
//! depends only on its own three channels.
//!
//! # Quick Start
//!
//! ```
//! use intensity_quant::{Color, PixelImage, QuantLevel, Quantizer};
//!
//! let level = QuantLevel::new(10).unwrap();
//! let image = PixelImage::from_raw(2, 1, vec![0, 0, 0, 255, 255, 255]).unwrap();
//!
//! let out = Quantizer::new(level).quantize(&image).unwrap();
//! assert_eq!(out.pixel(0, 0), Some(Color::BLACK));
//! assert_eq!(out.pixel(1, 0), Some(Color::new(0, 127, 127)));
//! ```
//!
//! # The Mapping
//!
//! ```text
//! intensity   = (c0 + c1 + c2) / 3
//! quant_index = intensity * (K - 1) / 255
//! output      = REFERENCE_PALETTE[quant_index]
//! ```
//!
//! Both divisions truncate. K is validated once when a [`QuantLevel`] is
//! built; a [`PixelImage`] is validated once when it is built. After that
//! quantization cannot fail on bad data.
//!
//! # Parallel Callers
//!
//! [`Quantizer::quantize_slice`] and [`quantize_into`] work on any run of
//! whole pixels, so a buffer can be split into rows or tiles and processed
//! concurrently with no shared mutable state.

pub mod api;
pub mod image;
pub mod level;
pub mod palette;
pub mod quantize;


pub use api::{QuantizeError, Quantizer};
pub use image::{ImageError, PixelImage, CHANNELS};
pub use level::{LevelError, QuantLevel};
pub use palette::{Color, Palette, PALETTE_SIZE, REFERENCE_PALETTE};
pub use quantize::{intensity, map_pixel, quant_index, quantize_into};
