//! Palette types
//!
//! This module provides the three-channel [`Color`] sample and the fixed
//! [`Palette`] table that quantization draws its output colors from.

mod color;
mod palette;

pub use color::Color;
pub use palette::{Palette, PALETTE_SIZE, REFERENCE_PALETTE};
