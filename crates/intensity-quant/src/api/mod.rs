//! Public API for the intensity-quant crate.
//!
//! This module provides the [`Quantizer`] entry point and the
//! [`QuantizeError`] unified error type.

mod error;
mod quantizer;

pub use error::QuantizeError;
pub use quantizer::Quantizer;
