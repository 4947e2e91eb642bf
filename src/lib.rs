//! Colorquant - intensity-bucket color quantization benchmark
//!
//! Loads a set of images, maps every pixel to one of K palette colors on a
//! compute backend (wgpu or a rayon CPU pool), and reports kernel timings.
//! This library exposes modules for integration testing.

pub mod compute;
pub mod error;
pub mod models;
pub mod services;
