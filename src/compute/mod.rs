//! Compute backends for the per-pixel quantization dispatch.
//!
//! Both backends implement the mapping in `intensity_quant::quantize` and
//! must produce byte-identical output to `Quantizer::quantize`. They differ
//! only in where the pixels are processed.

pub mod cpu;
pub mod gpu;

use async_trait::async_trait;
use intensity_quant::{PixelImage, QuantLevel};
use std::time::Duration;

use crate::error::BenchError;
use crate::models::{BackendKind, BenchConfig};

pub use cpu::CpuBackend;
pub use gpu::GpuBackend;

/// Result of one quantization dispatch.
#[derive(Debug)]
pub struct Dispatch {
    /// Quantized image, same dimensions as the input
    pub image: PixelImage,
    /// Time from submitting the work to its completion
    pub kernel_time: Duration,
}

/// A target that can run the quantization kernel over a whole image.
#[async_trait]
pub trait QuantizeBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Quantize `image` at `level`, blocking until the work has finished.
    async fn quantize(&self, image: &PixelImage, level: QuantLevel)
        -> Result<Dispatch, BenchError>;
}

/// Acquire the backend selected by `config`.
///
/// For the GPU this acquires the adapter and device and compiles the
/// kernel, so device errors surface here before any image is processed.
pub async fn create_backend(config: &BenchConfig) -> Result<Box<dyn QuantizeBackend>, BenchError> {
    match config.backend {
        BackendKind::Gpu => Ok(Box::new(GpuBackend::new(config.workgroup).await?)),
        BackendKind::Cpu => Ok(Box::new(CpuBackend::new(config.threads)?)),
    }
}
