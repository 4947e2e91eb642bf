//! wgpu compute backend.
//!
//! `GpuContext` owns the instance, device and queue; `QuantizePipeline`
//! owns the compiled kernel. Both are created once per benchmark and reused
//! for every image. Per-image buffers live only for the duration of one
//! `run` call. Every handle is an owned wgpu object, so all of them are
//! released on drop on both the success and the error path.

pub mod device;
pub mod kernel;

use async_trait::async_trait;
use intensity_quant::{PixelImage, QuantLevel};

use super::{Dispatch, QuantizeBackend};
use crate::error::BenchError;
use crate::models::Workgroup;

pub use device::{list_adapters, GpuContext};
pub use kernel::QuantizePipeline;

pub struct GpuBackend {
    // Declared before `ctx` so the pipeline is dropped before the device.
    pipeline: QuantizePipeline,
    ctx: GpuContext,
}

impl GpuBackend {
    /// Acquire a device and compile the kernel for `workgroup`.
    pub async fn new(workgroup: Workgroup) -> Result<Self, BenchError> {
        let ctx = GpuContext::new().await?;
        let pipeline = QuantizePipeline::new(&ctx, workgroup).await?;
        tracing::info!(adapter = %ctx.adapter_info.name, %workgroup, "GPU backend ready");
        Ok(Self { pipeline, ctx })
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }
}

#[async_trait]
impl QuantizeBackend for GpuBackend {
    fn name(&self) -> &'static str {
        "gpu"
    }

    async fn quantize(
        &self,
        image: &PixelImage,
        level: QuantLevel,
    ) -> Result<Dispatch, BenchError> {
        self.pipeline.run(&self.ctx, image, level).await
    }
}
