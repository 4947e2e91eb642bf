//! Parallel CPU backend.
//!
//! Rows are independent, so the output buffer is split into row chunks and
//! each chunk is quantized on a rayon worker with no synchronization.

use async_trait::async_trait;
use intensity_quant::{PixelImage, QuantLevel, QuantizeError, Quantizer};
use rayon::prelude::*;
use std::time::Instant;

use super::{Dispatch, QuantizeBackend};
use crate::error::BenchError;

pub struct CpuBackend {
    pool: rayon::ThreadPool,
}

impl CpuBackend {
    /// Create a backend with `threads` workers (0 = one per core).
    pub fn new(threads: usize) -> Result<Self, BenchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("colorquant-cpu-{i}"))
            .build()
            .map_err(|e| BenchError::device("create thread pool", e))?;
        tracing::debug!(threads = pool.current_num_threads(), "CPU backend ready");
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Quantize synchronously on the pool.
    pub fn quantize_blocking(
        &self,
        image: &PixelImage,
        level: QuantLevel,
    ) -> Result<Dispatch, BenchError> {
        let quantizer = Quantizer::new(level);
        let src = image.as_bytes();
        let stride = image.stride();
        let mut out = vec![0u8; src.len()];

        let start = Instant::now();
        self.pool.install(|| {
            out.par_chunks_mut(stride)
                .zip(src.par_chunks(stride))
                .try_for_each(|(dst, row)| quantizer.quantize_slice(row, dst))
        })?;
        let kernel_time = start.elapsed();

        let image = PixelImage::from_raw(image.width(), image.height(), out)
            .map_err(QuantizeError::from)?;
        Ok(Dispatch { image, kernel_time })
    }
}

#[async_trait]
impl QuantizeBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    async fn quantize(
        &self,
        image: &PixelImage,
        level: QuantLevel,
    ) -> Result<Dispatch, BenchError> {
        self.quantize_blocking(image, level)
    }
}
