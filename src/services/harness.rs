use std::time::Instant;

use intensity_quant::QuantLevel;

use super::image_store::{output_path, ImageStore, LoadedImage};
use super::report::{millis, BenchSummary, RunTiming};
use crate::compute::QuantizeBackend;
use crate::error::BenchError;
use crate::models::BenchConfig;

/// Drives the benchmark: load every input, then quantize each one `runs`
/// times on the selected backend and write the results.
pub struct Harness {
    config: BenchConfig,
    level: QuantLevel,
    backend: Box<dyn QuantizeBackend>,
    store: ImageStore,
}

impl Harness {
    /// Validate `config` and bind it to an acquired backend.
    pub fn new(config: BenchConfig, backend: Box<dyn QuantizeBackend>) -> Result<Self, BenchError> {
        let level = config.validate()?;
        let store = ImageStore::new(config.jpeg_quality);
        Ok(Self {
            config,
            level,
            backend,
            store,
        })
    }

    pub fn level(&self) -> QuantLevel {
        self.level
    }

    pub async fn run(&self) -> Result<BenchSummary, BenchError> {
        let images = self.load_inputs().await?;

        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let runs = self.config.runs;
        let mut summary = BenchSummary::new(self.backend.name(), self.level.get(), runs);
        tracing::info!(
            backend = self.backend.name(),
            levels = self.level.get(),
            runs,
            images = images.len(),
            "Starting benchmark"
        );

        for run in 1..=runs {
            println!("[*] Run {run}/{runs}");
            for (index, input) in images.iter().enumerate() {
                let timing = self.process(index, input, run).await?;
                summary.record(timing);
            }
        }

        Ok(summary)
    }

    /// Decode all inputs up front; the first failure aborts the benchmark.
    async fn load_inputs(&self) -> Result<Vec<LoadedImage>, BenchError> {
        let mut images = Vec::with_capacity(self.config.inputs.len());
        for path in &self.config.inputs {
            images.push(self.store.load(path).await?);
        }
        Ok(images)
    }

    async fn process(
        &self,
        index: usize,
        input: &LoadedImage,
        run: u32,
    ) -> Result<RunTiming, BenchError> {
        let start = Instant::now();
        let dispatch = self.backend.quantize(&input.image, self.level).await?;
        let total = start.elapsed();

        let kernel_ms = millis(dispatch.kernel_time);
        let total_ms = millis(total);
        println!(
            "{}: kernel {kernel_ms:.3} ms, total {total_ms:.3} ms",
            input.name
        );

        let run_suffix = self.config.per_run_outputs.then_some(run);
        let out = output_path(&self.config.output_dir, &input.path, self.level, run_suffix);
        self.store.save(&dispatch.image, &out).await?;

        Ok(RunTiming {
            run,
            input: index,
            image: input.name.clone(),
            kernel_ms,
            total_ms,
        })
    }
}
