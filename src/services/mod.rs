pub mod harness;
pub mod image_store;
pub mod report;

pub use harness::Harness;
pub use image_store::{output_path, ImageStore, LoadedImage};
pub use report::{BenchSummary, RunTiming, TimingStats};
