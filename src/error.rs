use std::path::PathBuf;

use intensity_quant::{LevelError, QuantizeError};
use thiserror::Error;

/// Errors that abort a benchmark run.
///
/// Every variant is fatal: nothing in the harness retries or skips.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load image {}: {reason}", .path.display())]
    Input { path: PathBuf, reason: String },

    #[error("Device error during {operation}: {detail}")]
    Device {
        operation: &'static str,
        detail: String,
    },

    #[error("Quantization error: {0}")]
    Quantize(#[from] QuantizeError),

    #[error("Failed to save image {}: {reason}", .path.display())]
    Output { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    pub fn device(operation: &'static str, detail: impl ToString) -> Self {
        BenchError::Device {
            operation,
            detail: detail.to_string(),
        }
    }
}

/// Configuration rejected before any image is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Level(#[from] LevelError),

    #[error("Run count must be at least 1")]
    ZeroRuns,

    #[error("No input images configured")]
    NoInputs,

    #[error("JPEG quality {0} out of range (allowed: 1-100)")]
    JpegQuality(u8),

    #[error("Workgroup size {x}x{y} is invalid (each side 1-256, at most 256 invocations)")]
    Workgroup { x: u32, y: u32 },

    #[error(
        "Inputs {} and {} would both be written to {}",
        .first.display(),
        .second.display(),
        .output.display()
    )]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },

    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(String),
}
