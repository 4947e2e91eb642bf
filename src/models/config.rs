use intensity_quant::QuantLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::backend::{BackendKind, Workgroup};
use crate::error::ConfigError;
use crate::services::image_store::output_path;

/// Benchmark configuration loaded from an optional YAML file.
///
/// Every field has a default, so an empty file (or no file) reproduces the
/// reference benchmark: K=10, ten runs, the three fixed inputs, GPU backend.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BenchConfig {
    /// Palette size K; must lie in [4, 10]
    #[serde(default = "default_levels")]
    pub levels: i64,

    /// Number of passes over all inputs
    #[serde(default = "default_runs")]
    pub runs: u32,

    /// Compute backend
    #[serde(default)]
    pub backend: BackendKind,

    /// Input image paths, processed in order
    #[serde(default = "default_inputs")]
    pub inputs: Vec<PathBuf>,

    /// Directory receiving quantized images
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Encoder quality for JPEG outputs
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// CPU backend worker threads (0 = one per core)
    #[serde(default)]
    pub threads: usize,

    /// Append the run number to output file names instead of overwriting
    #[serde(default)]
    pub per_run_outputs: bool,

    /// GPU workgroup dimensions
    #[serde(default)]
    pub workgroup: Workgroup,
}

fn default_levels() -> i64 {
    10
}

fn default_runs() -> u32 {
    10
}

fn default_inputs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("data/f1024x768.jpg"),
        PathBuf::from("data/f1280x960.jpg"),
        PathBuf::from("data/f2560x1440.jpg"),
    ]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("result")
}

fn default_jpeg_quality() -> u8 {
    95 // same default as the reference encoder
}

/// Values given on the command line; `None` keeps the file/default value.
#[derive(Debug, Default, Clone)]
pub struct BenchOverrides {
    pub levels: Option<i64>,
    pub runs: Option<u32>,
    pub backend: Option<BackendKind>,
    pub inputs: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub threads: Option<usize>,
    pub per_run_outputs: bool,
}

impl BenchConfig {
    /// Load from `path`, or use defaults when no path is given.
    ///
    /// Unlike a missing optional file, an explicitly named file that cannot
    /// be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            levels = config.levels,
            runs = config.runs,
            inputs = config.inputs.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line values on top of this configuration.
    pub fn apply(&mut self, overrides: BenchOverrides) {
        if let Some(levels) = overrides.levels {
            self.levels = levels;
        }
        if let Some(runs) = overrides.runs {
            self.runs = runs;
        }
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if !overrides.inputs.is_empty() {
            self.inputs = overrides.inputs;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(threads) = overrides.threads {
            self.threads = threads;
        }
        if overrides.per_run_outputs {
            self.per_run_outputs = true;
        }
    }

    /// Check the whole configuration once and return the validated level.
    pub fn validate(&self) -> Result<QuantLevel, ConfigError> {
        let level = QuantLevel::try_from(self.levels)?;
        if self.runs == 0 {
            return Err(ConfigError::ZeroRuns);
        }
        if self.inputs.is_empty() {
            return Err(ConfigError::NoInputs);
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::JpegQuality(self.jpeg_quality));
        }
        if !self.workgroup.is_valid() {
            return Err(ConfigError::Workgroup {
                x: self.workgroup.x,
                y: self.workgroup.y,
            });
        }

        // Output names only keep the file stem, so inputs from different
        // directories can land on the same file.
        let mut outputs: HashMap<PathBuf, &PathBuf> = HashMap::new();
        for input in &self.inputs {
            let output = output_path(&self.output_dir, input, level, None);
            if let Some(first) = outputs.insert(output.clone(), input) {
                return Err(ConfigError::OutputCollision {
                    first: first.clone(),
                    second: input.clone(),
                    output,
                });
            }
        }
        Ok(level)
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            runs: default_runs(),
            backend: BackendKind::default(),
            inputs: default_inputs(),
            output_dir: default_output_dir(),
            jpeg_quality: default_jpeg_quality(),
            threads: 0,
            per_run_outputs: false,
            workgroup: Workgroup::default(),
        }
    }
}
