//! Scratch directories with generated input images.

use std::path::{Path, PathBuf};

use colorquant::models::{BackendKind, BenchConfig};
use image::{Rgb, RgbImage};
use tempfile::TempDir;

/// A temporary directory holding generated inputs and an output directory.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("result")
    }

    /// Write a gradient covering the full intensity range.
    ///
    /// The format follows the extension of `name`, which may include
    /// subdirectories.
    pub fn write_gradient(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let image = RgbImage::from_fn(width, height, |x, y| {
            let v = ((x + y) * 255 / (width + height - 2).max(1)) as u8;
            Rgb([v, v.wrapping_mul(3), 255 - v])
        });
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dir");
        }
        image.save(&path).expect("write fixture image");
        path
    }

    /// CPU-backend configuration over `inputs`, writing into `output_dir()`.
    pub fn cpu_config(&self, inputs: Vec<PathBuf>) -> BenchConfig {
        BenchConfig {
            backend: BackendKind::Cpu,
            runs: 2,
            inputs,
            output_dir: self.output_dir(),
            threads: 2,
            ..Default::default()
        }
    }

    /// File names present in the output directory, sorted.
    pub fn output_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.output_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
