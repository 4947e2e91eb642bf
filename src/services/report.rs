use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::BenchError;

/// Timing of one image in one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunTiming {
    pub run: u32,
    /// Position of the image in the configured input list
    pub input: usize,
    pub image: String,
    /// Kernel execution only
    pub kernel_ms: f64,
    /// Dispatch including upload and readback
    pub total_ms: f64,
}

/// Aggregate over all runs of one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingStats {
    pub input: usize,
    pub image: String,
    pub count: usize,
    pub min_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
}

/// Everything recorded during a benchmark.
#[derive(Debug, Clone, Serialize)]
pub struct BenchSummary {
    pub backend: String,
    pub levels: u8,
    pub runs: u32,
    pub started_at: DateTime<Utc>,
    pub timings: Vec<RunTiming>,
}

impl BenchSummary {
    pub fn new(backend: impl Into<String>, levels: u8, runs: u32) -> Self {
        Self {
            backend: backend.into(),
            levels,
            runs,
            started_at: Utc::now(),
            timings: Vec::new(),
        }
    }

    pub fn record(&mut self, timing: RunTiming) {
        self.timings.push(timing);
    }

    /// Kernel-time statistics per input, in first-seen order.
    pub fn stats(&self) -> Vec<TimingStats> {
        let mut stats: Vec<TimingStats> = Vec::new();
        for timing in &self.timings {
            match stats.iter_mut().find(|s| s.input == timing.input) {
                Some(entry) => {
                    entry.count += 1;
                    entry.min_ms = entry.min_ms.min(timing.kernel_ms);
                    entry.max_ms = entry.max_ms.max(timing.kernel_ms);
                    // running sum until the final division below
                    entry.mean_ms += timing.kernel_ms;
                }
                None => stats.push(TimingStats {
                    input: timing.input,
                    image: timing.image.clone(),
                    count: 1,
                    min_ms: timing.kernel_ms,
                    mean_ms: timing.kernel_ms,
                    max_ms: timing.kernel_ms,
                }),
            }
        }
        for entry in &mut stats {
            entry.mean_ms /= entry.count as f64;
        }
        stats
    }

    pub fn print_summary(&self) {
        println!();
        println!(
            "Summary ({} backend, K={}, {} runs)",
            self.backend, self.levels, self.runs
        );
        println!(
            "{:<24} {:>6} {:>12} {:>12} {:>12}",
            "image", "runs", "min ms", "mean ms", "max ms"
        );
        for s in self.stats() {
            println!(
                "{:<24} {:>6} {:>12.3} {:>12.3} {:>12.3}",
                s.image, s.count, s.min_ms, s.mean_ms, s.max_ms
            );
        }
    }

    /// Write the summary and all timings as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), BenchError> {
        #[derive(Serialize)]
        struct Report<'a> {
            #[serde(flatten)]
            summary: &'a BenchSummary,
            stats: Vec<TimingStats>,
        }

        let report = Report {
            summary: self,
            stats: self.stats(),
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| BenchError::Output {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Wrote timing report");
        Ok(())
    }
}

/// Duration as fractional milliseconds.
pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn timing(run: u32, input: usize, image: &str, kernel_ms: f64) -> RunTiming {
        RunTiming {
            run,
            input,
            image: image.to_string(),
            kernel_ms,
            total_ms: kernel_ms + 1.0,
        }
    }

    #[test]
    fn test_stats_per_image() {
        let mut summary = BenchSummary::new("cpu", 10, 3);
        summary.record(timing(1, 0, "a.jpg", 2.0));
        summary.record(timing(1, 1, "b.jpg", 10.0));
        summary.record(timing(2, 0, "a.jpg", 4.0));
        summary.record(timing(3, 0, "a.jpg", 6.0));

        let stats = summary.stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(
            stats[0],
            TimingStats {
                input: 0,
                image: "a.jpg".to_string(),
                count: 3,
                min_ms: 2.0,
                mean_ms: 4.0,
                max_ms: 6.0,
            }
        );
        assert_eq!(stats[1].image, "b.jpg");
        assert_eq!(stats[1].count, 1);
        assert_eq!(stats[1].mean_ms, 10.0);
    }

    #[test]
    fn test_stats_keep_inputs_with_same_name_apart() {
        let mut summary = BenchSummary::new("cpu", 10, 2);
        summary.record(timing(1, 0, "img.png", 1.0));
        summary.record(timing(1, 1, "img.png", 3.0));
        summary.record(timing(2, 0, "img.png", 1.0));
        summary.record(timing(2, 1, "img.png", 3.0));

        let stats = summary.stats();
        assert_eq!(stats.len(), 2);
        assert_eq!((stats[0].input, stats[0].count, stats[0].mean_ms), (0, 2, 1.0));
        assert_eq!((stats[1].input, stats[1].count, stats[1].mean_ms), (1, 2, 3.0));
    }

    #[test]
    fn test_stats_empty() {
        assert!(BenchSummary::new("gpu", 4, 1).stats().is_empty());
    }

    #[test]
    fn test_millis() {
        assert_eq!(millis(Duration::from_micros(1500)), 1.5);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        let mut summary = BenchSummary::new("cpu", 6, 1);
        summary.record(timing(1, 0, "a.png", 1.5));
        summary.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["backend"], "cpu");
        assert_eq!(value["levels"], 6);
        assert_eq!(value["runs"], 1);
        assert_eq!(value["timings"][0]["image"], "a.png");
        assert_eq!(value["timings"][0]["kernel_ms"], 1.5);
        assert_eq!(value["stats"][0]["count"], 1);

        let started = value["started_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(started).is_ok());
    }
}
