//! End-to-end benchmark runs on the CPU backend.

mod common;

use common::*;
use colorquant::compute::{create_backend, CpuBackend};
use colorquant::error::{BenchError, ConfigError};
use colorquant::services::image_store::output_path;
use colorquant::services::Harness;
use intensity_quant::QuantLevel;
use pretty_assertions::assert_eq;

fn cpu() -> Box<CpuBackend> {
    Box::new(CpuBackend::new(2).expect("thread pool"))
}

#[tokio::test]
async fn test_bench_writes_one_output_per_input() {
    let ws = TestWorkspace::new();
    let a = ws.write_gradient("a.png", 32, 24);
    let b = ws.write_gradient("b.png", 17, 5);
    let config = ws.cpu_config(vec![a, b]);

    let harness = Harness::new(config, cpu()).unwrap();
    let summary = harness.run().await.unwrap();

    // Two runs overwrite the same files.
    assert_eq!(
        ws.output_files(),
        vec!["quantized_a_k10.png", "quantized_b_k10.png"]
    );
    assert_eq!(summary.timings.len(), 4);
    assert_eq!(summary.backend, "cpu");
    assert_eq!(summary.levels, 10);

    let runs: Vec<(u32, &str)> = summary
        .timings
        .iter()
        .map(|t| (t.run, t.image.as_str()))
        .collect();
    assert_eq!(runs, vec![(1, "a.png"), (1, "b.png"), (2, "a.png"), (2, "b.png")]);
    assert!(summary.timings.iter().all(|t| t.total_ms >= t.kernel_ms));

    let out = ws.output_dir();
    assert_dimensions(&out.join("quantized_a_k10.png"), 32, 24);
    assert_dimensions(&out.join("quantized_b_k10.png"), 17, 5);
    assert_uses_active_palette(&out.join("quantized_a_k10.png"), QuantLevel::default());
}

#[tokio::test]
async fn test_bench_respects_level() {
    let ws = TestWorkspace::new();
    let input = ws.write_gradient("grad.png", 64, 4);
    let mut config = ws.cpu_config(vec![input]);
    config.levels = 4;
    config.runs = 1;

    Harness::new(config, cpu()).unwrap().run().await.unwrap();

    let output = ws.output_dir().join("quantized_grad_k4.png");
    assert_uses_active_palette(&output, QuantLevel::new(4).unwrap());
}

#[tokio::test]
async fn test_bench_jpeg_input_produces_jpeg_output() {
    let ws = TestWorkspace::new();
    let input = ws.write_gradient("photo.jpg", 40, 30);
    let mut config = ws.cpu_config(vec![input]);
    config.runs = 1;

    Harness::new(config, cpu()).unwrap().run().await.unwrap();

    let output = ws.output_dir().join("quantized_photo_k10.jpg");
    assert_dimensions(&output, 40, 30);
    assert_eq!(
        image::ImageFormat::from_path(&output).unwrap(),
        image::ImageFormat::Jpeg
    );
}

#[tokio::test]
async fn test_per_run_outputs() {
    let ws = TestWorkspace::new();
    let input = ws.write_gradient("a.png", 8, 8);
    let mut config = ws.cpu_config(vec![input]);
    config.per_run_outputs = true;
    config.levels = 7;

    Harness::new(config, cpu()).unwrap().run().await.unwrap();

    assert_eq!(
        ws.output_files(),
        vec!["quantized_a_k7_r1.png", "quantized_a_k7_r2.png"]
    );
}

#[tokio::test]
async fn test_missing_input_fails_before_any_output() {
    let ws = TestWorkspace::new();
    let good = ws.write_gradient("good.png", 8, 8);
    let missing = ws.path().join("missing.jpg");
    let config = ws.cpu_config(vec![good, missing.clone()]);

    let result = Harness::new(config, cpu()).unwrap().run().await;

    match result {
        Err(BenchError::Input { path, .. }) => assert_eq!(path, missing),
        other => panic!("Expected Input error, got {other:?}"),
    }
    assert!(ws.output_files().is_empty());
    assert!(!ws.output_dir().exists());
}

#[tokio::test]
async fn test_out_of_range_level_is_rejected() {
    let ws = TestWorkspace::new();
    let input = ws.write_gradient("a.png", 4, 4);

    for k in [3, 11] {
        let mut config = ws.cpu_config(vec![input.clone()]);
        config.levels = k;

        let result = Harness::new(config, cpu());
        assert!(
            matches!(result, Err(BenchError::Config(ConfigError::Level(_)))),
            "K={k} should be rejected"
        );
    }
    assert!(ws.output_files().is_empty());
}

#[tokio::test]
async fn test_create_backend_cpu() {
    let ws = TestWorkspace::new();
    let config = ws.cpu_config(vec![]);

    let backend = create_backend(&config).await.unwrap();
    assert_eq!(backend.name(), "cpu");
}

#[tokio::test]
async fn test_json_report_after_run() {
    let ws = TestWorkspace::new();
    let input = ws.write_gradient("a.png", 8, 8);
    let config = ws.cpu_config(vec![input]);

    let summary = Harness::new(config, cpu()).unwrap().run().await.unwrap();
    let report = ws.path().join("report.json");
    summary.write_json(&report).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["timings"].as_array().unwrap().len(), 2);
    assert_eq!(value["stats"][0]["image"], "a.png");
    assert_eq!(value["stats"][0]["count"], 2);
}

#[tokio::test]
async fn test_inputs_sharing_a_stem_are_rejected() {
    let ws = TestWorkspace::new();
    let first = ws.write_gradient("x/img.png", 8, 8);
    let second = ws.write_gradient("y/img.png", 16, 4);
    let mut config = ws.cpu_config(vec![first.clone(), second.clone()]);
    config.runs = 1;

    match Harness::new(config, cpu()) {
        Err(BenchError::Config(ConfigError::OutputCollision {
            first: a,
            second: b,
            output,
        })) => {
            assert_eq!((a, b), (first.clone(), second.clone()));
            assert_eq!(
                output,
                output_path(&ws.output_dir(), &first, QuantLevel::default(), None)
            );
        }
        Err(other) => panic!("Expected OutputCollision, got {other:?}"),
        Ok(_) => panic!("Expected OutputCollision, got a harness"),
    }
    assert!(ws.output_files().is_empty());
}

#[tokio::test]
async fn test_stats_have_one_row_per_input() {
    let ws = TestWorkspace::new();
    let first = ws.write_gradient("x/img.png", 8, 8);
    let second = ws.write_gradient("y/img.jpg", 16, 4);
    let config = ws.cpu_config(vec![first, second]);

    let summary = Harness::new(config, cpu()).unwrap().run().await.unwrap();

    assert_eq!(
        ws.output_files(),
        vec!["quantized_img_k10.jpg", "quantized_img_k10.png"]
    );
    let rows: Vec<(usize, usize)> = summary.stats().iter().map(|s| (s.input, s.count)).collect();
    assert_eq!(rows, vec![(0, 2), (1, 2)]);
}
