//! The GPU kernel must agree byte for byte with the reference mapping.
//!
//! These tests need a real adapter: `cargo test -- --ignored`.

mod common;

use colorquant::compute::{create_backend, QuantizeBackend};
use colorquant::models::{BackendKind, BenchConfig};
use intensity_quant::{Color, PixelImage, QuantLevel, Quantizer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_image(width: usize, height: usize, seed: u64) -> PixelImage {
    let mut rng = StdRng::seed_from_u64(seed);
    PixelImage::from_fn(width, height, |_, _| Color::new(rng.gen(), rng.gen(), rng.gen())).unwrap()
}

async fn backend(kind: BackendKind) -> Box<dyn QuantizeBackend> {
    let config = BenchConfig {
        backend: kind,
        ..Default::default()
    };
    create_backend(&config).await.unwrap()
}

#[tokio::test]
#[ignore = "needs a GPU adapter"]
async fn test_gpu_and_cpu_agree() {
    let gpu = backend(BackendKind::Gpu).await;
    let cpu = backend(BackendKind::Cpu).await;
    let image = random_image(129, 67, 7);

    for level in QuantLevel::all() {
        let on_gpu = gpu.quantize(&image, level).await.unwrap();
        let on_cpu = cpu.quantize(&image, level).await.unwrap();
        assert_eq!(on_gpu.image, on_cpu.image, "K={level}");
        assert_eq!(on_gpu.image, Quantizer::new(level).quantize(&image).unwrap());
    }
}

#[tokio::test]
#[ignore = "needs a GPU adapter"]
async fn test_gpu_reference_frame_size() {
    let gpu = backend(BackendKind::Gpu).await;
    let image = random_image(2560, 1440, 42);
    let level = QuantLevel::default();

    let dispatch = gpu.quantize(&image, level).await.unwrap();
    assert_eq!(dispatch.image.width(), 2560);
    assert_eq!(dispatch.image.height(), 1440);
    assert_eq!(dispatch.image, Quantizer::new(level).quantize(&image).unwrap());
}

#[tokio::test]
async fn test_cpu_backend_matches_reference() {
    let cpu = backend(BackendKind::Cpu).await;
    let image = random_image(33, 9, 3);

    for level in QuantLevel::all() {
        let dispatch = cpu.quantize(&image, level).await.unwrap();
        assert_eq!(dispatch.image, Quantizer::new(level).quantize(&image).unwrap());
    }
}
