use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use colorquant::compute::{self, gpu};
use colorquant::models::{BackendKind, BenchConfig, BenchOverrides};
use colorquant::services::{Harness, ImageStore};

#[derive(Parser)]
#[command(name = "colorquant")]
#[command(about = "Intensity-bucket color quantization benchmark")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    bench: BenchArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark (default when no subcommand is given)
    Bench(BenchArgs),
    /// Quantize a single image and write the result
    Quantize {
        /// Input image
        input: PathBuf,

        /// Output image; format follows the extension
        output: PathBuf,

        /// Palette size K (4-10)
        #[arg(short = 'k', long, default_value_t = 10, allow_negative_numbers = true)]
        levels: i64,

        #[arg(long, value_enum, default_value_t = BackendKind::Gpu)]
        backend: BackendKind,
    },
    /// List the GPU adapters wgpu can see
    Devices,
}

#[derive(clap::Args)]
struct BenchArgs {
    /// Palette size K (4-10)
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    levels: Option<i64>,

    /// Number of passes over all inputs
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    runs: Option<i64>,

    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// YAML config file (defaults to $CONFIG_FILE when set)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write timings as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// CPU backend worker threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Keep one output file per run instead of overwriting
    #[arg(long)]
    per_run_outputs: bool,

    /// Input images (replace the configured list)
    inputs: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorquant=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let result = match cli.command {
        Some(Commands::Bench(args)) => run_bench_command(args).await,
        Some(Commands::Quantize {
            input,
            output,
            levels,
            backend,
        }) => run_quantize_command(&input, &output, levels, backend).await,
        Some(Commands::Devices) => run_devices_command(),
        None => run_bench_command(cli.bench).await,
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run_bench_command(args: BenchArgs) -> anyhow::Result<()> {
    let config_file = args
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

    let mut config = BenchConfig::load(config_file.as_deref())?;
    config.apply(BenchOverrides {
        levels: args.levels,
        // Negative counts clamp to zero so validation reports them.
        runs: args.runs.map(|n| n.clamp(0, u32::MAX as i64) as u32),
        backend: args.backend,
        inputs: args.inputs,
        output_dir: args.output_dir,
        threads: args.threads,
        per_run_outputs: args.per_run_outputs,
    });
    config.validate()?;

    let backend = compute::create_backend(&config).await?;
    let harness = Harness::new(config, backend)?;
    let summary = harness.run().await?;

    summary.print_summary();
    if let Some(path) = args.report {
        summary.write_json(&path)?;
    }
    Ok(())
}

async fn run_quantize_command(
    input: &Path,
    output: &Path,
    levels: i64,
    backend: BackendKind,
) -> anyhow::Result<()> {
    let config = BenchConfig {
        levels,
        backend,
        inputs: vec![input.to_path_buf()],
        ..Default::default()
    };
    let level = config.validate()?;

    let store = ImageStore::new(config.jpeg_quality);
    let loaded = store.load(input).await?;
    let backend = compute::create_backend(&config).await?;
    let dispatch = backend.quantize(&loaded.image, level).await?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    store.save(&dispatch.image, output).await?;

    println!(
        "Quantized {} -> {} (K={level}, {} backend, kernel {:.3} ms)",
        input.display(),
        output.display(),
        backend.name(),
        dispatch.kernel_time.as_secs_f64() * 1000.0
    );
    Ok(())
}

fn run_devices_command() -> anyhow::Result<()> {
    let adapters = gpu::list_adapters();
    if adapters.is_empty() {
        anyhow::bail!("No GPU adapters found");
    }
    println!("GPU adapters:\n");
    for info in adapters {
        println!(
            "  {} ({:?}, {:?}, driver: {})",
            info.name, info.backend, info.device_type, info.driver
        );
    }
    Ok(())
}
