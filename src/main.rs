use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ppi_core::UpscaleMethod;
use ppi_upscale::models::{ConfigOverrides, MethodName, PipelineConfig};
use ppi_upscale::services::pipeline::default_ppi_path;
use ppi_upscale::services::{list_channel_files, Pipeline};

#[derive(Parser)]
#[command(name = "ppi-upscale")]
#[command(about = "Pseudo-panchromatic image synthesis and guided upscaling for multispectral bands")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: PPI, guide, upscaled PPI and 2x channels
    Run {
        /// Directory with <wavelength>nm.png band images
        #[arg(short, long, default_value = "data")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// PPI method: simple, ppid or igfppi
        #[arg(short, long)]
        method: Option<MethodName>,

        /// Upscaling factor
        #[arg(short, long)]
        upscale: Option<f64>,

        /// Upscaling method: guided, bicubic or lanczos
        #[arg(long)]
        upscale_method: Option<UpscaleMethod>,

        /// Channels reconstructed concurrently
        #[arg(short, long)]
        workers: Option<usize>,

        /// YAML configuration file (overrides CONFIG_FILE)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Synthesize only the PPI
    Ppi {
        #[arg(short, long, default_value = "data")]
        input: PathBuf,

        /// Output PNG (default: output/ppi_<method>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        method: Option<MethodName>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the normalized guide image
    Guide {
        #[arg(short, long, default_value = "data")]
        input: PathBuf,

        #[arg(short, long, default_value = "output/guide.png")]
        output: PathBuf,
    },
    /// Upscale a single greyscale PNG
    Upscale {
        /// Input PNG
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long)]
        upscale: Option<f64>,

        #[arg(long)]
        upscale_method: Option<UpscaleMethod>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ppi_upscale=info,ppi_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Run {
            input,
            output,
            method,
            upscale,
            upscale_method,
            workers,
            config,
        }) => {
            let overrides = ConfigOverrides {
                method,
                upscale_factor: upscale,
                upscale_method,
                workers,
            };
            let pipeline = build_pipeline(config.as_deref(), &overrides)?;
            let report = pipeline
                .run(&input, &output)
                .with_context(|| format!("pipeline failed for {}", input.display()))?;

            println!("PPI ({}):", report.ppi.method);
            println!("  shape: {:?}", report.ppi.shape);
            println!("  mean:  {:.2}", report.ppi.mean);
            println!("  std:   {:.2}", report.ppi.std);
            if let Some(up) = &report.upscaled_ppi {
                println!("Upscaled ({} x{}):", up.method, up.factor);
                println!("  shape: {:?}", up.shape);
                println!("  mean:  {:.2}", up.stats.mean);
                println!("  std:   {:.2}", up.stats.std);
            }
            println!(
                "Channels: {} loaded, {} reconstructed",
                report.num_channels, report.upscaled_channels
            );
            println!("Wrote {} files to {}", report.files.len() + 1, output.display());
            Ok(())
        }
        Some(Commands::Ppi {
            input,
            output,
            method,
            json,
        }) => {
            let overrides = ConfigOverrides {
                method,
                ..Default::default()
            };
            let pipeline = build_pipeline(None, &overrides)?;
            let output = output.unwrap_or_else(|| {
                default_ppi_path(Path::new("output"), pipeline.config().ppi_method().name())
            });
            let stats = pipeline
                .write_ppi(&input, &output)
                .with_context(|| format!("failed to synthesize PPI from {}", input.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "{}: shape {:?}, mean {:.2}, std {:.2} -> {}",
                    stats.method,
                    stats.shape,
                    stats.mean,
                    stats.std,
                    output.display()
                );
            }
            Ok(())
        }
        Some(Commands::Guide { input, output }) => {
            let pipeline = build_pipeline(None, &ConfigOverrides::default())?;
            let shape = pipeline
                .write_guide(&input, &output)
                .with_context(|| format!("failed to build guide from {}", input.display()))?;
            println!("guide {shape:?} -> {}", output.display());
            Ok(())
        }
        Some(Commands::Upscale {
            input,
            output,
            upscale,
            upscale_method,
        }) => {
            let overrides = ConfigOverrides {
                upscale_factor: upscale,
                upscale_method,
                ..Default::default()
            };
            let pipeline = build_pipeline(None, &overrides)?;
            let shape = pipeline
                .upscale_file(&input, &output)
                .with_context(|| format!("failed to upscale {}", input.display()))?;
            println!("{} -> {} {shape:?}", input.display(), output.display());
            Ok(())
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Defaults, then the YAML file (`--config` or `CONFIG_FILE`), then flags.
fn build_pipeline(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<Pipeline> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::from_env(),
    };
    config.apply(overrides);
    Pipeline::new(config).context("invalid configuration")
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let rust_log = std::env::var("RUST_LOG").ok();

    println!("ppi-upscale v{VERSION}");
    println!("Pseudo-panchromatic image synthesis and guided upscaling\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG    = {}",
        rust_log.as_deref().unwrap_or("ppi_upscale=info,ppi_core=info (default)")
    );

    let config_source = match config_file {
        Some(path) if Path::new(&path).exists() => path,
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    let config = PipelineConfig::from_env();
    println!("\nConfiguration:");
    println!("  Source:  {config_source}");
    println!("  Method:  {}", config.ppi_method());
    println!(
        "  Upscale: {} x{}",
        config.upscale.method, config.upscale.factor
    );
    println!("  Workers: {}", config.workers);

    fn plural(n: usize) -> &'static str {
        if n == 1 {
            "band"
        } else {
            "bands"
        }
    }

    println!("\nInput:");
    match list_channel_files(Path::new("data")) {
        Ok(files) => println!("  data/    {} {}", files.len(), plural(files.len())),
        Err(_) => println!("  data/    (not found)"),
    }

    println!("\nCommands:");
    println!("  run      Full pipeline: PPI, guide, upscaled PPI and 2x channels");
    println!("  ppi      Synthesize only the PPI");
    println!("  guide    Write the normalized guide image");
    println!("  upscale  Upscale a single greyscale PNG");
    println!("\nRun 'ppi-upscale <command> --help' for options.");
}
