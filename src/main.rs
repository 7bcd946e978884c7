use anyhow::Context;
use clap::Parser;
use image::ImageReader;
use log::LevelFilter;
use std::path::PathBuf;

use boardscan::render::{DebugWriter, annotate};
use boardscan::{BoardScanError, ComponentPipeline, DetectionConfig};

#[derive(Parser)]
#[command(name = "boardscan")]
#[command(about = "Detect electronic components on a photographed circuit board")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE", required_unless_present = "print_config")]
    image_path: Option<PathBuf>,

    /// JSON file with detection settings; missing fields keep their defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the annotated image here
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Save board/ROI/candidate masks and verdicts to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            DetectionConfig::from_json(&json)?
        }
        None => DetectionConfig::default(),
    };

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let image_path = args
        .image_path
        .context("An input image is required")?;

    log::info!("Loading image: {:?}", image_path);
    let img = ImageReader::open(&image_path)
        .with_context(|| format!("Failed to open image {}", image_path.display()))?
        .decode()
        .map_err(|source| BoardScanError::ImageLoad {
            path: image_path.display().to_string(),
            source,
        })?;
    log::info!("Image loaded: {}x{}", img.width(), img.height());

    let debug_writer = args.debug_out.map(DebugWriter::new).transpose()?;

    let pipeline = ComponentPipeline::new(config)?;
    let analysis = pipeline.analyze(&img)?;

    println!("\n=== Component Detection Results ===");
    println!("Total components detected: {}", analysis.result.count);
    for (i, component) in analysis.result.components.iter().enumerate() {
        let b = component.bbox;
        println!(
            "  Component {} at ({}, {}) {}x{} - center ({}, {}), mean intensity {:.1}",
            i + 1,
            b.x,
            b.y,
            b.width,
            b.height,
            component.center.0,
            component.center.1,
            component.mean_intensity
        );
    }

    if let Some(writer) = debug_writer {
        writer.write(&analysis)?;
    }

    if let Some(output) = args.output {
        annotate(&img.to_rgb8(), &analysis.result)
            .save(&output)
            .with_context(|| format!("Failed to save annotated image {}", output.display()))?;
        log::info!("Annotated image written to {}", output.display());
    }

    Ok(())
}
