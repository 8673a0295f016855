//! pixelize CLI - Convert images to 8-bit style pixel art

use clap::Parser;
use pixelize::{Converter, Palette, PixelizeError, Settings};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pixelize", about = "Convert images to 8-bit style pixel art")]
struct Args {
    /// Input image file
    input: PathBuf,
    /// Output image file (defaults to <input>.pixel.png)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Block size in source pixels (overrides settings file)
    #[arg(short, long)]
    block_size: Option<u32>,
    /// Dither threshold, usually 0.0-1.0 (overrides settings file)
    #[arg(short, long, allow_hyphen_values = true)]
    dither: Option<f64>,
    /// JSON settings file with block_size and dither_threshold
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// JSON palette file: {"colors": ["#RRGGBB", ...]}
    #[arg(short, long)]
    palette: Option<PathBuf>,
    /// Seed for reproducible dithering
    #[arg(long)]
    seed: Option<u64>,
    /// Process block rows in parallel
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<(), PixelizeError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelize=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };
    if let Some(block_size) = args.block_size {
        settings.block_size = block_size;
    }
    if let Some(dither) = args.dither {
        settings.dither_threshold = dither;
    }

    let palette = match &args.palette {
        Some(path) => Palette::from_json_file(path)?,
        None => Palette::eight_bit(),
    };

    let mut converter = Converter::new(palette)
        .with_settings(settings)
        .with_parallel(args.parallel);
    if let Some(seed) = args.seed {
        converter = converter.with_seed(seed);
    }

    let image = image::open(&args.input)?;
    let (output, stats) = converter.convert(&image)?;

    let output_path = args
        .output
        .unwrap_or_else(|| args.input.with_extension("pixel.png"));
    output.save(&output_path)?;

    tracing::info!(
        input = %args.input.display(),
        output = %output_path.display(),
        columns = stats.columns,
        rows = stats.rows,
        dithered = stats.dithered,
        "Saved pixel art"
    );
    Ok(())
}
