//! Pixel art conversion: block averaging, palette snapping and black dithering.

pub mod chunk;
pub mod color;
pub mod dither;
pub mod palette;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use chunk::{average_rgba, BlockGrid, BlockOrigin, BlockSink, BlockSource};
pub use color::RgbColor;
pub use palette::Palette;

use std::path::Path;

use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixelizeError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Palette error: {0}")]
    Palette(String),
    #[error("Settings error: {0}")]
    Settings(String),
    #[error("Block size must be at least 1, got {0}")]
    BlockSize(u32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PixelizeError>;

/// Conversion knobs, passed explicitly to every run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Side length of one output block in source pixels.
    pub block_size: u32,
    /// Brightness threshold below which blocks may be forced to black.
    /// Not clamped or checked; values >= 1 blacken everything, values <= -0.5
    /// and NaN nothing.
    pub dither_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            block_size: 5,
            dither_threshold: 0.0,
        }
    }
}

impl Settings {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Settings = serde_json::from_str(&std::fs::read_to_string(path)?)
            .map_err(|e| PixelizeError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(PixelizeError::BlockSize(self.block_size));
        }
        Ok(())
    }
}

/// Summary of one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionStats {
    pub columns: u32,
    pub rows: u32,
    /// Blocks forced to black by dithering.
    pub dithered: usize,
}

/// Paint color for one block of RGBA samples and whether dithering forced it
/// to black, or `None` for an empty block.
pub fn block_color<R: Rng + ?Sized>(
    samples: &[u8],
    palette: &Palette,
    dither_threshold: f64,
    rng: &mut R,
) -> Option<(RgbColor, bool)> {
    let average = average_rgba(samples)?;
    let matched = palette.nearest(&average);
    let color = dither::decide(&average, matched, dither_threshold, rng);
    // A black palette match is not counted as dithered.
    Some((color, color != matched))
}

/// Convert every whole block of `source` and paint it into `sink`.
///
/// The grid is fixed from `settings.block_size` when the run starts;
/// `sink` is expected to cover `BlockGrid::output_dimensions`.
pub fn pixelize<S, K, R>(
    source: &S,
    sink: &mut K,
    palette: &Palette,
    settings: &Settings,
    rng: &mut R,
) -> Result<ConversionStats>
where
    S: BlockSource + ?Sized,
    K: BlockSink + ?Sized,
    R: Rng + ?Sized,
{
    settings.validate()?;
    let (width, height) = source.dimensions();
    let grid = BlockGrid::new(width, height, settings.block_size);
    let size = grid.block_size;

    let mut stats = ConversionStats {
        columns: grid.columns,
        rows: grid.rows,
        dithered: 0,
    };
    for origin in grid.blocks() {
        let samples = source.read_block(origin.x, origin.y, size);
        let Some((color, dithered)) =
            block_color(&samples, palette, settings.dither_threshold, rng)
        else {
            continue;
        };
        if dithered {
            stats.dithered += 1;
            tracing::trace!(x = origin.x, y = origin.y, "Block dithered to black");
        }
        sink.fill_block(origin.x, origin.y, size, color.to_rgba8());
    }

    tracing::debug!(
        columns = stats.columns,
        rows = stats.rows,
        block_size = size,
        dithered = stats.dithered,
        "Pixelized image"
    );
    Ok(stats)
}

/// Main converter: palette plus settings, with optional seeding.
pub struct Converter {
    palette: Palette,
    settings: Settings,
    seed: Option<u64>,
    #[cfg(not(target_arch = "wasm32"))]
    parallel: bool,
}

impl Converter {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            settings: Settings::default(),
            seed: None,
            #[cfg(not(target_arch = "wasm32"))]
            parallel: false,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.settings.block_size = block_size;
        self
    }

    pub fn with_dither(mut self, threshold: f64) -> Self {
        self.settings.dither_threshold = threshold;
        self
    }

    /// Make dithering reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Process rows on the rayon thread pool.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn convert(&self, image: &image::DynamicImage) -> Result<(RgbaImage, ConversionStats)> {
        self.convert_rgba(&image.to_rgba8())
    }

    pub fn convert_rgba(&self, source: &RgbaImage) -> Result<(RgbaImage, ConversionStats)> {
        self.settings.validate()?;
        let grid = BlockGrid::new(source.width(), source.height(), self.settings.block_size);
        let (out_w, out_h) = grid.output_dimensions();
        let mut output = RgbaImage::new(out_w, out_h);

        #[cfg(not(target_arch = "wasm32"))]
        let parallel_stats = self
            .parallel
            .then(|| self.convert_parallel(source, &mut output, grid));
        #[cfg(target_arch = "wasm32")]
        let parallel_stats: Option<ConversionStats> = None;
        if let Some(stats) = parallel_stats {
            return Ok((output, stats));
        }

        let stats = match self.seed {
            Some(seed) => pixelize(
                source,
                &mut output,
                &self.palette,
                &self.settings,
                &mut StdRng::seed_from_u64(seed),
            )?,
            None => pixelize(
                source,
                &mut output,
                &self.palette,
                &self.settings,
                &mut rand::thread_rng(),
            )?,
        };
        Ok((output, stats))
    }

    /// Rows are decided in parallel, each with its own RNG, then painted in order.
    #[cfg(not(target_arch = "wasm32"))]
    fn convert_parallel(
        &self,
        source: &RgbaImage,
        output: &mut RgbaImage,
        grid: BlockGrid,
    ) -> ConversionStats {
        use rayon::prelude::*;

        let size = grid.block_size;
        let threshold = self.settings.dither_threshold;
        let decide_row = |row: u32, rng: &mut dyn rand::RngCore| -> Vec<(BlockOrigin, RgbColor, bool)> {
            grid.row(row)
                .filter_map(|origin| {
                    let samples = source.read_block(origin.x, origin.y, size);
                    block_color(&samples, &self.palette, threshold, rng)
                        .map(|(color, dithered)| (origin, color, dithered))
                })
                .collect()
        };

        let rows: Vec<_> = (0..grid.rows)
            .into_par_iter()
            .map(|row| match self.seed {
                Some(seed) => decide_row(row, &mut StdRng::seed_from_u64(seed.wrapping_add(row as u64))),
                None => decide_row(row, &mut rand::thread_rng()),
            })
            .collect();

        let mut stats = ConversionStats {
            columns: grid.columns,
            rows: grid.rows,
            dithered: 0,
        };
        for (origin, color, dithered) in rows.into_iter().flatten() {
            if dithered {
                stats.dithered += 1;
            }
            output.fill_block(origin.x, origin.y, size, color.to_rgba8());
        }

        tracing::debug!(
            columns = stats.columns,
            rows = stats.rows,
            block_size = size,
            dithered = stats.dithered,
            "Pixelized image in parallel"
        );
        stats
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Palette::eight_bit())
    }
}
