//! Block grid - splits a surface into square blocks that each become one color.

use image::{Rgba, RgbaImage};

use crate::color::RgbColor;

/// Read access to square RGBA blocks of a source surface.
pub trait BlockSource {
    fn dimensions(&self) -> (u32, u32);

    /// RGBA samples of the `size × size` block at `(x, y)`, row-major.
    /// Blocks reaching past the surface edge are truncated.
    fn read_block(&self, x: u32, y: u32, size: u32) -> Vec<u8>;
}

/// Write access to square blocks of a destination surface.
pub trait BlockSink {
    fn fill_block(&mut self, x: u32, y: u32, size: u32, color: [u8; 4]);
}

impl BlockSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn read_block(&self, x: u32, y: u32, size: u32) -> Vec<u8> {
        let (w, h) = RgbaImage::dimensions(self);
        let (x1, y1) = (x.saturating_add(size).min(w), y.saturating_add(size).min(h));
        if x >= x1 || y >= y1 {
            return Vec::new();
        }

        let mut samples = Vec::with_capacity((x1 - x) as usize * (y1 - y) as usize * 4);
        for sy in y..y1 {
            for sx in x..x1 {
                samples.extend_from_slice(&self.get_pixel(sx, sy).0);
            }
        }
        samples
    }
}

impl BlockSink for RgbaImage {
    fn fill_block(&mut self, x: u32, y: u32, size: u32, color: [u8; 4]) {
        let (w, h) = RgbaImage::dimensions(self);
        for sy in y..y.saturating_add(size).min(h) {
            for sx in x..x.saturating_add(size).min(w) {
                self.put_pixel(sx, sy, Rgba(color));
            }
        }
    }
}

/// Origin of one block in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOrigin {
    pub x: u32,
    pub y: u32,
}

/// The whole-block grid covering a surface; partial edge strips are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGrid {
    pub columns: u32,
    pub rows: u32,
    pub block_size: u32,
}

impl BlockGrid {
    /// `block_size` must be at least 1.
    pub fn new(width: u32, height: u32, block_size: u32) -> Self {
        debug_assert!(block_size > 0);
        Self {
            columns: width / block_size,
            rows: height / block_size,
            block_size,
        }
    }

    /// Size of the output surface: exactly the area covered by whole blocks.
    pub fn output_dimensions(&self) -> (u32, u32) {
        (self.columns * self.block_size, self.rows * self.block_size)
    }

    pub fn len(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block origins in one row of the grid, left to right.
    pub fn row(&self, row: u32) -> impl Iterator<Item = BlockOrigin> {
        let size = self.block_size;
        (0..self.columns).map(move |col| BlockOrigin {
            x: col * size,
            y: row * size,
        })
    }

    /// Every block origin exactly once, rows then columns.
    pub fn blocks(&self) -> impl Iterator<Item = BlockOrigin> {
        let grid = *self;
        (0..self.rows).flat_map(move |row| grid.row(row))
    }
}

/// Mean RGB of a flat RGBA buffer. Alpha is ignored.
///
/// Returns `None` for a buffer without a single whole pixel.
pub fn average_rgba(samples: &[u8]) -> Option<RgbColor> {
    let mut sums = [0.0f64; 3];
    let mut count = 0usize;
    for px in samples.chunks_exact(4) {
        sums[0] += px[0] as f64;
        sums[1] += px[1] as f64;
        sums[2] += px[2] as f64;
        count += 1;
    }

    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some(RgbColor::new(sums[0] / n, sums[1] / n, sums[2] / n))
}
