//! Reference palettes and nearest-color matching.

use std::path::Path;

use serde::Deserialize;

use crate::color::RgbColor;
use crate::{PixelizeError, Result};

/// Built-in 16 color palette (PICO-8).
const EIGHT_BIT: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00],
    [0x1D, 0x2B, 0x53],
    [0x7E, 0x25, 0x53],
    [0x00, 0x87, 0x51],
    [0xAB, 0x52, 0x36],
    [0x5F, 0x57, 0x4F],
    [0xC2, 0xC3, 0xC7],
    [0xFF, 0xF1, 0xE8],
    [0xFF, 0x00, 0x4D],
    [0xFF, 0xA3, 0x00],
    [0xFF, 0xEC, 0x27],
    [0x00, 0xE4, 0x36],
    [0x29, 0xAD, 0xFF],
    [0x83, 0x76, 0x9C],
    [0xFF, 0x77, 0xA8],
    [0xFF, 0xCC, 0xAA],
];

#[derive(Deserialize)]
struct PaletteFile {
    #[serde(default)]
    name: Option<String>,
    colors: Vec<String>,
}

/// An ordered, non-empty set of reference colors.
///
/// Order matters: when two entries are equally close to a query color the
/// earlier one is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<RgbColor>,
}

impl Palette {
    pub fn new(colors: Vec<RgbColor>) -> Result<Self> {
        if colors.is_empty() {
            return Err(PixelizeError::Palette("palette cannot be empty".into()));
        }
        Ok(Self { colors })
    }

    pub fn eight_bit() -> Self {
        Self {
            colors: EIGHT_BIT.iter().map(|&rgb| RgbColor::from(rgb)).collect(),
        }
    }

    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self> {
        let colors = hex
            .iter()
            .enumerate()
            .map(|(i, h)| {
                RgbColor::from_hex(h.as_ref()).ok_or_else(|| {
                    PixelizeError::Palette(format!(
                        "invalid hex color {:?} at index {}",
                        h.as_ref(),
                        i
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(colors)
    }

    /// Load a palette from a JSON file: `{"name": "...", "colors": ["#RRGGBB", ...]}`
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file: PaletteFile = serde_json::from_str(&std::fs::read_to_string(path.as_ref())?)
            .map_err(|e| PixelizeError::Palette(e.to_string()))?;
        let palette = Self::from_hex(file.colors.as_slice())?;
        tracing::debug!(
            path = %path.as_ref().display(),
            name = file.name.as_deref().unwrap_or("unnamed"),
            colors = palette.len(),
            "Loaded palette"
        );
        Ok(palette)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[RgbColor] {
        &self.colors
    }

    /// Index of the closest entry under the redmean distance.
    ///
    /// Single pass seeded with entry 0; a later entry only wins with a strictly
    /// smaller distance, so ties go to the earliest entry.
    pub fn nearest_index(&self, color: &RgbColor) -> usize {
        let mut best = 0;
        let mut best_distance = color.distance(&self.colors[0]);
        for (i, candidate) in self.colors.iter().enumerate().skip(1) {
            let distance = color.distance(candidate);
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }

    pub fn nearest(&self, color: &RgbColor) -> RgbColor {
        self.colors[self.nearest_index(color)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::eight_bit()
    }
}
