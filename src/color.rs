//! RGB color values and the redmean perceptual distance.

/// An RGB triple with real-valued channels on the 0-255 scale.
///
/// Palette entries are whole numbers; block averages may be fractional.
/// Channels are only clamped when the color is turned into paint bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64, g as f64, b as f64)
    }

    /// Parse `#RGB`, `#RRGGBB` or the same without the leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::from_u8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc expands to #aabbcc
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Some(Self::from_u8(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }

    /// Mean of the three channels, normalized to [0, 1] for in-range colors.
    pub fn brightness(&self) -> f64 {
        (self.r + self.g + self.b) / 3.0 / 255.0
    }

    /// Redmean-weighted distance between two colors.
    ///
    /// `sqrt(10·ΔR² + 4·ΔG² + 3·ΔB² + R̄·(ΔR² − ΔB²)/256)` where `R̄` is the mean
    /// red of both colors. The radicand stays non-negative for channels in
    /// [0, 255] since `R̄/256 < 3`.
    pub fn distance(&self, other: &RgbColor) -> f64 {
        let red_mean = (self.r + other.r) / 2.0;
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;

        (10.0 * dr * dr + 4.0 * dg * dg + 3.0 * db * db + red_mean * (dr * dr - db * db) / 256.0)
            .sqrt()
    }

    /// Opaque RGBA bytes, each channel rounded and clamped to 0-255.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let byte = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        [byte(self.r), byte(self.g), byte(self.b), 255]
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from(rgb: [u8; 3]) -> Self {
        Self::from_u8(rgb[0], rgb[1], rgb[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let samples = [
            RgbColor::from_u8(0, 0, 0),
            RgbColor::from_u8(255, 255, 255),
            RgbColor::from_u8(200, 13, 77),
            RgbColor::new(127.5, 64.25, 3.0),
            RgbColor::from_u8(18, 240, 160),
        ];
        for a in &samples {
            for b in &samples {
                assert_eq!(a.distance(b), b.distance(a));
            }
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        for c in [
            RgbColor::BLACK,
            RgbColor::from_u8(255, 0, 128),
            RgbColor::new(12.5, 99.0, 250.75),
        ] {
            assert_eq!(c.distance(&c), 0.0);
        }
    }

    #[test]
    fn distance_weights_match_redmean_formula() {
        // Pure green difference: sqrt(4 * 10^2) = 20.
        let a = RgbColor::from_u8(0, 10, 0);
        assert!((a.distance(&RgbColor::BLACK) - 20.0).abs() < 1e-12);

        // Pure red difference with mean red 5: sqrt(10 * 100 + 5 * 100 / 256).
        let b = RgbColor::from_u8(10, 0, 0);
        let expected = (1000.0f64 + 500.0 / 256.0).sqrt();
        assert!((b.distance(&RgbColor::BLACK) - expected).abs() < 1e-12);
    }

    #[test]
    fn distance_is_not_euclidean() {
        let red = RgbColor::from_u8(100, 0, 0);
        let blue = RgbColor::from_u8(0, 0, 100);
        assert!(red.distance(&RgbColor::BLACK) > blue.distance(&RgbColor::BLACK));
    }

    #[test]
    fn brightness_range() {
        assert_eq!(RgbColor::BLACK.brightness(), 0.0);
        assert_eq!(RgbColor::from_u8(255, 255, 255).brightness(), 1.0);
        let mid = RgbColor::from_u8(128, 128, 128).brightness();
        assert!((mid - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(RgbColor::from_hex("#FF004D"), Some(RgbColor::from_u8(255, 0, 77)));
        assert_eq!(RgbColor::from_hex("29adff"), Some(RgbColor::from_u8(41, 173, 255)));
        assert_eq!(RgbColor::from_hex("#fa0"), Some(RgbColor::from_u8(255, 170, 0)));
        assert_eq!(RgbColor::from_hex("#12345"), None);
        assert_eq!(RgbColor::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn rgba_bytes_round_and_clamp() {
        assert_eq!(RgbColor::new(127.5, 0.4, 254.6).to_rgba8(), [128, 0, 255, 255]);
        assert_eq!(RgbColor::new(-20.0, 300.0, 12.0).to_rgba8(), [0, 255, 12, 255]);
    }
}
