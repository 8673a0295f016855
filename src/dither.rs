//! Brightness-threshold dithering toward black.

use rand::Rng;

use crate::color::RgbColor;

/// Upper bound (exclusive) of the per-block random offset.
const MAX_OFFSET: f64 = 0.5;

/// Draws `r` uniformly from `[0, 0.5)`; true when `brightness(average) - r < threshold`.
fn should_blacken<R: Rng + ?Sized>(average: &RgbColor, threshold: f64, rng: &mut R) -> bool {
    let offset = rng.gen_range(0.0..MAX_OFFSET);
    average.brightness() - offset < threshold
}

/// Decide the paint color of one block: black when [`should_blacken`] fires,
/// otherwise `matched` unchanged.
///
/// Dithering only ever darkens: a block is never moved to a lighter color.
pub fn decide<R: Rng + ?Sized>(
    average: &RgbColor,
    matched: RgbColor,
    threshold: f64,
    rng: &mut R,
) -> RgbColor {
    if should_blacken(average, threshold, rng) {
        RgbColor::BLACK
    } else {
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const NEAR_WHITE: RgbColor = RgbColor::new(250.0, 250.0, 250.0);

    fn zero_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    fn max_rng() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn threshold_one_always_black() {
        let matched = RgbColor::from_u8(0xFF, 0xF1, 0xE8);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(decide(&NEAR_WHITE, matched, 1.0, &mut rng), RgbColor::BLACK);
        }
        assert_eq!(decide(&NEAR_WHITE, matched, 1.0, &mut zero_rng()), RgbColor::BLACK);
    }

    #[test]
    fn pure_white_with_zero_offset_escapes_threshold_one() {
        // 1 - 0 < 1 is false: the only input that survives threshold 1
        let white = RgbColor::new(255.0, 255.0, 255.0);
        assert_eq!(decide(&white, white, 1.0, &mut zero_rng()), white);
    }

    #[test]
    fn negative_threshold_never_black() {
        let matched = RgbColor::from_u8(0x1D, 0x2B, 0x53);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            assert_eq!(decide(&RgbColor::BLACK, matched, -1.0, &mut rng), matched);
        }
        assert_eq!(decide(&RgbColor::BLACK, matched, -1.0, &mut max_rng()), matched);
    }

    #[test]
    fn zero_threshold_zero_offset_keeps_mid_gray() {
        let gray = RgbColor::from_u8(128, 128, 128);
        let matched = RgbColor::from_u8(0x83, 0x76, 0x9C);
        assert_eq!(decide(&gray, matched, 0.0, &mut zero_rng()), matched);
        // brightness ~0.502 minus an offset just under 0.5 stays >= 0
        assert_eq!(decide(&gray, matched, 0.0, &mut max_rng()), matched);
    }

    #[test]
    fn offset_decides_near_threshold() {
        // brightness 0.5, threshold 0.25: black iff offset > 0.25
        let avg = RgbColor::new(127.5, 127.5, 127.5);
        let matched = RgbColor::from_u8(0x5F, 0x57, 0x4F);
        assert_eq!(decide(&avg, matched, 0.25, &mut zero_rng()), matched);
        assert_eq!(decide(&avg, matched, 0.25, &mut max_rng()), RgbColor::BLACK);
    }

    #[test]
    fn black_average_with_zero_threshold() {
        // 0 - r < 0 is false only when r == 0
        let matched = RgbColor::BLACK;
        assert_eq!(decide(&RgbColor::BLACK, matched, 0.0, &mut zero_rng()), matched);
    }
}
