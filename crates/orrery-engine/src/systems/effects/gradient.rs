//! Piecewise-linear color ramps keyed on particle life.
//!
//! A ramp is an ordered table of bands, highest band first. Each band covers
//! `(lower, upper]` where `upper` is the previous band's `lower` (1.0 for the
//! first band), so the bands tile `[0, 1]` without gaps or overlaps.

/// Linear RGB color, components in [0, 1].
pub type Rgb = [f32; 3];

/// Parse `#RRGGBB` into linear [0, 1] components. Returns None on malformed input.
pub fn rgb_from_hex(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([
        channel(0)? as f32 / 255.0,
        channel(2)? as f32 / 255.0,
        channel(4)? as f32 / 255.0,
    ])
}

#[inline]
fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// One band of a ramp: life in `(lower, upper]` blends `start` (at `upper`)
/// toward `end` (at `lower`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeBand {
    pub lower: f32,
    pub start: Rgb,
    pub end: Rgb,
}

/// Ordered band table evaluated by range lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeGradient {
    bands: Vec<LifeBand>,
}

impl LifeGradient {
    /// Build from bands ordered by descending `lower`. The last band should
    /// have `lower == 0.0`; anything at or below it is clamped to its end color.
    pub fn new(bands: Vec<LifeBand>) -> Self {
        debug_assert!(
            bands.windows(2).all(|w| w[0].lower > w[1].lower),
            "bands must be ordered by descending lower bound"
        );
        Self { bands }
    }

    pub fn bands(&self) -> &[LifeBand] {
        &self.bands
    }

    /// Color for a given remaining life.
    pub fn sample(&self, life: f32) -> Rgb {
        let mut upper = 1.0_f32;
        for (i, band) in self.bands.iter().enumerate() {
            let last = i + 1 == self.bands.len();
            if life > band.lower || last {
                let span = upper - band.lower;
                let t = if span > 0.0 {
                    ((upper - life) / span).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                return mix(band.start, band.end, t);
            }
            upper = band.lower;
        }
        [0.0; 3]
    }
}

/// Solar flare colors.
pub mod flare {
    use super::{LifeBand, LifeGradient, Rgb};

    pub const WHITE_HOT: Rgb = [1.0, 1.0, 1.0];
    /// #FF4500
    pub const ORANGE_RED: Rgb = [1.0, 69.0 / 255.0, 0.0];
    /// #550000
    pub const EMBER: Rgb = [85.0 / 255.0, 0.0, 0.0];

    /// White-hot above 0.7, cooling to orange-red by 0.3, then to near-black red.
    pub fn gradient() -> LifeGradient {
        LifeGradient::new(vec![
            LifeBand { lower: 0.7, start: WHITE_HOT, end: WHITE_HOT },
            LifeBand { lower: 0.3, start: WHITE_HOT, end: ORANGE_RED },
            LifeBand { lower: 0.0, start: ORANGE_RED, end: EMBER },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(rgb_from_hex("#FFFFFF"), Some([1.0, 1.0, 1.0]));
        assert_eq!(rgb_from_hex("000000"), Some([0.0, 0.0, 0.0]));
        assert!(rgb_from_hex("#FFF").is_none());
        assert!(rgb_from_hex("#GG0000").is_none());
    }

    #[test]
    fn flare_bands_are_contiguous() {
        let g = flare::gradient();
        for pair in g.bands().windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(g.bands().last().map(|b| b.lower), Some(0.0));
    }

    #[test]
    fn flare_color_continuous_at_boundaries() {
        let g = flare::gradient();
        for boundary in [0.7_f32, 0.3] {
            let above = g.sample(boundary + 1e-5);
            let at = g.sample(boundary);
            let below = g.sample(boundary - 1e-5);
            assert!(close(above, at), "jump above {boundary}: {above:?} vs {at:?}");
            assert!(close(at, below), "jump below {boundary}: {at:?} vs {below:?}");
        }
    }

    #[test]
    fn flare_color_endpoints() {
        let g = flare::gradient();
        assert_eq!(g.sample(1.0), flare::WHITE_HOT);
        assert_eq!(g.sample(0.8), flare::WHITE_HOT);
        assert!(close(g.sample(0.3), flare::ORANGE_RED));
        assert!(close(g.sample(0.0), flare::EMBER));
        assert!(close(g.sample(-0.5), flare::EMBER));
    }

    #[test]
    fn middle_band_is_linear() {
        let g = flare::gradient();
        let mid = g.sample(0.5);
        let expected = mix(flare::WHITE_HOT, flare::ORANGE_RED, 0.5);
        assert!(close(mid, expected));
    }
}
