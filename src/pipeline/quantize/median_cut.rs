use palette::{IntoColor, Srgb};

use super::{Quantizer, WeightedColor};
use crate::color::Color;

pub const MAX_DEPTH: u32 = 16;

/// A box of pixels for median cut subdivision.
#[derive(Debug)]
struct ColorBox {
    pixels: Vec<Color>,
}

fn channel(c: &Color, dim: usize) -> u8 {
    match dim {
        0 => c.r,
        1 => c.g,
        _ => c.b,
    }
}

impl ColorBox {
    /// Channel with the widest value range. Ties go to R, then G.
    fn longest_dimension(&self) -> usize {
        let mut lo = [u8::MAX; 3];
        let mut hi = [u8::MIN; 3];
        for c in &self.pixels {
            for dim in 0..3 {
                lo[dim] = lo[dim].min(channel(c, dim));
                hi[dim] = hi[dim].max(channel(c, dim));
            }
        }
        let range = |dim: usize| hi[dim].saturating_sub(lo[dim]);

        if range(0) >= range(1) && range(0) >= range(2) {
            0
        } else if range(1) >= range(2) {
            1
        } else {
            2
        }
    }

    /// Arithmetic mean of the members; the weight is the box population.
    fn average(&self) -> WeightedColor {
        let mut sum = [0u64; 3];
        for c in &self.pixels {
            sum[0] += c.r as u64;
            sum[1] += c.g as u64;
            sum[2] += c.b as u64;
        }
        let n = self.pixels.len() as f32 * 255.0;
        let srgb = Srgb::new(sum[0] as f32 / n, sum[1] as f32 / n, sum[2] as f32 / n);
        WeightedColor {
            color: srgb.into_color(),
            weight: self.pixels.len() as u32,
        }
    }

    /// Sort along the longest dimension and split at the median index.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let dim = self.longest_dimension();
        self.pixels.sort_by_key(|c| channel(c, dim));
        let upper = self.pixels.split_off(self.pixels.len() / 2);
        (ColorBox { pixels: self.pixels }, ColorBox { pixels: upper })
    }
}

/// Recursive median cut in device RGB, producing up to `2^depth` colors.
#[derive(Debug, Clone)]
pub struct MedianCutQuantizer {
    pub depth: u32,
}

impl Default for MedianCutQuantizer {
    fn default() -> Self {
        Self { depth: 6 }
    }
}

impl MedianCutQuantizer {
    fn cut(&self, bx: ColorBox, depth: u32, palette: &mut Vec<WeightedColor>) {
        if bx.pixels.is_empty() {
            return;
        }
        if depth >= self.depth.min(MAX_DEPTH) {
            palette.push(bx.average());
            return;
        }
        let (lower, upper) = bx.split();
        self.cut(lower, depth + 1, palette);
        self.cut(upper, depth + 1, palette);
    }
}

impl Quantizer for MedianCutQuantizer {
    fn name(&self) -> &str {
        "median-cut"
    }

    /// Output follows box-splitting order, not dominance.
    fn quantize(&self, pixels: &[Color]) -> Vec<WeightedColor> {
        let mut palette = Vec::new();
        self.cut(
            ColorBox {
                pixels: pixels.to_vec(),
            },
            0,
            &mut palette,
        );
        palette
    }
}
