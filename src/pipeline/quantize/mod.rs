//! Reduce a pixel population to a bounded set of representative colors.

mod kmeans;
mod median_cut;

pub use kmeans::ClusterQuantizer;
pub use median_cut::MedianCutQuantizer;

use palette::Lab;

use crate::color::Color;

/// A representative color and the number of pixels behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedColor {
    pub color: Lab,
    pub weight: u32,
}

/// "Pixel population to representative colors" strategy.
pub trait Quantizer {
    fn name(&self) -> &str;

    /// Quantize device-RGB pixels. An empty input yields an empty output.
    fn quantize(&self, pixels: &[Color]) -> Vec<WeightedColor>;
}

/// Which quantizer a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum QuantizeMethod {
    /// K-means clustering in CIELAB
    #[default]
    Kmeans,
    /// Recursive median-cut box splitting in RGB
    MedianCut,
}
