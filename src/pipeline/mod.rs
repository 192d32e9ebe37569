//! Pixels to palette: quantize, then select.

pub mod load;
pub mod quantize;
pub mod select;

use tracing::info;

use crate::error::{Error, Result};
use load::PixelBuffer;
use quantize::{ClusterQuantizer, MedianCutQuantizer, QuantizeMethod, Quantizer};
use select::{select_palette, Palette, SelectorConfig};

/// Everything `extract_palette` needs besides the pixels.
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    pub method: QuantizeMethod,
    pub kmeans: ClusterQuantizer,
    pub median_cut: MedianCutQuantizer,
    pub selector: SelectorConfig,
}

impl ExtractConfig {
    pub fn quantizer(&self) -> &dyn Quantizer {
        match self.method {
            QuantizeMethod::Kmeans => &self.kmeans,
            QuantizeMethod::MedianCut => &self.median_cut,
        }
    }
}

/// Run quantization and selection over a decoded image.
///
/// Fails on an empty buffer or when no color survives; a palette shorter
/// than requested is returned as is.
pub fn extract_palette(pixels: &PixelBuffer, config: &ExtractConfig) -> Result<Palette> {
    if pixels.is_empty() {
        return Err(Error::EmptyImage);
    }

    let quantizer = config.quantizer();
    let candidates = quantizer.quantize(&pixels.colors());
    info!(
        method = quantizer.name(),
        pixels = pixels.len(),
        candidates = candidates.len(),
        "quantized image"
    );

    let palette = select_palette(&candidates, &config.selector);
    if palette.is_empty() {
        return Err(Error::EmptyPalette);
    }
    info!(colors = palette.len(), "selected palette");
    Ok(palette)
}
