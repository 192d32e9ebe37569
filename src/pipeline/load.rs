use std::path::Path;

use image::imageops::FilterType;
use image::RgbImage;
use palette::Lab;
use tracing::debug;

use crate::color::{ChannelOrder, Color};
use crate::error::{Error, Result};

const MAX_DIM: u32 = 256;

/// Decoded image pixels, `width * height * 3` bytes in a declared channel order.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw bytes. The length must match the dimensions exactly.
    pub fn new(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(Error::InvalidBuffer {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            order: ChannelOrder::Rgb,
            data: img.into_raw(),
        }
    }

    /// Build an RGB buffer from a list of colors laid out as a single row.
    pub fn from_colors(colors: &[Color]) -> Self {
        let data = colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
        Self {
            width: colors.len() as u32,
            height: if colors.is_empty() { 0 } else { 1 },
            order: ChannelOrder::Rgb,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.data.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixels as device RGB, regardless of the stored channel order.
    pub fn colors(&self) -> Vec<Color> {
        self.data
            .chunks_exact(3)
            .map(|px| Color::from_channels(self.order, [px[0], px[1], px[2]]))
            .collect()
    }

    /// Pixels converted to CIELAB.
    pub fn to_lab(&self) -> Vec<Lab> {
        self.colors().into_iter().map(Color::to_lab).collect()
    }
}

/// Load an image and resize it to fit within 256x256 (preserving aspect ratio).
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path).map_err(|source| {
        if !path.exists() {
            Error::ImageNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::ImageDecode {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let img = if img.width() > MAX_DIM || img.height() > MAX_DIM {
        img.resize(MAX_DIM, MAX_DIM, FilterType::Lanczos3)
    } else {
        img
    };
    debug!(
        width = img.width(),
        height = img.height(),
        path = %path.display(),
        "decoded image"
    );

    Ok(PixelBuffer::from_rgb_image(img.to_rgb8()))
}
