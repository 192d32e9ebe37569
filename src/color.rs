use palette::{FromColor, Hsl, Hsv, IntoColor, Lab, Srgb};

use crate::error::{Error, Result};

/// Byte order of the three channels of a raw pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Device RGB color used at the edges of the pipeline.
///
/// Perceptual work happens in CIELAB (`palette::Lab`); HSL and HSV are
/// `palette::Hsl` / `palette::Hsv` with saturation, lightness and value in
/// [0, 1]. Every change of space goes through an explicit method here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from three raw bytes in the given channel order.
    pub fn from_channels(order: ChannelOrder, px: [u8; 3]) -> Self {
        match order {
            ChannelOrder::Rgb => Self::new(px[0], px[1], px[2]),
            ChannelOrder::Bgr => Self::new(px[2], px[1], px[0]),
        }
    }

    /// Parse a hex color string like `#ff8800` or `FF8800`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex {
                input: hex.to_string(),
            });
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| Error::InvalidHex {
                input: hex.to_string(),
            })
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Serialize to uppercase hex `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{}", self.to_hex_stripped())
    }

    /// Uppercase hex without the leading `#`.
    pub fn to_hex_stripped(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    fn to_srgb_f32(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format()
    }

    /// Convert to CIELAB.
    pub fn to_lab(self) -> Lab {
        self.to_srgb_f32().into_color()
    }

    /// Create from CIELAB, clamping out-of-gamut values.
    pub fn from_lab(lab: Lab) -> Self {
        Self::from_srgb_f32_clamped(Srgb::from_color(lab))
    }

    /// Convert to HSL. Hue in [0, 360), saturation and lightness in [0, 1].
    pub fn to_hsl(self) -> Hsl {
        let (r, g, b, max, min) = self.normalized();
        let delta = max - min;
        let lightness = (max + min) / 2.0;
        let saturation = if delta == 0.0 {
            0.0
        } else {
            (delta / (1.0 - (2.0 * lightness - 1.0).abs())).min(1.0)
        };
        Hsl::new(hue(r, g, b, max, delta), saturation, lightness)
    }

    /// Convert to HSV. Hue in [0, 360), saturation and value in [0, 1].
    pub fn to_hsv(self) -> Hsv {
        let (r, g, b, max, min) = self.normalized();
        let delta = max - min;
        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        Hsv::new(hue(r, g, b, max, delta), saturation, max)
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        Self::from_srgb_f32_clamped(Srgb::from_color(hsl))
    }

    pub fn from_hsv(hsv: Hsv) -> Self {
        Self::from_srgb_f32_clamped(Srgb::from_color(hsv))
    }

    fn normalized(self) -> (f32, f32, f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        (r, g, b, r.max(g).max(b), r.min(g).min(b))
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hexagonal hue in degrees. A shared maximum resolves red, then green,
/// then blue. Gray has hue 0.
fn hue(r: f32, g: f32, b: f32, max: f32, delta: f32) -> f32 {
    if delta == 0.0 {
        return 0.0;
    }
    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let degrees = sector * 60.0;
    if degrees >= 360.0 {
        degrees - 360.0
    } else {
        degrees
    }
}

/// Three channels of a single color space.
///
/// `distance` takes both operands as the same type, so comparing colors
/// from different spaces does not compile.
pub trait Tristimulus {
    fn channels(&self) -> [f32; 3];
}

impl Tristimulus for Color {
    fn channels(&self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }
}

impl Tristimulus for Lab {
    fn channels(&self) -> [f32; 3] {
        [self.l, self.a, self.b]
    }
}

/// Euclidean distance. In Lab this approximates perceived difference.
pub fn distance<C: Tristimulus>(a: &C, b: &C) -> f32 {
    let [a0, a1, a2] = a.channels();
    let [b0, b1, b2] = b.channels();
    ((a0 - b0).powi(2) + (a1 - b1).powi(2) + (a2 - b2).powi(2)).sqrt()
}

/// Saturation magnitude: radius in the a/b chroma plane.
pub fn chroma(lab: &Lab) -> f32 {
    lab.a.hypot(lab.b)
}
