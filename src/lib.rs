//! # wallhue
//!
//! Extracts a small, visually distinct accent palette from a wallpaper and
//! renders it into theme files.
//!
//! The pipeline runs strictly in order:
//! - [`pipeline::quantize`] reduces the pixels to weighted representative
//!   colors (k-means in CIELAB, or median cut in RGB),
//! - [`pipeline::select`] picks the most distinct vibrant subset,
//! - [`theme::ColorDocument`] formats each entry as hex, rgb, hsl, hsv and lab,
//! - [`template`] substitutes `{colorN.property}` placeholders in `*.tlp` files.
//!
//! ```no_run
//! use std::path::Path;
//! use wallhue::pipeline::{extract_palette, load::load_image, ExtractConfig};
//! use wallhue::theme::ColorDocument;
//!
//! let pixels = load_image(Path::new("wallpaper.png"))?;
//! let palette = extract_palette(&pixels, &ExtractConfig::default())?;
//! print!("{}", ColorDocument::from_palette(&palette).css_block());
//! # Ok::<(), wallhue::Error>(())
//! ```

pub mod cli;
pub mod color;
pub mod error;
pub mod pipeline;
pub mod template;
pub mod theme;

pub use error::{Error, Result};
