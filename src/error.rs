//! Error types for the wallhue library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for wallhue operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop a run from producing any usable output.
///
/// Degraded results (a short palette, unresolved template placeholders,
/// a single unwritable template) are not errors; they are reported through
/// `tracing` and returned as data.
#[derive(Error, Debug)]
pub enum Error {
    /// Image path does not exist
    #[error("file not found: {}", path.display())]
    ImageNotFound { path: PathBuf },

    /// Image exists but could not be decoded
    #[error(
        "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
        path.display()
    )]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Raw pixel data does not match the declared dimensions
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}x3")]
    InvalidBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Pixel buffer has no pixels
    #[error("image contains no pixels")]
    EmptyImage,

    /// Quantization and selection left nothing to emit
    #[error("no colors could be extracted from the image")]
    EmptyPalette,

    /// Hex string is not of the form `#RRGGBB`
    #[error("invalid hex color: {input:?}")]
    InvalidHex { input: String },

    /// Output directory could not be created
    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template directory could not be listed
    #[error("failed to read template directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Color document could not be written
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Color document could not be serialized
    #[error("failed to serialize color document")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Name of the pipeline stage the error belongs to.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::ImageNotFound { .. }
            | Error::ImageDecode { .. }
            | Error::InvalidBuffer { .. }
            | Error::EmptyImage => "decode",
            Error::EmptyPalette => "extract",
            Error::InvalidHex { .. } => "parse",
            Error::CreateDir { .. } | Error::ReadDir { .. } => "templates",
            Error::Write { .. } | Error::Serialize(_) => "output",
        }
    }
}
