use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::quantize::{ClusterQuantizer, MedianCutQuantizer, QuantizeMethod};
use crate::pipeline::select::{SelectorConfig, Vibrancy};
use crate::pipeline::ExtractConfig;

/// Extract a distinct accent palette from an image and render theme templates.
#[derive(Parser, Debug)]
#[command(name = "wallhue", version, about)]
pub struct Args {
    /// Path to the input image
    pub image: PathBuf,

    /// Directory for rendered theme files [default: ~/.config/wallhue/themes]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory holding *.tlp templates [default: ~/.config/wallhue/templates]
    #[arg(short, long)]
    pub templates: Option<PathBuf>,

    /// Number of palette colors
    #[arg(short = 'n', long, default_value_t = 16)]
    pub count: usize,

    /// Quantization method
    #[arg(short, long, value_enum, default_value_t = QuantizeMethod::Kmeans)]
    pub method: QuantizeMethod,

    /// Number of K-means clusters (at most 256)
    #[arg(short = 'k', long = "clusters", default_value_t = 32)]
    pub clusters: usize,

    /// Median-cut recursion depth (2^depth boxes)
    #[arg(long, default_value_t = 6)]
    pub depth: u32,

    /// Minimum CIELAB distance between palette colors
    #[arg(long, default_value_t = 30.0)]
    pub min_distance: f32,

    /// Consider every color vibrant
    #[arg(long)]
    pub no_vibrancy_filter: bool,

    /// Do not fill the palette with non-vibrant colors
    #[arg(long)]
    pub no_fallback: bool,

    /// What to print on stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Css)]
    pub format: OutputFormat,

    /// Print a colored terminal preview of the palette to stderr
    #[arg(long)]
    pub preview: bool,

    /// Reload a program once themes are written (repeatable)
    #[arg(long, value_enum)]
    pub reload: Vec<Hook>,

    /// Send a desktop notification when done
    #[arg(long)]
    pub notify: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `* { --colorN: #RRGGBB; }` block
    Css,
    /// Full color document as JSON
    Json,
}

/// Programs that can be told to pick up new theme files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Hook {
    Waybar,
    Hyprland,
}

impl Args {
    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            method: self.method,
            kmeans: ClusterQuantizer {
                k: self.clusters,
                ..Default::default()
            },
            median_cut: MedianCutQuantizer { depth: self.depth },
            selector: SelectorConfig {
                count: self.count,
                vibrancy: (!self.no_vibrancy_filter).then(Vibrancy::default),
                min_distance: self.min_distance,
                fallback: !self.no_fallback,
            },
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| config_home().join("wallhue").join("themes"))
    }

    pub fn template_dir(&self) -> PathBuf {
        self.templates
            .clone()
            .unwrap_or_else(|| config_home().join("wallhue").join("templates"))
    }
}

/// `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
fn config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            PathBuf::from(home).join(".config")
        })
}
