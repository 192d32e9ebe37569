mod hooks;
mod preview;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallhue::cli::{Args, OutputFormat};
use wallhue::pipeline::extract_palette;
use wallhue::pipeline::load::load_image;
use wallhue::template::process_templates;
use wallhue::theme::ColorDocument;

/// Attach the failing pipeline stage to a library error.
fn staged<T>(result: wallhue::Result<T>) -> Result<T> {
    result.map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e).context(format!("{stage} stage failed"))
    })
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "wallhue=debug"
    } else {
        "wallhue=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let output_dir = args.output_dir();
    let template_dir = args.template_dir();
    ensure_dir(&output_dir)?;
    ensure_dir(&template_dir)?;

    let pixels = staged(load_image(&args.image))?;
    let palette = staged(extract_palette(&pixels, &args.extract_config()))?;
    let doc = ColorDocument::from_palette(&palette);

    match args.format {
        OutputFormat::Css => print!("{}", doc.css_block()),
        OutputFormat::Json => println!("{}", staged(doc.to_json())?),
    }
    if args.preview {
        preview::print_swatches(&mut std::io::stderr(), &doc)
            .context("failed to print preview")?;
    }

    staged(doc.write_json(&output_dir.join("colors.json")))?;
    let report = staged(process_templates(&doc, &template_dir, &output_dir))?;
    if report.unresolved > 0 {
        warn!(
            count = report.unresolved,
            "some placeholders were left unresolved"
        );
    }

    for hook in &args.reload {
        hooks::reload(*hook);
    }

    if !report.success() {
        if args.notify {
            hooks::notify("Theme generation finished with errors");
        }
        bail!(
            "template processing failed for {} file(s)",
            report.failures.len()
        );
    }

    info!(
        templates = report.written.len(),
        dir = %output_dir.display(),
        "theme generation complete"
    );
    if args.notify {
        hooks::notify(&format!("Generated {} colors", doc.len()));
    }
    Ok(())
}
