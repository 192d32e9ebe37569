use std::io::Write;

use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor};
use crossterm::QueueableCommand;

use wallhue::color::Color;
use wallhue::theme::ColorDocument;

/// Print one swatch line per palette entry.
pub fn print_swatches(out: &mut impl Write, doc: &ColorDocument) -> std::io::Result<()> {
    for (key, record) in doc.iter() {
        let Ok(c) = Color::from_hex(&record.hex) else {
            continue;
        };
        out.queue(SetBackgroundColor(TermColor::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }))?
        .queue(Print("      "))?
        .queue(ResetColor)?
        .queue(Print(format!(" {key:<8} {} {}\n", record.hex, record.hsl)))?;
    }
    out.flush()
}
