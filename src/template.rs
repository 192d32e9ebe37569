//! `{colorN.property}` placeholder substitution over a directory of templates.
//!
//! Every `*.tlp` file in the template directory is rendered against a
//! [`ColorDocument`] and written, without the extension, into the output
//! directory. Placeholders that do not resolve are left in place and
//! reported; only I/O problems make a run unsuccessful.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::theme::ColorDocument;

/// Extension that marks a file as a template.
pub const TEMPLATE_EXTENSION: &str = "tlp";

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(color\d+)\.([^}]+)\}").expect("valid regex"))
}

/// Output of rendering a single template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Placeholders left untouched because the key or property is unknown.
    pub unresolved: Vec<String>,
}

/// Substitute every resolvable placeholder in `template`.
pub fn render(template: &str, doc: &ColorDocument) -> Rendered {
    let mut replacements: Vec<(usize, usize, &str)> = Vec::new();
    let mut unresolved = Vec::new();

    for caps in placeholder().captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let value = doc
            .get(&caps[1])
            .and_then(|record| record.get(&caps[2]));
        match value {
            Some(value) => replacements.push((whole.start(), whole.len(), value)),
            None => {
                warn!(placeholder = whole.as_str(), "color placeholder not found");
                unresolved.push(whole.as_str().to_string());
            }
        }
    }

    // Rightmost first so pending offsets stay valid.
    replacements.sort_by(|a, b| b.0.cmp(&a.0));
    let mut text = template.to_string();
    for (start, len, value) in replacements {
        text.replace_range(start..start + len, value);
    }

    Rendered { text, unresolved }
}

/// A template that could not be read or whose output could not be written.
#[derive(Debug)]
pub struct TemplateFailure {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// Outcome of a `process_templates` run.
#[derive(Debug, Default)]
pub struct TemplateReport {
    /// Output files written, in processing order.
    pub written: Vec<PathBuf>,
    pub failures: Vec<TemplateFailure>,
    /// Unresolved placeholders across all templates.
    pub unresolved: usize,
}

impl TemplateReport {
    /// True when no template hit an I/O error. Unresolved placeholders do
    /// not count.
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Render every `*.tlp` file in `input_dir` into `output_dir`.
///
/// Creating `output_dir` or listing `input_dir` failing is an error. A
/// single unreadable or unwritable template is logged, recorded in the
/// report and skipped.
pub fn process_templates(
    doc: &ColorDocument,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<TemplateReport> {
    std::fs::create_dir_all(output_dir).map_err(|source| Error::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let read_dir_err = |source| Error::ReadDir {
        path: input_dir.to_path_buf(),
        source,
    };
    let mut templates: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .map_err(read_dir_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()
        .map_err(read_dir_err)?;
    templates.retain(|path| {
        path.is_file() && path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION)
    });
    templates.sort();

    let mut report = TemplateReport::default();
    for template in templates {
        let Some(name) = template.file_stem() else {
            continue;
        };
        let target = output_dir.join(name);

        let content = match std::fs::read_to_string(&template) {
            Ok(content) => content,
            Err(error) => {
                warn!(path = %template.display(), %error, "could not read template");
                report.failures.push(TemplateFailure {
                    path: template,
                    error,
                });
                continue;
            }
        };

        let rendered = render(&content, doc);
        report.unresolved += rendered.unresolved.len();

        if let Err(error) = std::fs::write(&target, rendered.text) {
            warn!(path = %target.display(), %error, "could not write output");
            report.failures.push(TemplateFailure {
                path: target,
                error,
            });
            continue;
        }
        info!(path = %target.display(), "processed template");
        report.written.push(target);
    }

    Ok(report)
}
