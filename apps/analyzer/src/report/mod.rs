// PDF report rendering.
// Layout is CPU-bound; handlers must call `render_report` inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod layout;
pub mod markup;
pub mod pdf;
pub mod wrap;

use serde::Deserialize;

pub use pdf::render_report;

/// The parts of an analysis the PDF shows. Clients send back what `/api/v1/analyze` returned.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSections {
    pub domain: String,
    pub analysis: String,
    pub improvements: String,
    pub rewrite: String,
}

/// Download file name for a report, e.g. `Acme_Ogilvy_Marketing_Analyzer.pdf`.
///
/// Anything outside `[A-Za-z0-9_-]` is dropped from the domain so the name is
/// safe inside a `Content-Disposition` header.
pub fn report_filename(domain: &str) -> String {
    let safe: String = domain
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    let safe = if safe.is_empty() { "Website".to_string() } else { safe };
    format!("{safe}_Ogilvy_Marketing_Analyzer.pdf")
}
