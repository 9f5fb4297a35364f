//! Response Parser — splits the model's markdown reply into report sections.
//!
//! The model is asked for a fixed markdown layout but nothing enforces it, so every
//! extraction here has a fallback and parsing never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const REWRITE_MARKER: &str = "**Rewrite (to score 100/100):**";
pub const IMPROVEMENTS_MARKER: &str = "**Top 3 Areas to Improve:**";
pub const REWRITE_NOT_FOUND: &str = "Rewrite not found.";
pub const IMPROVEMENTS_NOT_FOUND: &str = "Not found.";

static IMPROVEMENTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?s){}(.*?)\*\*Rewrite", regex::escape(IMPROVEMENTS_MARKER)))
        .expect("valid regex")
});

static OVERALL_SCORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Overall Score:\*\*\s*(\d+(?:\.\d+)?)\s*/\s*100").expect("valid regex")
});

/// The table runs from the `| Principle` header to the `**Top 3` heading that follows it.
static TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\| Principle.*?\|\s*\*\*Top 3").expect("valid regex"));

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

/// The model's reply split into the sections the report shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedReport {
    /// Everything before the rewrite marker: score, breakdown table, improvements.
    pub analysis: String,
    pub improvements: String,
    pub rewrite: String,
    pub overall_score: Option<f32>,
    /// Score table cells, header row first. Empty when no table was found.
    pub breakdown: Vec<Vec<String>>,
}

/// One data row of the score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub principle: String,
    pub score: Option<f32>,
    pub comments: String,
}

impl ParsedReport {
    /// True when at least one section of the expected layout was recognised.
    pub fn is_structured(&self) -> bool {
        self.overall_score.is_some() || !self.breakdown.is_empty() || self.rewrite != REWRITE_NOT_FOUND
    }

    /// Breakdown data rows (header skipped) as typed score rows.
    pub fn score_rows(&self) -> Vec<ScoreRow> {
        self.breakdown
            .iter()
            .skip(1)
            .map(|cells| ScoreRow {
                principle: cells.first().cloned().unwrap_or_default(),
                score: cells
                    .get(1)
                    .and_then(|c| NUMBER_RE.find(c))
                    .and_then(|m| m.as_str().parse().ok()),
                comments: cells.get(2..).map(|rest| rest.join(" | ")).unwrap_or_default(),
            })
            .collect()
    }
}

/// Splits the raw model reply into report sections.
pub fn parse_response(raw: &str) -> ParsedReport {
    let (analysis, rewrite) = match raw.split_once(REWRITE_MARKER) {
        Some((before, after)) => (before.trim().to_string(), after.trim().to_string()),
        None => (raw.trim().to_string(), REWRITE_NOT_FOUND.to_string()),
    };

    let improvements = IMPROVEMENTS_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| IMPROVEMENTS_NOT_FOUND.to_string());

    let overall_score = OVERALL_SCORE_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f32>().ok());

    let breakdown = extract_score_table(&analysis);

    ParsedReport {
        analysis,
        improvements,
        rewrite,
        overall_score,
        breakdown,
    }
}

/// Extracts the score table from the analysis section as rows of trimmed cells.
///
/// Markdown alignment rows (`|---|:--:|`) are dropped. Returns an empty vec when the
/// table or the `**Top 3` heading after it is missing.
pub fn extract_score_table(analysis: &str) -> Vec<Vec<String>> {
    let Some(block) = TABLE_RE.find(analysis) else {
        return Vec::new();
    };

    block
        .as_str()
        .trim()
        .lines()
        .filter(|line| line.contains('|'))
        .map(split_row)
        .filter(|cells| !is_separator_row(cells))
        .collect()
}

fn split_row(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

fn is_separator_row(cells: &[String]) -> bool {
    cells.iter().any(|c| c.contains('-'))
        && cells
            .iter()
            .all(|c| c.chars().all(|ch| matches!(ch, '-' | ':' | ' ')))
}
