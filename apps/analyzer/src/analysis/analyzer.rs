//! Copy Analysis — orchestrates one analysis run.
//!
//! Flow: validate_url → fetch page → extract copy → build rubric prompt →
//!       single LLM call → split reply into report sections.
//!
//! Nothing is stored: the caller gets the full report back and keeps it.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::parser::{parse_response, ParsedReport, ScoreRow};
use crate::analysis::prompts::{build_prompt, SYSTEM_PROMPT};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::scrape::{domain_label, prepare_content, validate_url, PageScraper};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for an analysis run.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

/// Result of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// The normalised URL that was fetched.
    pub url: String,
    /// Short site name used in the report title and PDF file name.
    pub domain: String,
    #[serde(flatten)]
    pub sections: ParsedReport,
    /// Breakdown rows with the score cell parsed as a number.
    pub scores: Vec<ScoreRow>,
    /// False when the reply did not follow the requested layout; clients should show `raw`.
    pub structured: bool,
    /// The model's reply, unmodified.
    pub raw: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full analysis pipeline for one URL.
pub async fn analyze_url(
    raw_url: &str,
    scraper: &PageScraper,
    llm: &LlmClient,
) -> Result<AnalysisReport, AppError> {
    let url = validate_url(raw_url)?;
    let domain = domain_label(&url);

    let text = scraper.fetch_text(&url).await?;
    let content = prepare_content(&text).ok_or_else(|| {
        AppError::UnprocessableEntity("No visible marketing copy was found on that page.".to_string())
    })?;

    info!(
        url = %url,
        domain = %domain,
        chars = content.chars().count(),
        "Analyzing copy using Ogilvy principles"
    );

    let prompt = build_prompt(url.as_str(), &content);
    let raw = llm
        .call_text(&prompt, SYSTEM_PROMPT)
        .await
        .map_err(|e| AppError::Llm(format!("Copy analysis failed: {e}")))?;

    let sections = parse_response(&raw);
    let structured = sections.is_structured();
    let scores = sections.score_rows();
    if !structured {
        warn!(%domain, "LLM reply did not follow the report layout; returning raw output");
    }

    info!(
        %domain,
        overall_score = ?sections.overall_score,
        rows = sections.breakdown.len(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        url: url.to_string(),
        domain,
        sections,
        scores,
        structured,
        raw,
    })
}
