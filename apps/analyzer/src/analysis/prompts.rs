// All LLM prompt constants for the Analysis module.
// The response format below is what `parser.rs` expects; keep the two in sync.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(criteria|url|content)\}").expect("valid regex"));

/// System prompt for copy analysis.
pub const SYSTEM_PROMPT: &str =
    "You are an advertising strategist trained in David Ogilvy's principles.";

/// The 15 scoring principles, in rubric order. Each is worth ~6.7 points.
pub const PRINCIPLES: [&str; 15] = [
    "Product Positioning",
    "Unique Benefit",
    "Headline",
    "Reader-Focused",
    "Clear Tone",
    "Simple Language",
    "Evidence",
    "Emotion/Story",
    "Structure",
    "Call-to-Action",
    "Visuals/Captions",
    "Testability",
    "Length",
    "Attention-Grabbing",
    "Repetition",
];

/// Rubric prompt template. Replace `{criteria}`, `{url}` and `{content}` before sending.
pub const RUBRIC_PROMPT_TEMPLATE: &str = r#"
You are an advertising strategist trained in David Ogilvy's principles.

Task:
1. Visit the user-provided URL.
2. Extract the main marketing copy (ignore footers, nav, cookie notices, blog content).
3. Score the copy out of 100 using the 15 Ogilvy-inspired principles (each ~6.7 points).
4. Provide a detailed score breakdown.
5. Identify the top 3 improvement areas.
6. Suggest edits to improve the score.
7. Rewrite the copy to achieve 100/100.

### 15 Scoring Criteria:

{criteria}

---

### URL Analyzed: {url}

### Website Content:
"""
{content}
"""

---

Now perform the analysis and return results in this format:

**Overall Score:** X/100

**Score Breakdown:**
| Principle | Score (0–6.7) | Comments |
|-----------|----------------|----------|
| 1. Product Positioning | X.X | ... |
...

**Top 3 Areas to Improve:**
1. ...
2. ...
3. ...

**Rewrite (to score 100/100):**
[Rewritten copy]
"#;

/// Fills the rubric template for one page.
pub fn build_prompt(url: &str, content: &str) -> String {
    let criteria = PRINCIPLES
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {p}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    // Single pass: substituted values are never rescanned for placeholders.
    PLACEHOLDER_RE
        .replace_all(RUBRIC_PROMPT_TEMPLATE, |caps: &Captures| match &caps[1] {
            "criteria" => criteria.clone(),
            "url" => url.to_string(),
            _ => content.to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_fills_placeholders() {
        let prompt = build_prompt("https://example.com", "Buy our widgets");
        assert!(prompt.contains("### URL Analyzed: https://example.com"));
        assert!(prompt.contains("\"\"\"\nBuy our widgets\n\"\"\""));
        assert!(!prompt.contains("{url}"));
        assert!(!prompt.contains("{content}"));
        assert!(!prompt.contains("{criteria}"));
    }

    #[test]
    fn test_build_prompt_lists_all_principles_numbered() {
        let prompt = build_prompt("u", "c");
        assert!(prompt.contains("1. Product Positioning\n2. Unique Benefit"));
        assert!(prompt.contains("15. Repetition"));
    }

    #[test]
    fn test_build_prompt_does_not_expand_placeholders_in_content() {
        let prompt = build_prompt("https://a.io", "literal {url} in copy");
        assert!(prompt.contains("literal {url} in copy"));
    }

    #[test]
    fn test_build_prompt_keeps_placeholder_text_in_url() {
        let url = crate::scrape::validate_url("https://a.io/?q={content}").unwrap();
        let prompt = build_prompt(url.as_str(), "SECRETCOPY");
        assert_eq!(prompt.matches("SECRETCOPY").count(), 1);
        assert!(prompt.contains(&format!("### URL Analyzed: {url}")));
        assert!(url.as_str().contains("{content}"));
    }

    #[test]
    fn test_prompt_requests_markers_the_parser_splits_on() {
        use crate::analysis::parser::{IMPROVEMENTS_MARKER, REWRITE_MARKER};
        assert!(RUBRIC_PROMPT_TEMPLATE.contains(REWRITE_MARKER));
        assert!(RUBRIC_PROMPT_TEMPLATE.contains(IMPROVEMENTS_MARKER));
        assert!(RUBRIC_PROMPT_TEMPLATE.contains("**Overall Score:**"));
    }
}
