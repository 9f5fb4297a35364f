//! Inline markup handling for report text.
//!
//! The model's reply is markdown; the PDF only honours `**bold**` spans. Everything
//! else is drawn literally after being folded into the WinAnsi repertoire the
//! built-in fonts can show.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::report::font_metrics::FontStyle;

/// Non-greedy and single-line, so an unmatched `**` stays literal.
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

/// A span of text drawn in one font.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: FontStyle,
}

impl Run {
    pub fn regular(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: FontStyle::Regular,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: FontStyle::Bold,
        }
    }
}

/// Splits text into regular and bold runs on `**…**` spans. Empty runs are dropped.
pub fn parse_inline(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut last = 0;

    for caps in BOLD_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            runs.push(Run::regular(&text[last..whole.start()]));
        }
        if !inner.as_str().is_empty() {
            runs.push(Run::bold(inner.as_str()));
        }
        last = whole.end();
    }

    if last < text.len() {
        runs.push(Run::regular(&text[last..]));
    }
    runs
}

/// Folds text into characters the base-14 fonts can render.
///
/// Typographic punctuation becomes its ASCII form, Latin-1 and the bullet glyph are
/// kept, and anything else (emoji, CJK, control characters) is dropped.
pub fn to_pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\t' => out.push(' '),
            '\u{2022}' | '\n' => out.push(c),
            ' '..='~' | '\u{00A1}'..='\u{00FF}' => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline_plain_text() {
        assert_eq!(parse_inline("Just copy"), vec![Run::regular("Just copy")]);
    }

    #[test]
    fn test_parse_inline_bold_spans() {
        assert_eq!(
            parse_inline("1. **Evidence**: add **numbers** now"),
            vec![
                Run::regular("1. "),
                Run::bold("Evidence"),
                Run::regular(": add "),
                Run::bold("numbers"),
                Run::regular(" now"),
            ]
        );
    }

    #[test]
    fn test_parse_inline_unmatched_marker_is_literal() {
        assert_eq!(parse_inline("**oops"), vec![Run::regular("**oops")]);
    }

    #[test]
    fn test_parse_inline_does_not_span_lines() {
        assert_eq!(parse_inline("**a\nb**"), vec![Run::regular("**a\nb**")]);
    }

    #[test]
    fn test_parse_inline_empty_bold_dropped() {
        assert_eq!(parse_inline("a****b"), vec![Run::regular("a"), Run::regular("b")]);
    }

    #[test]
    fn test_to_pdf_safe_folds_typography() {
        assert_eq!(
            to_pdf_safe("Ogilvy\u{2019}s \u{201C}rules\u{201D} \u{2013} 6.7\u{2026}"),
            "Ogilvy's \"rules\" - 6.7..."
        );
    }

    #[test]
    fn test_to_pdf_safe_keeps_latin1_and_bullet() {
        assert_eq!(to_pdf_safe("Caf\u{e9} \u{2022} 50\u{a0}%"), "Caf\u{e9} \u{2022} 50 %");
    }

    #[test]
    fn test_to_pdf_safe_drops_unrenderable() {
        assert_eq!(to_pdf_safe("Great \u{1F680} copy\r\n"), "Great  copy\n");
    }
}
