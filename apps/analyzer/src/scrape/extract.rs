//! Visible-copy extraction from raw HTML.
//!
//! Page chrome (`header`, `footer`, `nav`) and non-text elements are dropped entirely;
//! what remains is the text of paragraph, heading and span elements in document order.

use once_cell::sync::Lazy;
use scraper::{node::Node, ElementRef, Html, Selector};

/// Hard cap on scraped text, in characters.
pub const MAX_SCRAPED_CHARS: usize = 8000;
/// Cap on the copy embedded in the prompt, in characters.
pub const MAX_PROMPT_CHARS: usize = 4000;
pub const TRUNCATION_NOTE: &str = "\n\n[Content truncated for analysis...]";

const EXCLUDED_TAGS: [&str; 7] = ["header", "footer", "nav", "script", "style", "noscript", "svg"];

static COPY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p, h1, h2, h3, h4, span").expect("static selector is valid")
});

/// Extracts the visible marketing copy from an HTML document.
///
/// Every matching element contributes its own text, so a `span` nested in a `p`
/// is counted twice. Output is capped at [`MAX_SCRAPED_CHARS`].
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let blocks: Vec<String> = document
        .select(&COPY_SELECTOR)
        .filter(|el| !inside_excluded(el))
        .map(|el| {
            let mut pieces = Vec::new();
            collect_text(el, &mut pieces);
            pieces.join(" ")
        })
        .collect();

    truncate_chars(&blocks.join(" "), MAX_SCRAPED_CHARS).to_string()
}

/// Prepares scraped text for the prompt. Returns `None` when there is no copy at all.
pub fn prepare_content(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    if text.chars().count() > MAX_PROMPT_CHARS {
        let mut content = truncate_chars(text, MAX_PROMPT_CHARS).to_string();
        content.push_str(TRUNCATION_NOTE);
        return Some(content);
    }
    Some(text.to_string())
}

fn is_excluded(name: &str) -> bool {
    EXCLUDED_TAGS.contains(&name)
}

fn inside_excluded(el: &ElementRef) -> bool {
    el.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| is_excluded(e.name()))
    })
}

/// Depth-first text collection that skips excluded subtrees and whitespace-only nodes.
fn collect_text(el: ElementRef, out: &mut Vec<String>) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
            Node::Element(e) if !is_excluded(e.name()) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
