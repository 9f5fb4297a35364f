//! Report layout — turns report sections into per-page draw lists.
//!
//! Layout is a plain top-to-bottom flow: each block measures itself with the static
//! font metrics, breaks to a new page when it does not fit, and appends absolute
//! draw operations. Painting those operations into a PDF is `pdf.rs`'s job, so the
//! whole layout is testable without parsing PDF output.

use crate::analysis::parser::extract_score_table;
use crate::report::font_metrics::{get_metrics, FontStyle};
use crate::report::markup::{parse_inline, to_pdf_safe, Run};
use crate::report::wrap::{wrap_runs, Line};
use crate::report::ReportSections;

// ────────────────────────────────────────────────────────────────────────────
// Page geometry (points; origin bottom-left)
// ────────────────────────────────────────────────────────────────────────────

pub const INCH: f32 = 72.0;
/// US letter.
pub const PAGE_WIDTH: f32 = 8.5 * INCH;
pub const PAGE_HEIGHT: f32 = 11.0 * INCH;
pub const MARGIN_X: f32 = 40.0;
pub const MARGIN_TOP: f32 = 50.0;
pub const MARGIN_BOTTOM: f32 = 50.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;

/// Score table column widths: principle, score, comments.
pub const COLUMN_WIDTHS: [f32; 3] = [1.8 * INCH, 1.2 * INCH, 3.5 * INCH];
const CELL_PAD_X: f32 = 4.0;
const CELL_PAD_Y: f32 = 3.0;
const GRID_THICKNESS: f32 = 0.5;
const GRID_GREY: f32 = 0.5;
const HEADER_GREY: f32 = 0.83;

/// Baseline offset from the top of a line box, as a fraction of font size.
const ASCENT: f32 = 0.8;

pub const NO_TABLE_MESSAGE: &str = "No table data found in analysis.";

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    size: f32,
    leading: f32,
    font: FontStyle,
}

const TITLE: TextStyle = TextStyle {
    size: 18.0,
    leading: 22.0,
    font: FontStyle::Bold,
};
const HEADING: TextStyle = TextStyle {
    size: 14.0,
    leading: 17.0,
    font: FontStyle::Bold,
};
const HEADING_SPACE_AFTER: f32 = 6.0;
const BODY: TextStyle = TextStyle {
    size: 10.0,
    leading: 12.0,
    font: FontStyle::Regular,
};

// ────────────────────────────────────────────────────────────────────────────
// Draw operations
// ────────────────────────────────────────────────────────────────────────────

/// One absolute drawing instruction. Coordinates are points from the bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        baseline: f32,
        size: f32,
        style: FontStyle,
        text: String,
    },
    /// Filled rectangle; `y` is the bottom edge. `grey` is 0.0 (black) to 1.0 (white).
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        grey: f32,
    },
    Stroke {
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        grey: f32,
    },
}

pub type PageOps = Vec<DrawOp>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

// ────────────────────────────────────────────────────────────────────────────
// Flow engine
// ────────────────────────────────────────────────────────────────────────────

struct Flow {
    pages: Vec<PageOps>,
    /// Top of the free area on the current page.
    cursor: f32,
}

impl Flow {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: Self::top(),
        }
    }

    fn top() -> f32 {
        PAGE_HEIGHT - MARGIN_TOP
    }

    fn remaining(&self) -> f32 {
        self.cursor - MARGIN_BOTTOM
    }

    fn at_page_top(&self) -> bool {
        (self.cursor - Self::top()).abs() < f32::EPSILON
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = Self::top();
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }

    /// Vertical gap. Dropped at the top of a page; a gap that overruns the page ends it.
    fn space(&mut self, height: f32) {
        if self.at_page_top() {
            return;
        }
        if height >= self.remaining() {
            self.new_page();
        } else {
            self.cursor -= height;
        }
    }

    /// Starts a new page unless `height` fits in what is left of this one.
    fn ensure(&mut self, height: f32) {
        if height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }
    }

    fn draw_line(&mut self, line: &Line, x: f32, baseline: f32, size: f32) {
        let mut x = x;
        for run in &line.runs {
            let width = get_metrics(run.style).measure_pt(&run.text, size);
            if !run.text.trim().is_empty() {
                self.push(DrawOp::Text {
                    x,
                    baseline,
                    size,
                    style: run.style,
                    text: run.text.clone(),
                });
            }
            x += width;
        }
    }

    fn paragraph(&mut self, runs: &[Run], style: TextStyle, align: Align) {
        for line in wrap_runs(runs, style.size, CONTENT_WIDTH) {
            self.ensure(style.leading);
            let x = match align {
                Align::Left => MARGIN_X,
                Align::Center => MARGIN_X + (CONTENT_WIDTH - line.width).max(0.0) / 2.0,
            };
            let baseline = self.cursor - style.size * ASCENT;
            self.draw_line(&line, x, baseline, style.size);
            self.cursor -= style.leading;
        }
    }

    fn heading(&mut self, text: &str) {
        // Keep a heading together with at least one line of what follows.
        self.ensure(HEADING.leading + HEADING_SPACE_AFTER + BODY.leading);
        self.paragraph(&[styled(text, HEADING)], HEADING, Align::Left);
        self.cursor -= HEADING_SPACE_AFTER;
    }

    fn table(&mut self, rows: &[Vec<String>]) {
        let total_width: f32 = COLUMN_WIDTHS.iter().sum();
        let x0 = MARGIN_X + (CONTENT_WIDTH - total_width) / 2.0;

        let laid_out: Vec<Vec<Vec<Line>>> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| layout_row(row, i == 0))
            .collect();

        for (i, cells) in laid_out.iter().enumerate() {
            let height = row_height(cells);
            if height > self.remaining() && !self.at_page_top() {
                self.new_page();
                if i > 0 {
                    // Repeat the header row on continuation pages.
                    self.draw_row(&laid_out[0], x0, true);
                }
            }
            self.draw_row(cells, x0, i == 0);
        }
    }

    /// Draws one table row at the cursor. Lines that overrun the page bottom are dropped.
    fn draw_row(&mut self, cells: &[Vec<Line>], x0: f32, header: bool) {
        let total_width: f32 = COLUMN_WIDTHS.iter().sum();
        let height = row_height(cells).min(self.remaining());
        let top = self.cursor;
        let bottom = top - height;

        if header {
            self.push(DrawOp::FillRect {
                x: x0,
                y: bottom,
                width: total_width,
                height,
                grey: HEADER_GREY,
            });
        }

        let mut x = x0;
        for (col, lines) in cells.iter().enumerate() {
            let mut line_top = top - CELL_PAD_Y;
            for line in lines {
                if line_top - BODY.leading < bottom - 1e-3 {
                    break;
                }
                let baseline = line_top - BODY.size * ASCENT;
                self.draw_line(line, x + CELL_PAD_X, baseline, BODY.size);
                line_top -= BODY.leading;
            }
            x += COLUMN_WIDTHS[col];
        }

        self.grid(x0, top, bottom);
        self.cursor = bottom;
    }

    fn grid(&mut self, x0: f32, top: f32, bottom: f32) {
        let total_width: f32 = COLUMN_WIDTHS.iter().sum();
        for y in [top, bottom] {
            self.push(DrawOp::Stroke {
                from: (x0, y),
                to: (x0 + total_width, y),
                thickness: GRID_THICKNESS,
                grey: GRID_GREY,
            });
        }
        let mut x = x0;
        for edge in 0..=COLUMN_WIDTHS.len() {
            self.push(DrawOp::Stroke {
                from: (x, top),
                to: (x, bottom),
                thickness: GRID_THICKNESS,
                grey: GRID_GREY,
            });
            if let Some(w) = COLUMN_WIDTHS.get(edge) {
                x += w;
            }
        }
    }
}

fn styled(text: &str, style: TextStyle) -> Run {
    Run {
        text: text.to_string(),
        style: style.font,
    }
}

/// Pads or folds a row to exactly three cells; extra cells are joined into the last.
fn normalize_row(row: &[String]) -> [String; 3] {
    let first = row.first().cloned().unwrap_or_default();
    let second = row.get(1).cloned().unwrap_or_default();
    let rest = row.get(2..).map(|r| r.join(" | ")).unwrap_or_default();
    [first, second, rest]
}

fn layout_row(row: &[String], header: bool) -> Vec<Vec<Line>> {
    normalize_row(row)
        .iter()
        .zip(COLUMN_WIDTHS)
        .map(|(cell, width)| {
            let mut runs = parse_inline(&to_pdf_safe(cell));
            if header {
                for run in &mut runs {
                    run.style = FontStyle::Bold;
                }
            }
            wrap_runs(&runs, BODY.size, width - 2.0 * CELL_PAD_X)
        })
        .collect()
}

fn row_height(cells: &[Vec<Line>]) -> f32 {
    let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    max_lines as f32 * BODY.leading + 2.0 * CELL_PAD_Y
}

// ────────────────────────────────────────────────────────────────────────────
// Report layout
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the full report: title, score table, improvement bullets, rewritten copy.
pub fn layout_report(sections: &ReportSections) -> Vec<PageOps> {
    let mut flow = Flow::new();

    let title = format!("{} - Ogilvy Marketing Analyzer Report", sections.domain.trim());
    flow.paragraph(&[styled(&to_pdf_safe(&title), TITLE)], TITLE, Align::Center);
    flow.space(0.3 * INCH);

    flow.heading("Ogilvy Score Breakdown");
    flow.space(0.2 * INCH);

    let rows = extract_score_table(&sections.analysis);
    if rows.is_empty() {
        flow.paragraph(&[styled(NO_TABLE_MESSAGE, BODY)], BODY, Align::Left);
    } else {
        flow.table(&rows);
    }

    flow.space(0.7 * INCH);
    flow.heading("Top 3 Improvement Areas");
    flow.space(0.15 * INCH);
    for line in sections.improvements.trim().lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let runs = parse_inline(&to_pdf_safe(&format!("\u{2022} {line}")));
        flow.paragraph(&runs, BODY, Align::Left);
        flow.space(0.05 * INCH);
    }

    flow.space(0.7 * INCH);
    flow.heading("Optimized Rewritten Copy");
    flow.space(0.15 * INCH);
    for para in sections.rewrite.trim().split("\n\n") {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }
        flow.paragraph(&parse_inline(&to_pdf_safe(para)), BODY, Align::Left);
        flow.space(0.1 * INCH);
    }

    flow.pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(analysis: &str, improvements: &str, rewrite: &str) -> ReportSections {
        ReportSections {
            domain: "Acme".to_string(),
            analysis: analysis.to_string(),
            improvements: improvements.to_string(),
            rewrite: rewrite.to_string(),
        }
    }

    fn texts(page: &PageOps) -> Vec<&str> {
        page.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    const ANALYSIS: &str = "**Overall Score:** 50/100\n\n| Principle | Score (0–6.7) | Comments |\n|---|---|---|\n| 1. Headline | 3.0 | Weak **hook** |\n\n**Top 3 Areas to Improve:**\n1. Hook";

    #[test]
    fn test_layout_single_page_order() {
        let pages = layout_report(&sections(ANALYSIS, "1. **Hook**: sharpen", "New copy."));
        assert_eq!(pages.len(), 1);
        let t = texts(&pages[0]);
        let pos = |needle: &str| t.iter().position(|s| s.contains(needle)).unwrap();
        assert!(t[0].starts_with("Acme - Ogilvy Marketing Analyzer Report"));
        assert!(pos("Ogilvy Score Breakdown") < pos("Principle"));
        assert!(pos("Principle") < pos("Top 3 Improvement Areas"));
        assert!(pos("Top 3 Improvement Areas") < pos("Hook"));
        assert!(pos("Optimized Rewritten Copy") < pos("New copy."));
    }

    #[test]
    fn test_table_header_is_bold_and_shaded() {
        let pages = layout_report(&sections(ANALYSIS, "", ""));
        let page = &pages[0];
        assert!(page.iter().any(|op| matches!(op, DrawOp::FillRect { grey, .. } if (*grey - HEADER_GREY).abs() < 1e-6)));
        assert!(page.iter().any(|op| matches!(
            op,
            DrawOp::Text { text, style: FontStyle::Bold, .. } if text == "Score (0-6.7)"
        )));
    }

    #[test]
    fn test_table_cell_markup_is_bold() {
        let pages = layout_report(&sections(ANALYSIS, "", ""));
        assert!(pages[0].iter().any(|op| matches!(
            op,
            DrawOp::Text { text, style: FontStyle::Bold, .. } if text == "hook"
        )));
    }

    #[test]
    fn test_missing_table_message() {
        let pages = layout_report(&sections("no table here", "Not found.", "Rewrite not found."));
        assert!(texts(&pages[0]).contains(&NO_TABLE_MESSAGE));
    }

    #[test]
    fn test_improvements_become_bullets() {
        let pages = layout_report(&sections("", "1. First\n\n2. **Second**", ""));
        let t = texts(&pages[0]);
        assert!(t.iter().any(|s| s.starts_with("\u{2022} 1. First")));
        assert!(t.contains(&"Second"));
    }

    #[test]
    fn test_long_rewrite_breaks_pages_within_margins() {
        let para = "Every word earns its place on the page. ".repeat(30);
        let rewrite = vec![para; 12].join("\n\n");
        let pages = layout_report(&sections(ANALYSIS, "1. a", &rewrite));
        assert!(pages.len() > 1, "expected multiple pages, got {}", pages.len());
        for page in &pages {
            for op in page {
                if let DrawOp::Text { baseline, x, .. } = op {
                    assert!(*baseline >= MARGIN_BOTTOM - 1.0 && *baseline <= PAGE_HEIGHT - MARGIN_TOP);
                    assert!(*x >= MARGIN_X - 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_long_table_repeats_header() {
        let mut analysis = String::from("| Principle | Score | Comments |\n");
        for i in 1..=80 {
            analysis.push_str(&format!("| {i}. Principle row | 5.0 | Fine |\n"));
        }
        analysis.push_str("\n**Top 3 Areas to Improve:**\n");
        let pages = layout_report(&sections(&analysis, "", ""));
        assert!(pages.len() > 1);
        assert!(texts(&pages[1]).contains(&"Principle"));
    }

    #[test]
    fn test_normalize_row_folds_extra_cells() {
        let row: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(normalize_row(&row), ["a".to_string(), "b".to_string(), "c | d".to_string()]);
        assert_eq!(normalize_row(&[]), [String::new(), String::new(), String::new()]);
    }

    fn baseline_of(page: &PageOps, needle: &str) -> f32 {
        page.iter()
            .find_map(|op| match op {
                DrawOp::Text { text, baseline, .. } if text == needle => Some(*baseline),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no text {needle:?} on page"))
    }

    #[test]
    fn test_tall_row_is_clipped_and_header_repeats() {
        let tall = "word ".repeat(1000);
        let analysis = format!(
            "| Principle | Score | Comments |\n| A | 1 | short |\n| B | 2 | {tall}|\n| C | 3 | short |\n\n**Top 3 Areas to Improve:**\n"
        );
        let pages = layout_report(&sections(&analysis, "", ""));
        assert_eq!(pages.len(), 3);

        // The tall row starts its own page behind a repeated header and stops at the margin.
        assert_eq!(texts(&pages[1])[0], "Principle");
        assert!(texts(&pages[1]).contains(&"B"));
        for op in &pages[1] {
            match op {
                DrawOp::Text { baseline, .. } => assert!(*baseline >= MARGIN_BOTTOM),
                DrawOp::Stroke { from, to, .. } => {
                    assert!(from.1 >= MARGIN_BOTTOM - 1e-3 && to.1 >= MARGIN_BOTTOM - 1e-3)
                }
                DrawOp::FillRect { y, .. } => assert!(*y >= MARGIN_BOTTOM - 1e-3),
            }
        }

        // The next row moves on again, header first.
        assert_eq!(texts(&pages[2])[0], "Principle");
        assert!(texts(&pages[2]).contains(&"C"));
    }

    #[test]
    fn test_table_grid_column_edges() {
        let pages = layout_report(&sections(ANALYSIS, "", ""));
        let mut xs: Vec<f32> = pages[0]
            .iter()
            .filter_map(|op| match op {
                DrawOp::Stroke { from, to, .. } if (from.0 - to.0).abs() < 1e-6 => Some(from.0),
                _ => None,
            })
            .collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup_by(|a, b| (*a - *b).abs() < 1e-3);

        // 1.8in + 1.2in + 3.5in = 468pt, centred between the 40pt side margins.
        let expected = [72.0, 72.0 + 129.6, 72.0 + 216.0, 72.0 + 468.0];
        assert_eq!(xs.len(), expected.len(), "edges: {xs:?}");
        for (got, want) in xs.iter().zip(expected) {
            assert!((got - want).abs() < 1e-3, "edge {got} != {want}");
        }
        assert!(xs[0] >= MARGIN_X && xs[3] <= PAGE_WIDTH - MARGIN_X);
    }

    #[test]
    fn test_body_text_sits_inside_margins() {
        let pages = layout_report(&sections("", "", "Body copy."));
        let page = &pages[0];
        let top = page
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { baseline, size, .. } => Some(baseline + size * ASCENT),
                _ => None,
            })
            .fold(f32::MIN, f32::max);
        assert!(top <= PAGE_HEIGHT - MARGIN_TOP + 1e-3);
        assert!(page.iter().any(|op| matches!(
            op,
            DrawOp::Text { text, x, .. } if text == "Body copy." && (*x - 40.0).abs() < 1e-3
        )));
    }

    #[test]
    fn test_rewrite_line_and_paragraph_breaks() {
        let pages = layout_report(&sections("", "", "First line\nSecond line\n\nNew paragraph"));
        let page = &pages[0];
        let first = baseline_of(page, "First line");
        let second = baseline_of(page, "Second line");
        let third = baseline_of(page, "New paragraph");

        // A single newline is a line break inside the paragraph.
        assert!((first - second - BODY.leading).abs() < 1e-3);
        // A blank line starts a new paragraph, 0.1in further down.
        assert!((second - third - (BODY.leading + 0.1 * INCH)).abs() < 1e-3);
    }
}
