//! Greedy word wrap over styled runs.
//!
//! Words are measured with the static font metrics and packed onto a line until
//! the next one would overflow; each output line carries its runs and its width
//! so it can be drawn as-is. Explicit `\n` forces a break and a blank segment
//! becomes an empty line. A single word wider than the line is split between
//! characters.

use crate::report::font_metrics::{get_metrics, FontStyle};
use crate::report::markup::Run;

/// One output line: runs to draw left to right, and its width in points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub runs: Vec<Run>,
    pub width: f32,
}

type Word = Vec<Run>;

/// Wraps styled runs into lines no wider than `max_width_pt`.
pub fn wrap_runs(runs: &[Run], font_size_pt: f32, max_width_pt: f32) -> Vec<Line> {
    split_hard_breaks(runs)
        .iter()
        .flat_map(|segment| wrap_segment(segment, font_size_pt, max_width_pt))
        .collect()
}

fn split_hard_breaks(runs: &[Run]) -> Vec<Vec<Run>> {
    let mut segments = vec![Vec::new()];
    for run in runs {
        for (i, piece) in run.text.split('\n').enumerate() {
            if i > 0 {
                segments.push(Vec::new());
            }
            if !piece.is_empty() {
                if let Some(current) = segments.last_mut() {
                    current.push(Run {
                        text: piece.to_string(),
                        style: run.style,
                    });
                }
            }
        }
    }
    segments
}

/// Splits a segment into words. A word may change style mid-way (`**Bold**:`).
fn split_words(segment: &[Run]) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Word = Vec::new();

    for run in segment {
        for c in run.text.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            push_char(&mut current, c, run.style);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn push_char(runs: &mut Vec<Run>, c: char, style: FontStyle) {
    match runs.last_mut() {
        Some(last) if last.style == style => last.text.push(c),
        _ => runs.push(Run {
            text: c.to_string(),
            style,
        }),
    }
}

fn word_width(word: &[Run], font_size_pt: f32) -> f32 {
    word.iter()
        .map(|r| get_metrics(r.style).measure_pt(&r.text, font_size_pt))
        .sum()
}

/// Breaks an over-long word into chunks that each fit on a line.
fn split_long_word(word: Word, font_size_pt: f32, max_width_pt: f32) -> Vec<Word> {
    let mut chunks = Vec::new();
    let mut chunk: Word = Vec::new();
    let mut chunk_width = 0.0_f32;

    for run in &word {
        let metrics = get_metrics(run.style);
        for c in run.text.chars() {
            let w = metrics.char_width(c) * font_size_pt;
            if !chunk.is_empty() && chunk_width + w > max_width_pt {
                chunks.push(std::mem::take(&mut chunk));
                chunk_width = 0.0;
            }
            push_char(&mut chunk, c, run.style);
            chunk_width += w;
        }
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}

fn wrap_segment(segment: &[Run], font_size_pt: f32, max_width_pt: f32) -> Vec<Line> {
    let words: Vec<Word> = split_words(segment)
        .into_iter()
        .flat_map(|word| {
            if word_width(&word, font_size_pt) > max_width_pt {
                split_long_word(word, font_size_pt, max_width_pt)
            } else {
                vec![word]
            }
        })
        .collect();

    if words.is_empty() {
        return vec![Line::default()];
    }

    let mut lines = Vec::new();
    let mut current = Line::default();

    for word in words {
        let w = word_width(&word, font_size_pt);
        let space_style = current.runs.last().map(|r| r.style).unwrap_or_default();
        let space_w = get_metrics(space_style).space_width * font_size_pt;

        if !current.runs.is_empty() && current.width + space_w + w > max_width_pt {
            lines.push(std::mem::take(&mut current));
        }

        if !current.runs.is_empty() {
            append_run(&mut current.runs, " ", space_style);
            current.width += space_w;
        }
        for run in word {
            append_run(&mut current.runs, &run.text, run.style);
        }
        current.width += w;
    }
    lines.push(current);
    lines
}

fn append_run(runs: &mut Vec<Run>, text: &str, style: FontStyle) {
    match runs.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => runs.push(Run {
            text: text.to_string(),
            style,
        }),
    }
}
