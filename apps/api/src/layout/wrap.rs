//! Greedy word wrap over styled runs.
//!
//! Same line-breaking rule everywhere: a word goes on the current line unless the
//! line already holds something and the word (plus its leading space) would push it
//! past `max_width`. A single word wider than the line gets a line of its own.

use crate::document::rich_text::Run;
use crate::layout::font_metrics::{get_metrics, FontFamily};

/// One wrapped line. `width` is in the same unit as the font size.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub runs: Vec<Run>,
    pub width: f32,
}

impl Line {
    fn empty() -> Self {
        Self {
            runs: Vec::new(),
            width: 0.0,
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn push(&mut self, text: &str, bold: bool, italic: bool) {
        match self.runs.last_mut() {
            Some(last) if last.bold == bold && last.italic == italic => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                bold,
                italic,
            }),
        }
    }
}

struct Word<'a> {
    text: &'a str,
    bold: bool,
    italic: bool,
    space_before: bool,
}

fn words(runs: &[Run]) -> Vec<Word<'_>> {
    let mut out = Vec::new();
    let mut pending_space = false;
    for run in runs {
        let mut rest = run.text.as_str();
        loop {
            let trimmed = rest.trim_start();
            if trimmed.len() != rest.len() {
                pending_space = true;
            }
            if trimmed.is_empty() {
                break;
            }
            let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            out.push(Word {
                text: &trimmed[..end],
                bold: run.bold,
                italic: run.italic,
                space_before: pending_space && !out.is_empty(),
            });
            pending_space = false;
            rest = &trimmed[end..];
        }
    }
    out
}

/// Wraps styled runs to `max_width`. Bold runs are measured with the bold face.
pub fn wrap_runs(runs: &[Run], font: FontFamily, size: f32, max_width: f32) -> Vec<Line> {
    let words = words(runs);
    if words.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = Line::empty();

    for word in &words {
        let metrics = get_metrics(font, word.bold);
        let word_w = metrics.measure(word.text, size);
        let space_w = if word.space_before && !current.runs.is_empty() {
            metrics.space_width * size
        } else {
            0.0
        };

        if !current.runs.is_empty() && current.width + space_w + word_w > max_width {
            // Current line is full; the word opens the next one without its space.
            lines.push(std::mem::replace(&mut current, Line::empty()));
            current.push(word.text, word.bold, word.italic);
            current.width = word_w;
        } else {
            if let Some(last) = current.runs.last_mut().filter(|_| space_w > 0.0) {
                last.text.push(' ');
            }
            current.push(word.text, word.bold, word.italic);
            current.width += space_w + word_w;
        }
    }
    lines.push(current);
    lines
}

/// Plain-text convenience over [`wrap_runs`]; returns the line strings.
pub fn wrap_text(text: &str, font: FontFamily, bold: bool, size: f32, max_width: f32) -> Vec<String> {
    let run = Run {
        text: text.to_string(),
        bold,
        italic: false,
    };
    wrap_runs(std::slice::from_ref(&run), font, size, max_width)
        .iter()
        .map(Line::text)
        .collect()
}
