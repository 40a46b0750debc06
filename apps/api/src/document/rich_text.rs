//! Flattens sanitized rich text into paragraphs of styled runs.
//!
//! The preview injects the sanitized HTML as-is; the PDF exporter cannot, so it
//! lays out these paragraphs instead. Input is assumed to be [`SanitizedHtml`],
//! which keeps the tag vocabulary small (see `sanitize::ALLOWED_TAGS`).

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::document::sanitize::SanitizedHtml;

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Bullet,
    Number(u32),
}

impl Marker {
    /// Text drawn in the gutter in front of the first line.
    pub fn label(self) -> Option<String> {
        match self {
            Marker::None => None,
            Marker::Bullet => Some("\u{2022}".to_string()),
            Marker::Number(n) => Some(format!("{n}.")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub marker: Marker,
    /// List nesting depth; 0 outside lists.
    pub depth: u8,
    pub heading: bool,
}

impl Paragraph {
    fn new(marker: Marker, depth: u8) -> Self {
        Self {
            runs: Vec::new(),
            marker,
            depth,
            heading: false,
        }
    }

    fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn push_text(&mut self, text: &str, bold: bool, italic: bool) {
        if self.runs.is_empty() && text.trim().is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.bold == bold && last.italic == italic => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                bold,
                italic,
            }),
        }
    }

    fn trimmed(mut self) -> Self {
        if let Some(first) = self.runs.first_mut() {
            first.text = first.text.trim_start().to_string();
        }
        if let Some(last) = self.runs.last_mut() {
            last.text = last.text.trim_end().to_string();
        }
        self.runs.retain(|r| !r.text.is_empty());
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum ListKind {
    Unordered,
    Ordered(u32),
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)[^>]*>").expect("tag pattern is valid")
    })
}

struct ParseState {
    out: Vec<Paragraph>,
    current: Option<Paragraph>,
    lists: Vec<ListKind>,
    bold: u32,
    italic: u32,
}

impl ParseState {
    fn depth(&self) -> u8 {
        u8::try_from(self.lists.len()).unwrap_or(u8::MAX)
    }

    fn flush(&mut self) {
        if let Some(paragraph) = self.current.take() {
            if !paragraph.is_blank() {
                self.out.push(paragraph.trimmed());
            }
        }
    }

    /// Opens a block unless an empty one (e.g. a fresh list item) is already waiting.
    fn open_block(&mut self, heading: bool) {
        match &mut self.current {
            Some(p) if p.is_blank() => p.heading |= heading,
            _ => {
                self.flush();
                let mut p = Paragraph::new(Marker::None, self.depth());
                p.heading = heading;
                self.current = Some(p);
            }
        }
    }

    fn open_item(&mut self) {
        self.flush();
        let marker = match self.lists.last_mut() {
            Some(ListKind::Ordered(n)) => {
                *n += 1;
                Marker::Number(*n)
            }
            Some(ListKind::Unordered) => Marker::Bullet,
            None => Marker::Bullet,
        };
        self.current = Some(Paragraph::new(marker, self.depth().max(1)));
    }

    fn text(&mut self, raw: &str) {
        let text = collapse_whitespace(&decode_entities(raw));
        if text.is_empty() {
            return;
        }
        let depth = self.depth();
        let (bold, italic) = (self.bold > 0, self.italic > 0);
        self.current
            .get_or_insert_with(|| Paragraph::new(Marker::None, depth))
            .push_text(&text, bold, italic);
    }

    fn tag(&mut self, closing: bool, name: &str) {
        match (closing, name) {
            (false, "p" | "div") => self.open_block(false),
            (false, "h1" | "h2" | "h3") => self.open_block(true),
            (true, "p" | "div" | "h1" | "h2" | "h3" | "li") => self.flush(),
            (_, "br") => {
                let depth = self.depth();
                self.flush();
                self.current = Some(Paragraph::new(Marker::None, depth));
            }
            (false, "ul") => {
                self.flush();
                self.lists.push(ListKind::Unordered);
            }
            (false, "ol") => {
                self.flush();
                self.lists.push(ListKind::Ordered(0));
            }
            (true, "ul" | "ol") => {
                self.flush();
                self.lists.pop();
            }
            (false, "li") => self.open_item(),
            (false, "strong" | "b") => self.bold += 1,
            (true, "strong" | "b") => self.bold = self.bold.saturating_sub(1),
            (false, "em" | "i") => self.italic += 1,
            (true, "em" | "i") => self.italic = self.italic.saturating_sub(1),
            _ => {}
        }
    }
}

/// Splits sanitized HTML into paragraphs. Blank paragraphs are dropped.
pub fn parse(html: &SanitizedHtml) -> Vec<Paragraph> {
    let source = html.as_str();
    let mut state = ParseState {
        out: Vec::new(),
        current: None,
        lists: Vec::new(),
        bold: 0,
        italic: 0,
    };

    let mut cursor = 0;
    for caps in tag_regex().captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        state.text(&source[cursor..whole.start()]);
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        state.tag(closing, &name);
        cursor = whole.end();
    }
    state.text(&source[cursor..]);
    state.flush();
    state.out
}

/// Text content of a markup fragment with tags removed, whitespace collapsed.
pub fn visible_text(html: &str) -> String {
    let stripped = tag_regex().replace_all(html, " ");
    collapse_whitespace(&decode_entities(&stripped))
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() && c != '\u{a0}' {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
