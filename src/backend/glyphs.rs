//! Per-page glyph index.
//!
//! Every character of a page's text layer is kept together with its bounding
//! box. The index is both the page's searchable text and the map from text
//! positions back to page geometry.

use std::ops::Range;

use crate::config::MatchPolicy;
use crate::domain::Rect;

/// One character of the text layer. Line breaks carry no box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub bbox: Option<Rect>,
}

/// Glyphs of one page in reading order, lines separated by `'\n'`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageGlyphs {
    glyphs: Vec<Glyph>,
    pending_break: bool,
}

impl PageGlyphs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positioned character to the current line.
    pub fn push(&mut self, ch: char, bbox: Rect) {
        if self.pending_break && !self.glyphs.is_empty() {
            self.glyphs.push(Glyph { ch: '\n', bbox: None });
        }
        self.pending_break = false;
        self.glyphs.push(Glyph {
            ch,
            bbox: Some(bbox),
        });
    }

    /// Ends the current line. Empty lines collapse.
    pub fn end_line(&mut self) {
        self.pending_break = true;
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Number of chars, line breaks included.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// True when the layer holds at least one non-whitespace char.
    pub fn has_text(&self) -> bool {
        self.glyphs.iter().any(|g| !g.ch.is_whitespace())
    }

    /// The text layer as a string, without a trailing newline.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }

    /// Char ranges of every non-overlapping occurrence, left to right.
    pub fn find_all(&self, needle: &str, policy: MatchPolicy) -> Vec<Range<usize>> {
        let needle: Vec<char> = needle.chars().collect();
        if needle.is_empty() || needle.len() > self.glyphs.len() {
            return Vec::new();
        }

        let mut found = Vec::new();
        let mut i = 0;
        while i + needle.len() <= self.glyphs.len() {
            let window = &self.glyphs[i..i + needle.len()];
            let hit = window
                .iter()
                .zip(&needle)
                .all(|(g, &c)| chars_match(g.ch, c, policy));
            if hit {
                found.push(i..i + needle.len());
                i += needle.len();
            } else {
                i += 1;
            }
        }
        found
    }

    /// Bounding boxes for a char range, one per line touched.
    pub fn rects_for(&self, range: Range<usize>) -> Vec<Rect> {
        let end = range.end.min(self.glyphs.len());
        let start = range.start.min(end);

        let mut rects = Vec::new();
        let mut line: Option<Rect> = None;
        for glyph in &self.glyphs[start..end] {
            match glyph.bbox {
                Some(bbox) => {
                    line = Some(line.map_or(bbox, |r| r.union(&bbox)));
                }
                None if glyph.ch == '\n' => rects.extend(line.take()),
                None => {}
            }
        }
        rects.extend(line);
        rects.retain(|r| !r.is_empty());
        rects
    }
}

fn chars_match(page: char, target: char, policy: MatchPolicy) -> bool {
    match policy {
        MatchPolicy::CaseSensitive => page == target,
        MatchPolicy::CaseInsensitive => page == target || page.to_lowercase().eq(target.to_lowercase()),
    }
}
