//! Flattened document text and its character coordinate system.
//!
//! Detectors report spans as character offsets (Unicode scalar values, not
//! bytes) into the concatenation of every page's extracted text. Each page
//! contributes its text followed by a single `'\n'`.

use serde::{Deserialize, Serialize};

/// Half-open character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharSpan {
    pub start: usize,
    pub end: usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Overlap of two spans, if any.
    pub fn intersect(&self, other: &CharSpan) -> Option<CharSpan> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(CharSpan { start, end })
    }
}

/// The chars one page contributed, excluding its trailing newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub page_index: usize,
    pub span: CharSpan,
}

/// Whole-document text with page boundaries and char/byte conversion.
#[derive(Debug, Clone, Default)]
pub struct FlattenedText {
    text: String,
    /// Byte offset of every char, followed by `text.len()`.
    boundaries: Vec<usize>,
    pages: Vec<PageRange>,
}

impl FlattenedText {
    /// Concatenates page texts in order, each followed by `'\n'`.
    pub fn from_pages<'a, I>(pages: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut text = String::new();
        let mut ranges = Vec::new();
        let mut chars = 0;

        for (page_index, page_text) in pages.into_iter().enumerate() {
            let start = chars;
            chars += page_text.chars().count();
            ranges.push(PageRange {
                page_index,
                span: CharSpan::new(start, chars),
            });
            text.push_str(page_text);
            text.push('\n');
            chars += 1;
        }

        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());

        Self {
            text,
            boundaries,
            pages: ranges,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    /// True when no page contributed anything but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn pages(&self) -> &[PageRange] {
        &self.pages
    }

    /// Text covered by a char span, or `None` if the span is out of range.
    pub fn slice(&self, span: CharSpan) -> Option<&str> {
        if span.start > span.end || span.end > self.char_len() {
            return None;
        }
        Some(&self.text[self.boundaries[span.start]..self.boundaries[span.end]])
    }

    /// Converts a byte offset on a char boundary to a char offset.
    pub fn char_offset(&self, byte: usize) -> Option<usize> {
        self.boundaries.binary_search(&byte).ok()
    }
}
