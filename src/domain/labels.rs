//! Field-label stripping.
//!
//! Detectors sometimes return a span that starts with the form label in
//! front of the value ("SSN: 123-45-6789"). Only the value is redacted; the
//! label stays visible on the page.

use super::entity::RedactionTarget;
use super::text::CharSpan;

/// Labels recognized in front of a value, tried in this order.
pub const FIELD_LABELS: [&str; 6] = ["Address:", "Email:", "Phone:", "Name:", "SSN:", "MRN:"];

/// A raw candidate split into its label and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSplit<'a> {
    pub label: Option<&'static str>,
    pub value: &'a str,
    /// Byte offset of `value` inside the raw input.
    pub offset: usize,
}

/// Splits a leading field label off a raw candidate.
///
/// The prefix test is case-sensitive against the trimmed input; the first
/// listed label that matches wins. Without a label the trimmed input is the
/// value.
pub fn split_label(raw: &str) -> LabelSplit<'_> {
    let leading = raw.len() - raw.trim_start().len();
    let trimmed = raw.trim();

    for label in FIELD_LABELS {
        if let Some(rest) = trimmed.strip_prefix(label) {
            let gap = rest.len() - rest.trim_start().len();
            return LabelSplit {
                label: Some(label),
                value: rest.trim(),
                offset: leading + label.len() + gap,
            };
        }
    }

    LabelSplit {
        label: None,
        value: trimmed,
        offset: leading,
    }
}

/// The value that should be redacted for a raw candidate.
pub fn normalize_value(raw: &str) -> &str {
    split_label(raw).value
}

/// Normalizes a resolved target, dropping it when nothing is left to redact.
///
/// The returned target's span is narrowed to the value.
pub fn normalize_target(target: RedactionTarget) -> Option<RedactionTarget> {
    let split = split_label(&target.text);
    if split.value.is_empty() {
        return None;
    }

    let start = target.span.start + target.text[..split.offset].chars().count();
    let end = start + split.value.chars().count();
    let text = split.value.to_string();

    Some(RedactionTarget {
        text,
        entity_type: target.entity_type,
        span: CharSpan::new(start, end),
    })
}
