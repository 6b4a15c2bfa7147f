//! Entities, redaction targets and page geometry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::text::CharSpan;

fn default_score() -> f32 {
    1.0
}

/// A sensitive span reported by a detector, in flattened-text char offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEntity {
    pub start: usize,
    pub end: usize,
    pub entity_type: String,
    #[serde(default = "default_score")]
    pub score: f32,
}

impl DetectedEntity {
    pub fn new(start: usize, end: usize, entity_type: impl Into<String>, score: f32) -> Self {
        Self {
            start,
            end,
            entity_type: entity_type.into(),
            score,
        }
    }

    pub fn span(&self) -> CharSpan {
        CharSpan::new(self.start, self.end)
    }
}

/// Concrete text to remove, resolved from a detected entity.
///
/// `span` always covers `text` inside the flattened document text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedactionTarget {
    pub text: String,
    pub entity_type: String,
    pub span: CharSpan,
}

/// Axis-aligned rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// One occurrence of a target on one page.
///
/// An occurrence wrapping across lines has one rectangle per line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedactionRegion {
    pub page_index: usize,
    pub rects: Vec<Rect>,
}

/// Human-readable label for an entity type tag.
pub fn friendly_name(entity_type: &str) -> &str {
    match entity_type {
        "US_SSN" => "Social Security Number",
        "MEDICAL_RECORD" => "Medical Record #",
        "DEVICE_ID" => "Device ID",
        "LICENSE_PLATE" => "License Plate",
        "FULL_ADDRESS" => "Address",
        "POSTAL_CODE" => "Postal Code",
        "PHONE_NUMBER" => "Phone Number",
        "EMAIL_ADDRESS" => "Email Address",
        other => other,
    }
}

/// Detected values grouped by friendly category name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntitySummary {
    pub categories: BTreeMap<String, Vec<String>>,
}

impl EntitySummary {
    pub fn from_targets(targets: &[RedactionTarget]) -> Self {
        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for target in targets {
            categories
                .entry(friendly_name(&target.entity_type).to_string())
                .or_default()
                .push(target.text.clone());
        }
        Self { categories }
    }

    pub fn total(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}
