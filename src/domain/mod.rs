//! Domain types and pure business logic.
//!
//! Nothing in here touches a PDF: the flattened-text coordinate system,
//! entity and target types, label stripping and the audit trail.

pub mod audit;
pub mod entity;
pub mod labels;
pub mod text;

pub use audit::{AuditEntry, AuditTrail};
pub use entity::{
    friendly_name, DetectedEntity, EntitySummary, Rect, RedactionRegion, RedactionTarget,
};
pub use labels::{normalize_target, normalize_value, split_label, LabelSplit, FIELD_LABELS};
pub use text::{CharSpan, FlattenedText, PageRange};
