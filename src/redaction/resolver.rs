//! Resolves detector spans into concrete redaction targets.

use tracing::warn;

use crate::domain::{normalize_target, DetectedEntity, FlattenedText, RedactionTarget};

/// Slices the flattened text for every entity, in detector order.
///
/// Overlapping and duplicate spans are all kept. Spans that do not fit the
/// text are skipped.
pub fn resolve_spans(text: &FlattenedText, entities: &[DetectedEntity]) -> Vec<RedactionTarget> {
    entities
        .iter()
        .filter_map(|entity| match text.slice(entity.span()) {
            Some(slice) => Some(RedactionTarget {
                text: slice.to_string(),
                entity_type: entity.entity_type.clone(),
                span: entity.span(),
            }),
            None => {
                warn!(
                    start = entity.start,
                    end = entity.end,
                    text_len = text.char_len(),
                    entity_type = %entity.entity_type,
                    "entity span outside document text, skipped"
                );
                None
            }
        })
        .collect()
}

/// Resolves and label-normalizes, dropping targets left empty.
pub fn prepare_targets(text: &FlattenedText, entities: &[DetectedEntity]) -> Vec<RedactionTarget> {
    resolve_spans(text, entities)
        .into_iter()
        .filter_map(normalize_target)
        .collect()
}
