//! Sensitive-entity detection.
//!
//! The pipeline only sees [`EntityDetector`]: any model or service that turns
//! flattened document text into typed char spans. Two implementations ship
//! with the crate:
//!
//! - [`RecognizerSet`]: an immutable set of regex recognizers, built
//!   explicitly and passed into the pipeline.
//! - [`PrecomputedDetector`]: replays spans produced elsewhere (JSON).

pub mod builtin;
pub mod phone;
pub mod recognizer;

pub use builtin::default_recognizers;
pub use phone::PhoneRecognizer;
pub use recognizer::{Pattern, PatternRecognizer, Recognizer, RecognizerMatch};

use std::path::Path;
use tracing::debug;

use crate::domain::{DetectedEntity, FlattenedText};
use crate::error::{RedactorError, RedactorResult};

/// Turns flattened document text into sensitive spans.
pub trait EntityDetector: Send + Sync {
    /// Returns entities as char offsets into `text`.
    fn detect(&self, text: &FlattenedText, language: &str) -> RedactorResult<Vec<DetectedEntity>>;

    /// Returns a human-readable name for this detector.
    fn name(&self) -> &str;
}

/// A fixed collection of recognizers run together.
pub struct RecognizerSet {
    recognizers: Vec<Box<dyn Recognizer>>,
    min_score: f32,
}

impl RecognizerSet {
    pub fn new(recognizers: Vec<Box<dyn Recognizer>>) -> Self {
        Self {
            recognizers,
            min_score: 0.0,
        }
    }

    /// The built-in recognizers.
    pub fn builtin() -> RedactorResult<Self> {
        Ok(Self::new(default_recognizers()?))
    }

    pub fn with_recognizer(mut self, recognizer: Box<dyn Recognizer>) -> Self {
        self.recognizers.push(recognizer);
        self
    }

    /// Drops matches scoring below `min_score`.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn entity_types(&self) -> Vec<&str> {
        self.recognizers.iter().map(|r| r.entity_type()).collect()
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }
}

/// Removes exact repeats and spans contained in a higher-scoring span of the
/// same type, then orders by position.
fn remove_contained(mut found: Vec<DetectedEntity>) -> Vec<DetectedEntity> {
    found.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.start.cmp(&b.start))
            .then(b.end.cmp(&a.end))
    });

    let mut kept: Vec<DetectedEntity> = Vec::with_capacity(found.len());
    for entity in found {
        let contained = kept.iter().any(|k| {
            k.entity_type == entity.entity_type && k.start <= entity.start && entity.end <= k.end
        });
        if !contained {
            kept.push(entity);
        }
    }

    kept.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
    kept
}

impl EntityDetector for RecognizerSet {
    fn detect(&self, text: &FlattenedText, language: &str) -> RedactorResult<Vec<DetectedEntity>> {
        let active: Vec<&dyn Recognizer> = self
            .recognizers
            .iter()
            .map(|r| r.as_ref())
            .filter(|r| r.supports_language(language))
            .collect();

        if active.is_empty() {
            return Err(RedactorError::Detection {
                reason: format!("no recognizers support language '{}'", language),
            });
        }

        let mut found = Vec::new();
        for recognizer in active {
            for m in recognizer.analyze(text.as_str()) {
                if m.score < self.min_score {
                    continue;
                }
                let (Some(start), Some(end)) = (text.char_offset(m.start), text.char_offset(m.end))
                else {
                    continue;
                };
                found.push(DetectedEntity::new(
                    start,
                    end,
                    recognizer.entity_type(),
                    m.score,
                ));
            }
        }

        let entities = remove_contained(found);
        debug!(count = entities.len(), language, "recognizers finished");
        Ok(entities)
    }

    fn name(&self) -> &str {
        "RecognizerSet"
    }
}

/// Replays entity spans computed by an external detector.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedDetector {
    entities: Vec<DetectedEntity>,
}

impl PrecomputedDetector {
    pub fn new(entities: Vec<DetectedEntity>) -> Self {
        Self { entities }
    }

    /// Parses a JSON array of `{start, end, entity_type, score?}` objects.
    pub fn from_json_str(json: &str) -> RedactorResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_json_file(path: &Path) -> RedactorResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }
}

impl EntityDetector for PrecomputedDetector {
    fn detect(&self, _text: &FlattenedText, _language: &str) -> RedactorResult<Vec<DetectedEntity>> {
        Ok(self.entities.clone())
    }

    fn name(&self) -> &str {
        "Precomputed"
    }
}
