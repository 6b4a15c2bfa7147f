//! Regex pattern recognizers.

use regex::Regex;

use crate::error::{RedactorError, RedactorResult};

/// A match inside the analyzed text, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecognizerMatch {
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

/// Finds one entity type in raw text.
pub trait Recognizer: Send + Sync {
    fn entity_type(&self) -> &str;
    fn supports_language(&self, language: &str) -> bool;
    fn analyze(&self, text: &str) -> Vec<RecognizerMatch>;
}

/// A named regex with the confidence assigned to its matches.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    regex: Regex,
    score: f32,
}

impl Pattern {
    pub fn new(name: impl Into<String>, regex: &str, score: f32) -> RedactorResult<Self> {
        let regex = Regex::new(regex).map_err(|e| RedactorError::PatternError {
            pattern: regex.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: name.into(),
            regex,
            score,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> f32 {
        self.score
    }
}

/// Recognizes one entity type with a list of regex patterns.
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    entity_type: String,
    language: String,
    patterns: Vec<Pattern>,
}

impl PatternRecognizer {
    /// Creates an English recognizer.
    pub fn new(entity_type: impl Into<String>, patterns: Vec<Pattern>) -> Self {
        Self {
            entity_type: entity_type.into(),
            language: "en".to_string(),
            patterns,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

impl Recognizer for PatternRecognizer {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn supports_language(&self, language: &str) -> bool {
        self.language == language
    }

    fn analyze(&self, text: &str) -> Vec<RecognizerMatch> {
        self.patterns
            .iter()
            .flat_map(|pattern| {
                pattern.regex.find_iter(text).map(|m| RecognizerMatch {
                    start: m.start(),
                    end: m.end(),
                    score: pattern.score,
                })
            })
            .collect()
    }
}
