//! Phone number recognizer.
//!
//! Encapsulates the business rules for North American phone numbers:
//! detection and NANP validation.

use super::recognizer::{Recognizer, RecognizerMatch};
use once_cell::sync::Lazy;
use regex::Regex;

/// Entity type reported for phone numbers.
pub const PHONE_NUMBER: &str = "PHONE_NUMBER";

/// American phone number recognizer.
///
/// Supports various North American Numbering Plan (NANP) formats:
/// - (555) 234-5678
/// - 555-234-5678
/// - 555.234.5678
/// - +1 555 234 5678
#[derive(Debug, Clone)]
pub struct PhoneRecognizer {
    score: f32,
}

impl PhoneRecognizer {
    pub fn new() -> Self {
        Self { score: 0.75 }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"(?:\+?\s*1[-.\s]?)?\(?\s*([2-9]\d{2})\s*\)?[-.\s]?\s*(\d{3})[-.\s]?\s*(\d{4})\b",
            )
            .expect("Valid phone number regex")
        });
        &PATTERN
    }

    /// Validates that a phone number follows NANP rules.
    ///
    /// # Rules
    /// - Area code (NXX): First digit 2-9, remaining digits 0-9
    /// - Exchange code: First digit 2-9, remaining digits 0-9
    /// - Subscriber number: Any 4 digits
    pub fn validate(area: &str, exchange: &str, subscriber: &str) -> bool {
        area.len() == 3
            && exchange.len() == 3
            && subscriber.len() == 4
            && area
                .chars()
                .next()
                .is_some_and(|c| ('2'..='9').contains(&c))
            && exchange
                .chars()
                .next()
                .is_some_and(|c| ('2'..='9').contains(&c))
    }
}

impl Default for PhoneRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for PhoneRecognizer {
    fn entity_type(&self) -> &str {
        PHONE_NUMBER
    }

    fn supports_language(&self, language: &str) -> bool {
        language == "en"
    }

    fn analyze(&self, text: &str) -> Vec<RecognizerMatch> {
        Self::regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if !Self::validate(caps.get(1)?.as_str(), caps.get(2)?.as_str(), caps.get(3)?.as_str())
                {
                    return None;
                }
                // The pattern may start on whitespace before an area code.
                let matched = whole.as_str();
                let start = whole.start() + (matched.len() - matched.trim_start().len());
                Some(RecognizerMatch {
                    start,
                    end: whole.end(),
                    score: self.score,
                })
            })
            .collect()
    }
}
