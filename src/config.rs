//! Pipeline configuration.

use serde::Deserialize;
use std::path::Path;

use crate::error::{RedactorError, RedactorResult};

/// Resolution used when a page has to be rasterized for OCR.
pub const DEFAULT_OCR_DPI: u32 = 300;

/// How target text is compared with page text during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Exact, case-sensitive literal match.
    #[default]
    CaseSensitive,
    /// Literal match ignoring letter case.
    CaseInsensitive,
}

/// How redaction regions are located on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Re-search each target's literal text on every page.
    #[default]
    Search,
    /// Map entity offsets straight to glyph geometry of text-layer pages.
    Offsets,
}

/// Settings for one redaction run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RedactionConfig {
    /// Rasterization resolution for OCR fallback.
    pub dpi: u32,
    /// Language passed to the entity detector.
    pub language: String,
    /// Language passed to the OCR engine (Tesseract naming).
    pub ocr_language: String,
    pub match_policy: MatchPolicy,
    pub match_mode: MatchMode,
    /// Detections scoring below this are ignored.
    pub min_score: f32,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_OCR_DPI,
            language: "en".to_string(),
            ocr_language: "eng".to_string(),
            match_policy: MatchPolicy::default(),
            match_mode: MatchMode::default(),
            min_score: 0.0,
        }
    }
}

impl RedactionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file. Missing fields keep defaults.
    pub fn from_json_file(path: &Path) -> RedactorResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = language.into();
        self
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> RedactorResult<()> {
        if self.dpi == 0 {
            return Err(RedactorError::InvalidInput {
                parameter: "dpi".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(RedactorError::InvalidInput {
                parameter: "min_score".to_string(),
                reason: format!("{} is outside 0.0..=1.0", self.min_score),
            });
        }
        if self.language.trim().is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "language".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
