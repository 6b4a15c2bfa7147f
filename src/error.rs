//! Error types for the PII redaction library.
//!
//! Errors are categorized by their source. Pipeline failures are wrapped in
//! [`RedactorError::Redaction`] so callers processing a batch know which
//! document failed and at which stage.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Pipeline stage at which a document failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Open,
    Extract,
    Commit,
    Serialize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Extract => "extract",
            Self::Commit => "commit",
            Self::Serialize => "serialize",
        };
        f.write_str(name)
    }
}

/// Error type for all redaction operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error occurred during PDF processing
    #[error("PDF processing error{}: {message}", on_page(.page))]
    PdfProcessing {
        message: String,
        page: Option<usize>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Regex compilation error in a recognizer pattern
    #[error("Pattern error for '{pattern}': {reason}")]
    PatternError { pattern: String, reason: String },

    /// Text could not be read from a page
    #[error("Text extraction failed on page {page}: {reason}")]
    TextExtraction { page: usize, reason: String },

    /// The OCR engine failed or is unavailable
    #[error("OCR failed: {reason}")]
    Ocr { reason: String },

    /// The entity detector failed
    #[error("Entity detection failed: {reason}")]
    Detection { reason: String },

    /// Invalid configuration or parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// Backend-specific error (MuPDF, lopdf, ...)
    #[error("{backend} backend error: {message}")]
    BackendError {
        backend: String,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A whole document failed to redact
    #[error("Redaction of '{document}' failed during {stage}: {source}")]
    Redaction {
        document: String,
        stage: Stage,
        #[source]
        source: Box<RedactorError>,
    },
}

fn on_page(page: &Option<usize>) -> String {
    page.map(|p| format!(" on page {}", p)).unwrap_or_default()
}

impl RedactorError {
    /// Builds a backend error carrying the original cause.
    pub fn backend<E>(backend: &str, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BackendError {
            backend: backend.to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the stage a wrapped document failure happened at.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Redaction { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<regex::Error> for RedactorError {
    fn from(err: regex::Error) -> Self {
        Self::PatternError {
            pattern: "<unknown>".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<lopdf::Error> for RedactorError {
    fn from(err: lopdf::Error) -> Self {
        Self::backend("lopdf", err.to_string(), err)
    }
}

/// Attaches document and stage context to a pipeline result.
pub trait StageContext<T> {
    fn at_stage(self, document: &str, stage: Stage) -> RedactorResult<T>;
}

impl<T> StageContext<T> for RedactorResult<T> {
    fn at_stage(self, document: &str, stage: Stage) -> RedactorResult<T> {
        self.map_err(|err| match err {
            already @ RedactorError::Redaction { .. } => already,
            other => RedactorError::Redaction {
                document: document.to_string(),
                stage,
                source: Box::new(other),
            },
        })
    }
}
