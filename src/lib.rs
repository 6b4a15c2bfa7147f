//! PDF PII redaction library with secure content removal.
//!
//! Finds personally identifiable information in PDF documents and removes it
//! from the page content itself using MuPDF's redaction API. Redacted text
//! is gone from the output file, not hidden behind a box.
//!
//! # Features
//!
//! - **Text layer or OCR**: Pages without embedded text are rendered at
//!   300 DPI and read with Tesseract
//! - **Pluggable detection**: Any [`EntityDetector`]; a regex recognizer set
//!   for SSNs, medical record numbers, device IDs, plates, addresses, postal
//!   codes, phone numbers and email addresses ships built in
//! - **Label stripping**: `"Name: John Smith"` redacts only `John Smith`
//! - **Atomic commits**: All regions on a page are applied together
//! - **Metadata scrubbing**: Document info and XMP metadata are removed and
//!   the output is rebuilt compacted
//! - **Audit trail**: `Page {n}: {count} redactions`
//!
//! # Architecture
//!
//! - [`domain`]: Flattened text, entities, label normalization, audit trail
//! - [`detection`]: Entity detectors and regex recognizers
//! - [`extract`]: Per-page text extraction with OCR fallback
//! - [`backend`]: Document access (MuPDF) and the glyph index
//! - [`redaction`]: Span resolution, matching, commit and the service layer
//! - [`config`]: Pipeline settings
//! - [`source`]: Byte sources documents are read from
//! - [`error`]: Comprehensive error handling
//!
//! # Quick Start
//!
//! ```no_run
//! use pii_redactor::{FileSource, RedactionConfig, RedactionOutcome, RedactionService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedactionService::with_builtin_recognizers(RedactionConfig::default())?;
//!
//! match service.redact_source(&FileSource::new("intake.pdf"))? {
//!     RedactionOutcome::Redacted(doc) => {
//!         std::fs::write("redacted_intake.pdf", &doc.bytes)?;
//!         for line in doc.audit.lines() {
//!             println!("{}", line);
//!         }
//!     }
//!     RedactionOutcome::NoEntities { .. } => println!("nothing to redact"),
//!     RedactionOutcome::NoTextExtracted => println!("no text extracted"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Examples
//!
//! ## Case-insensitive search
//!
//! ```no_run
//! use pii_redactor::{MatchPolicy, RedactionConfig, RedactionService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RedactionConfig::default().with_match_policy(MatchPolicy::CaseInsensitive);
//! let service = RedactionService::with_builtin_recognizers(config)?;
//! let outcome = service.redact_bytes("upload.pdf", &std::fs::read("upload.pdf")?)?;
//! println!("redacted anything: {}", outcome.has_redactions());
//! # Ok(())
//! # }
//! ```
//!
//! ## Label normalization
//!
//! ```
//! use pii_redactor::domain::normalize_value;
//!
//! assert_eq!(normalize_value(" Name: John Smith"), "John Smith");
//! assert_eq!(normalize_value("SSN:"), "");
//! ```

// Public API
pub mod backend;
pub mod config;
pub mod detection;
pub mod domain;
pub mod error;
pub mod extract;
pub mod redaction;
pub mod source;

// Re-exports for convenient access
pub use config::{MatchMode, MatchPolicy, RedactionConfig, DEFAULT_OCR_DPI};
pub use detection::{EntityDetector, PrecomputedDetector, RecognizerSet};
pub use domain::{AuditTrail, DetectedEntity, FlattenedText, RedactionTarget};
pub use error::{RedactorError, RedactorResult, Stage};
pub use extract::{NoOcr, OcrEngine, TesseractOcr};
pub use redaction::{
    BatchItem, DetectionReport, RedactedDocument, RedactionOutcome, RedactionService,
};
pub use source::{ByteSource, FileSource, MemorySource};
