//! Match strategy trait and pipeline result types.

use crate::domain::{AuditTrail, EntitySummary, RedactionRegion, RedactionTarget};
use crate::extract::ExtractedDocument;

/// Locates the on-page regions of a redaction target.
///
/// Implementations only read; nothing is removed until every target has been
/// matched, so all regions are computed against the unredacted pages.
pub trait MatchStrategy: Send + Sync {
    fn find_regions(
        &self,
        target: &RedactionTarget,
        document: &ExtractedDocument,
    ) -> Vec<RedactionRegion>;

    /// Returns a human-readable name for this strategy.
    fn name(&self) -> &str;
}

/// A document whose redactions were committed.
#[derive(Debug, Clone)]
pub struct RedactedDocument {
    /// The new PDF, metadata cleared.
    pub bytes: Vec<u8>,
    pub audit: AuditTrail,
    /// Detected values grouped by category, before label stripping.
    pub summary: EntitySummary,
    /// Targets that were searched for.
    pub targets: Vec<RedactionTarget>,
    pub pages_processed: usize,
    /// Pages whose detection text came from OCR.
    pub ocr_pages: Vec<usize>,
}

/// Result of running the pipeline on one document.
#[derive(Debug, Clone)]
pub enum RedactionOutcome {
    /// No page yielded any text; detection never ran.
    NoTextExtracted,
    /// Nothing was detected. The document was not touched.
    NoEntities {
        /// Set when the detector failed and zero entities were assumed.
        detection_failure: Option<String>,
    },
    /// Redactions were committed and a new document produced.
    Redacted(RedactedDocument),
}

impl RedactionOutcome {
    pub fn audit(&self) -> Option<&AuditTrail> {
        match self {
            Self::Redacted(doc) => Some(&doc.audit),
            _ => None,
        }
    }

    /// Returns true if any region was committed.
    pub fn has_redactions(&self) -> bool {
        self.audit().is_some_and(|audit| !audit.is_empty())
    }

    pub fn redacted(&self) -> Option<&RedactedDocument> {
        match self {
            Self::Redacted(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn into_redacted(self) -> Option<RedactedDocument> {
        match self {
            Self::Redacted(doc) => Some(doc),
            _ => None,
        }
    }
}
