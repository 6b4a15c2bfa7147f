//! The redaction pipeline.
//!
//! [`RedactionService`] runs one document through every stage:
//!
//! 1. extract page text (text layer, else OCR)
//! 2. detect entities on the flattened text
//! 3. resolve spans into targets and strip field labels
//! 4. match every target against the unredacted pages
//! 5. commit regions page by page, scrub metadata, serialize
//!
//! Extraction and detection degrade instead of failing. Anything that goes
//! wrong from opening the document to serializing it fails the whole
//! document and produces no output.

pub mod committer;
pub mod matcher;
pub mod resolver;
pub mod strategy;

pub use committer::{commit_regions, finalize, scrub_metadata};
pub use matcher::{find_all_regions, strategy_for, OffsetMatcher, SearchMatcher};
pub use resolver::{prepare_targets, resolve_spans};
pub use strategy::{MatchStrategy, RedactedDocument, RedactionOutcome};

use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::backend::{MupdfDocument, RedactionSurface};
use crate::config::RedactionConfig;
use crate::detection::{EntityDetector, RecognizerSet};
use crate::domain::{normalize_target, DetectedEntity, EntitySummary, RedactionTarget};
use crate::error::{RedactorResult, Stage, StageContext};
use crate::extract::{ExtractedDocument, OcrEngine, PageTextExtractor, TesseractOcr};
use crate::source::ByteSource;

/// What the detector found, before anything is redacted.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub entities: Vec<DetectedEntity>,
    /// Label-stripped values that would be searched for.
    pub targets: Vec<RedactionTarget>,
}

/// Result of one document in a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub document: String,
    pub result: RedactorResult<RedactionOutcome>,
}

/// Redaction service coordinating the pipeline stages.
///
/// The detector, OCR engine and configuration are fixed at construction and
/// shared read-only by every document the service processes.
pub struct RedactionService {
    detector: Box<dyn EntityDetector>,
    ocr: Box<dyn OcrEngine>,
    config: RedactionConfig,
}

impl RedactionService {
    pub fn new(
        detector: Box<dyn EntityDetector>,
        ocr: Box<dyn OcrEngine>,
        config: RedactionConfig,
    ) -> Self {
        Self {
            detector,
            ocr,
            config,
        }
    }

    /// Creates a service with the built-in recognizers and Tesseract OCR.
    pub fn with_builtin_recognizers(config: RedactionConfig) -> RedactorResult<Self> {
        config.validate()?;
        let detector = RecognizerSet::builtin()?.with_min_score(config.min_score);
        let ocr = TesseractOcr::new(config.ocr_language.clone());
        Ok(Self::new(Box::new(detector), Box::new(ocr), config))
    }

    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    /// Extracts the text of every page of a PDF.
    pub fn extract_text(&self, bytes: &[u8]) -> RedactorResult<ExtractedDocument> {
        let document = MupdfDocument::from_bytes(bytes)?;
        PageTextExtractor::new(self.ocr.as_ref(), self.config.dpi).extract(&document)
    }

    /// Runs extraction and detection only.
    ///
    /// Unlike the pipeline, a detector failure is returned as an error here.
    pub fn detect(&self, bytes: &[u8]) -> RedactorResult<DetectionReport> {
        let extracted = self.extract_text(bytes)?;
        let text = extracted.flattened();
        let entities = self.detector.detect(text, &self.config.language)?;
        let targets = prepare_targets(text, &entities);
        Ok(DetectionReport { entities, targets })
    }

    /// Redacts a PDF held in memory. The input buffer is never modified.
    pub fn redact_bytes(&self, document: &str, bytes: &[u8]) -> RedactorResult<RedactionOutcome> {
        let mut surface = MupdfDocument::from_bytes(bytes).at_stage(document, Stage::Open)?;
        self.redact_document(document, &mut surface)
    }

    /// Reads a source completely and redacts it.
    pub fn redact_source(&self, source: &dyn ByteSource) -> RedactorResult<RedactionOutcome> {
        let document = source.identifier();
        let bytes = source.read_all().at_stage(&document, Stage::Open)?;
        self.redact_bytes(&document, &bytes)
    }

    /// Runs the full pipeline on an opened document.
    pub fn redact_document<S>(
        &self,
        document: &str,
        surface: &mut S,
    ) -> RedactorResult<RedactionOutcome>
    where
        S: RedactionSurface + ?Sized,
    {
        let span = info_span!("redact", document = %document);
        let _guard = span.enter();

        let extracted = PageTextExtractor::new(self.ocr.as_ref(), self.config.dpi)
            .extract(&*surface)
            .at_stage(document, Stage::Extract)?;
        let text = extracted.flattened();

        if text.is_blank() {
            info!(pages = extracted.pages().len(), "no text extracted");
            return Ok(RedactionOutcome::NoTextExtracted);
        }

        let entities = match self.detector.detect(text, &self.config.language) {
            Ok(entities) => entities,
            Err(err) => {
                warn!(detector = self.detector.name(), error = %err, "detection failed, assuming no entities");
                return Ok(RedactionOutcome::NoEntities {
                    detection_failure: Some(err.to_string()),
                });
            }
        };
        if entities.is_empty() {
            info!(detector = self.detector.name(), "no entities detected");
            return Ok(RedactionOutcome::NoEntities {
                detection_failure: None,
            });
        }

        let resolved = resolve_spans(text, &entities);
        let summary = EntitySummary::from_targets(&resolved);
        let targets: Vec<RedactionTarget> =
            resolved.into_iter().filter_map(normalize_target).collect();
        info!(
            entities = entities.len(),
            targets = targets.len(),
            "entities resolved"
        );

        let strategy = strategy_for(&self.config);
        let regions = find_all_regions(strategy.as_ref(), &targets, &extracted);

        let audit = commit_regions(&mut *surface, &regions).at_stage(document, Stage::Commit)?;
        let bytes = finalize(&*surface).at_stage(document, Stage::Serialize)?;

        audit.emit(document);
        info!(
            regions = audit.total(),
            pages = audit.entries().len(),
            "document redacted"
        );

        Ok(RedactionOutcome::Redacted(RedactedDocument {
            bytes,
            audit,
            summary,
            targets,
            pages_processed: extracted.pages().len(),
            ocr_pages: extracted.ocr_pages(),
        }))
    }

    /// Redacts sources one at a time, in order.
    ///
    /// The returned iterator is lazy: a source is only read when the
    /// previous item has been taken, so callers can write each result out
    /// before the next document is opened. A failing document never stops
    /// the batch; its error is reported in its own item.
    pub fn redact_batch<'a, I>(&'a self, sources: I) -> impl Iterator<Item = BatchItem> + 'a
    where
        I: IntoIterator<Item = &'a dyn ByteSource>,
        I::IntoIter: 'a,
    {
        sources.into_iter().map(move |source| {
            let document = source.identifier();
            let result = self.redact_source(source);
            if let Err(err) = &result {
                warn!(document = %document, error = %err, "document failed");
            }
            BatchItem { document, result }
        })
    }
}
