//! Commits matched regions and writes the cleaned document.
//!
//! Regions are grouped by page and each page is redacted in a single
//! `redact_page` call. Once every page is done the document is saved, its
//! metadata removed, and the result rebuilt without unreferenced objects.

use std::collections::BTreeMap;

use lopdf::Document;
use tracing::debug;

use crate::backend::RedactionSurface;
use crate::domain::{AuditTrail, Rect, RedactionRegion};
use crate::error::{RedactorError, RedactorResult};

/// Applies every region, one atomic commit per page.
///
/// Returns the audit trail; its counts are regions, not rectangles.
pub fn commit_regions<S>(surface: &mut S, regions: &[RedactionRegion]) -> RedactorResult<AuditTrail>
where
    S: RedactionSurface + ?Sized,
{
    let mut by_page: BTreeMap<usize, Vec<&RedactionRegion>> = BTreeMap::new();
    for region in regions.iter().filter(|r| !r.rects.is_empty()) {
        by_page.entry(region.page_index).or_default().push(region);
    }

    let mut counts = Vec::with_capacity(by_page.len());
    for (page_index, page_regions) in by_page {
        let marks: Vec<Rect> = page_regions
            .iter()
            .flat_map(|r| r.rects.iter().copied())
            .collect();
        surface.redact_page(page_index, &marks)?;
        counts.push((page_index, page_regions.len()));
    }

    Ok(AuditTrail::from_counts(counts))
}

/// Removes the trailer `/Info` dictionary and the catalog `/Metadata` stream,
/// then rewrites the file compacted.
pub fn scrub_metadata(bytes: &[u8]) -> RedactorResult<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)?;

    doc.trailer.remove(b"Info");

    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(|root| root.as_reference())
        .map_err(|e| RedactorError::PdfProcessing {
            message: "Document has no catalog".to_string(),
            page: None,
            source: Some(Box::new(e)),
        })?;
    if let Ok(catalog) = doc
        .get_object_mut(catalog_id)
        .and_then(|object| object.as_dict_mut())
    {
        catalog.remove(b"Metadata");
    }

    let pruned = doc.prune_objects();
    doc.delete_zero_length_streams();
    doc.compress();
    debug!(pruned = pruned.len(), "metadata scrubbed");

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| RedactorError::PdfProcessing {
            message: format!("Failed to write cleaned PDF: {}", e),
            page: None,
            source: None,
        })?;
    Ok(out)
}

/// Serializes the surface and scrubs the result.
pub fn finalize<S>(surface: &S) -> RedactorResult<Vec<u8>>
where
    S: RedactionSurface + ?Sized,
{
    let saved = surface.save()?;
    scrub_metadata(&saved)
}
