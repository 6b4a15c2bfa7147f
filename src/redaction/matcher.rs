//! Region matchers.
//!
//! [`SearchMatcher`] re-searches each target's literal text on every page's
//! embedded text layer. A value detected on one page is therefore also
//! removed where the same text appears on any other page. Text that only OCR
//! could read has no layer to be found in, so scanned pages get no regions.
//!
//! [`OffsetMatcher`] follows the entity's offsets back through the glyph
//! index of the page it was detected on instead of searching. OCR pages take
//! part when the engine reported word boxes.

use tracing::debug;

use super::strategy::MatchStrategy;
use crate::config::{MatchMode, MatchPolicy, RedactionConfig};
use crate::domain::{RedactionRegion, RedactionTarget};
use crate::extract::{ExtractedDocument, TextOrigin};

/// Literal search over each page's text layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchMatcher {
    policy: MatchPolicy,
}

impl SearchMatcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }
}

impl MatchStrategy for SearchMatcher {
    fn find_regions(
        &self,
        target: &RedactionTarget,
        document: &ExtractedDocument,
    ) -> Vec<RedactionRegion> {
        let mut regions = Vec::new();
        for page in document.pages() {
            if page.origin != TextOrigin::TextLayer {
                continue;
            }
            for hit in page.layout.find_all(&target.text, self.policy) {
                let rects = page.layout.rects_for(hit);
                if !rects.is_empty() {
                    regions.push(RedactionRegion {
                        page_index: page.page_index,
                        rects,
                    });
                }
            }
        }
        regions
    }

    fn name(&self) -> &str {
        "Search"
    }
}

/// Maps entity offsets straight onto glyph boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetMatcher;

impl MatchStrategy for OffsetMatcher {
    fn find_regions(
        &self,
        target: &RedactionTarget,
        document: &ExtractedDocument,
    ) -> Vec<RedactionRegion> {
        let mut regions = Vec::new();
        for range in document.flattened().pages() {
            let Some(overlap) = target.span.intersect(&range.span) else {
                continue;
            };
            let Some(page) = document.page(range.page_index) else {
                continue;
            };
            if page.layout.is_empty() {
                debug!(
                    page = page.page_index + 1,
                    entity_type = %target.entity_type,
                    "no glyph geometry for page text"
                );
                continue;
            }

            let local = overlap.start - range.span.start..overlap.end - range.span.start;
            let rects = page.layout.rects_for(local);
            if !rects.is_empty() {
                regions.push(RedactionRegion {
                    page_index: page.page_index,
                    rects,
                });
            }
        }
        regions
    }

    fn name(&self) -> &str {
        "Offsets"
    }
}

/// The strategy selected by a configuration.
pub fn strategy_for(config: &RedactionConfig) -> Box<dyn MatchStrategy> {
    match config.match_mode {
        MatchMode::Search => Box::new(SearchMatcher::new(config.match_policy)),
        MatchMode::Offsets => Box::new(OffsetMatcher),
    }
}

/// Matches every target independently and collects all regions.
pub fn find_all_regions(
    strategy: &dyn MatchStrategy,
    targets: &[RedactionTarget],
    document: &ExtractedDocument,
) -> Vec<RedactionRegion> {
    targets
        .iter()
        .flat_map(|target| {
            let regions = strategy.find_regions(target, document);
            debug!(
                strategy = strategy.name(),
                entity_type = %target.entity_type,
                regions = regions.len(),
                "target matched"
            );
            regions
        })
        .collect()
}
