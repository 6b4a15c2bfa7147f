//! Per-page redaction audit trail.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Number of regions committed on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    /// 0-based page index.
    pub page_index: usize,
    pub count: usize,
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {}: {} redactions", self.page_index + 1, self.count)
    }
}

/// Ordered entries for pages with at least one redaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    /// Builds a trail from per-page counts, dropping pages with none.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut merged: BTreeMap<usize, usize> = BTreeMap::new();
        for (page_index, count) in counts {
            *merged.entry(page_index).or_default() += count;
        }

        let entries = merged
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(page_index, count)| AuditEntry { page_index, count })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total regions committed across all pages.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn count_for_page(&self, page_index: usize) -> usize {
        self.entries
            .iter()
            .find(|e| e.page_index == page_index)
            .map_or(0, |e| e.count)
    }

    /// Human-readable lines, one per page.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Emits every entry as a structured log event.
    pub fn emit(&self, document: &str) {
        for entry in &self.entries {
            info!(
                audit.document = %document,
                audit.page = entry.page_index + 1,
                audit.count = entry.count,
                "redactions committed"
            );
        }
    }
}
