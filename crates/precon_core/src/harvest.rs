use std::collections::HashSet;

use crate::record::DeckRecord;

/// Accumulates deck records, deduplicating by canonical URL.
///
/// The listing DOM can repeat the same deck in several anchors after the
/// page re-renders; only the first sighting of a URL is kept.
#[derive(Debug, Default)]
pub struct HarvestResult {
    records: Vec<DeckRecord>,
    seen_urls: HashSet<String>,
}

impl HarvestResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Returns `false` if its URL was already seen.
    pub fn push(&mut self, record: DeckRecord) -> bool {
        if !self.seen_urls.insert(record.url.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the accumulator, returning records sorted ascending by name
    /// (URL as a tie-breaker for determinism).
    pub fn into_sorted(self) -> Vec<DeckRecord> {
        let mut records = self.records;
        records.sort();
        records
    }
}
