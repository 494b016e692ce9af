use serde::Serialize;
use tracing::debug;

/// Capacity of the fixed completion buffer older dictionaries were built around.
/// Pass it as a limit to reproduce that behavior; collection is unbounded otherwise.
pub const LEGACY_CAPACITY: usize = 100;

/// A stored word reached during prefix collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub word: String,
    pub frequency: i64,
}

impl Completion {
    pub fn new(word: impl Into<String>, frequency: i64) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }
}

/// Buffer of completions gathered for a single query.
///
/// Entries are kept in the order they were pushed until [`RankedCollector::rank`]
/// consumes the buffer.
#[derive(Debug, Default)]
pub struct RankedCollector {
    entries: Vec<Completion>,
    limit: Option<usize>,
    dropped: usize,
}

impl RankedCollector {
    /// Creates an unbounded collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collector that keeps at most `limit` entries when a limit is given.
    /// Pushes past the limit are counted but not stored.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Returns `false` if the entry was dropped because the collector is full.
    pub fn push(&mut self, word: impl Into<String>, frequency: i64) -> bool {
        if self.limit.is_some_and(|limit| self.entries.len() >= limit) {
            self.dropped += 1;
            return false;
        }
        self.entries.push(Completion::new(word, frequency));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pushes rejected by the limit.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Entries in the order they were pushed.
    pub fn into_entries(self) -> Vec<Completion> {
        self.entries
    }

    /// Consumes the collector, returning its entries by descending frequency.
    pub fn rank(self) -> Vec<Completion> {
        if self.dropped > 0 {
            debug!(
                "Completion limit {:?} reached, dropped {} matches",
                self.limit, self.dropped
            );
        }
        rank(self.entries)
    }
}

/// Sorts by frequency, highest first. Equal frequencies keep their input order.
pub fn rank(mut completions: Vec<Completion>) -> Vec<Completion> {
    // `sort_by` is stable.
    completions.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    completions
}
