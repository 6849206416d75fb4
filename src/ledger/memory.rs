//! In-memory ledger snapshot.

use super::{CompletionLedger, LedgerEntry};

/// Ledger held entirely in memory. Lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    entries: Vec<LedgerEntry>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded with existing entries.
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    /// Every entry, in append order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CompletionLedger for MemoryLedger {
    fn entries_for(&self, activity_id: &str) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.activity_id == activity_id)
            .cloned()
            .collect()
    }

    fn append(&mut self, entries: Vec<LedgerEntry>) -> crate::Result<()> {
        self.entries.extend(entries);
        Ok(())
    }
}
