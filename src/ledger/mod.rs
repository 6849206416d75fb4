//! Completion ledger: the append-only record of completion events.
//!
//! The scheduling core only reads through [`CompletionLedger::entries_for`]
//! and extends through [`CompletionLedger::append`]. Backends:
//! - [`MemoryLedger`] for tests and already-materialized snapshots
//! - [`JsonlLedger`] for a JSON-lines file on disk

pub mod entry;
pub mod jsonl;
pub mod memory;

use chrono::NaiveDate;

pub use entry::{CompletionNote, CompletionStatus, LedgerEntry};
pub use jsonl::JsonlLedger;
pub use memory::MemoryLedger;

/// Read/append access to completion entries.
///
/// Duplicate entries for the same (activity, date) are legal and are
/// treated as extra evidence, never as an error.
pub trait CompletionLedger {
    /// All entries for an activity, in no particular order.
    fn entries_for(&self, activity_id: &str) -> Vec<LedgerEntry>;

    /// Append one or more entries, all or nothing.
    ///
    /// Appended entries are visible to subsequent queries on the same value.
    fn append(&mut self, entries: Vec<LedgerEntry>) -> crate::Result<()>;

    /// Whether at least one entry exists for `activity_id` on `date`.
    fn has_entry_on(&self, activity_id: &str, date: NaiveDate) -> bool {
        self.entries_for(activity_id)
            .iter()
            .any(|entry| entry.date == date)
    }
}
