//! Overdue detection and backfill computation.
//!
//! An activity with no ledger history is always overdue, whatever its
//! recurrence. Backfill never invents history for such an activity: only
//! dates strictly after a real completion are synthesized.

use chrono::{DateTime, NaiveDate, Utc};

use crate::ledger::{CompletionLedger, CompletionNote, LedgerEntry};

/// Most recent completion date for an activity, if any.
pub fn last_completed<L>(activity_id: &str, ledger: &L) -> Option<NaiveDate>
where
    L: CompletionLedger + ?Sized,
{
    ledger
        .entries_for(activity_id)
        .iter()
        .map(|entry| entry.date)
        .max()
}

/// Returns `true` if the activity was never completed or was last completed
/// strictly before `today`.
pub fn is_overdue<L>(activity_id: &str, ledger: &L, today: NaiveDate) -> bool
where
    L: CompletionLedger + ?Sized,
{
    match last_completed(activity_id, ledger) {
        None => true,
        Some(last) => last < today,
    }
}

/// Calendar dates strictly between `last` and `today`, ascending.
pub fn missed_dates(last: Option<NaiveDate>, today: NaiveDate) -> Vec<NaiveDate> {
    let Some(last) = last else {
        return Vec::new();
    };
    last.iter_days()
        .skip(1)
        .take_while(|date| *date < today)
        .collect()
}

/// Entries to append when the activity is completed on `today`.
///
/// One backfilled entry per missed date since the last completion, then one
/// entry for `today`. Every entry carries the same note and `logged_at`.
pub fn compute_backfill_entries<L>(
    activity_id: &str,
    ledger: &L,
    today: NaiveDate,
    note: &CompletionNote,
    logged_at: DateTime<Utc>,
) -> Vec<LedgerEntry>
where
    L: CompletionLedger + ?Sized,
{
    let missed = missed_dates(last_completed(activity_id, ledger), today);
    let mut entries: Vec<LedgerEntry> = missed
        .into_iter()
        .map(|date| LedgerEntry::completed(activity_id, date, note, logged_at, true))
        .collect();
    entries.push(LedgerEntry::completed(activity_id, today, note, logged_at, false));
    entries
}
