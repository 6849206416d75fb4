//! Scheduling and completion-state evaluation.
//!
//! Pure functions over an activity snapshot and a [`CompletionLedger`]:
//! - [`matches`]: does a recurrence fire on a date
//! - [`can_complete`]: are an activity's prerequisites done today
//! - [`is_overdue`] / [`compute_backfill_entries`]: overdue status and the
//!   entries a late completion must append
//!
//! None of these fail or keep state; the host decides when to reload.
//!
//! [`CompletionLedger`]: crate::ledger::CompletionLedger

pub mod gate;
pub mod overdue;
pub mod recurrence;

pub use gate::{can_complete, resolve_by_name, unmet_dependencies};
pub use overdue::{compute_backfill_entries, is_overdue, last_completed, missed_dates};
pub use recurrence::matches;
