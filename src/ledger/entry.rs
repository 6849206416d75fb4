//! Completion ledger entry types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Status recorded on a ledger entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionStatus {
    #[default]
    Completed,
}

/// Attribution and evidence supplied with a single completion action.
///
/// Every entry produced by one action (backfilled or not) carries the same
/// note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionNote {
    /// URL or photo reference proving the work was done.
    pub evidence_link: String,
    /// Free-text remarks.
    pub comments: String,
    /// Who performed the action.
    pub user: String,
}

impl CompletionNote {
    /// A note attributed to `user` with no evidence or comments.
    pub fn by(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Self::default()
        }
    }
}

/// One completion event in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The logical occurrence date being marked complete.
    pub date: NaiveDate,
    /// The activity this entry completes.
    pub activity_id: String,
    #[serde(default)]
    pub status: CompletionStatus,
    #[serde(default)]
    pub evidence_link: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub user: String,
    /// Wall-clock time the entry was written.
    pub logged_at: DateTime<Utc>,
    /// `true` when `date` differs from the date of the action that wrote it.
    #[serde(default)]
    pub was_backfilled: bool,
}

impl LedgerEntry {
    /// Build a completed entry for `activity_id` on `date`.
    pub fn completed(
        activity_id: impl Into<String>,
        date: NaiveDate,
        note: &CompletionNote,
        logged_at: DateTime<Utc>,
        was_backfilled: bool,
    ) -> Self {
        Self {
            date,
            activity_id: activity_id.into(),
            status: CompletionStatus::Completed,
            evidence_link: note.evidence_link.clone(),
            comments: note.comments.clone(),
            user: note.user.clone(),
            logged_at,
            was_backfilled,
        }
    }
}
