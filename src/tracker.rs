//! Tracker host: joins an activity snapshot with a ledger.
//!
//! Everything here is a thin composition of [`crate::schedule`] over one
//! snapshot. The host decides when to take a fresh snapshot; nothing is
//! cached across calls.

use chrono::{DateTime, Days, NaiveDate, Utc};
use tracing::{debug, info};

use crate::activity::{Activity, ScheduleKind};
use crate::error::{Result, TrackerError};
use crate::ledger::{CompletionLedger, CompletionNote, LedgerEntry};
use crate::schedule::{
    compute_backfill_entries, is_overdue, last_completed, matches, resolve_by_name,
    unmet_dependencies,
};
use crate::store::find_activity;

/// Agenda filters. The default shows everything due or overdue.
#[derive(Debug, Clone, Default)]
pub struct AgendaFilter {
    /// Only activities of this schedule kind.
    pub schedule: Option<ScheduleKind>,
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
    /// Hide activities that are not overdue.
    pub overdue_only: bool,
}

/// Derived state of one activity on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityStatus {
    pub scheduled_today: bool,
    pub overdue: bool,
    pub done_today: bool,
    pub last_completed: Option<NaiveDate>,
    /// Dependency names still waiting on a completion today.
    pub pending_dependencies: Vec<String>,
}

impl ActivityStatus {
    /// Whether the gate lets the activity be completed now.
    pub fn can_complete(&self) -> bool {
        self.pending_dependencies.is_empty()
    }
}

/// One agenda row.
#[derive(Debug, Clone)]
pub struct AgendaItem {
    pub activity: Activity,
    pub status: ActivityStatus,
}

/// Completion grid over a window of days ending today.
#[derive(Debug, Clone, Default)]
pub struct CalendarView {
    /// Window dates, oldest first.
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<CalendarRow>,
}

/// Per-activity row of a [`CalendarView`].
#[derive(Debug, Clone)]
pub struct CalendarRow {
    pub activity_id: String,
    pub name: String,
    /// `done[i]` is true when an entry exists on `dates[i]`.
    pub done: Vec<bool>,
}

/// Ledger entries counted per activity over a look-back window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCount {
    pub activity_id: String,
    pub name: String,
    pub count: usize,
}

/// A "must be done before" edge between two activity names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub dependency: String,
    pub activity: String,
    /// False when no activity carries the dependency's name.
    pub resolved: bool,
}

/// Activity snapshot plus the ledger it is evaluated against.
#[derive(Debug)]
pub struct Tracker<L> {
    activities: Vec<Activity>,
    ledger: L,
}

impl<L: CompletionLedger> Tracker<L> {
    /// Bind an activity snapshot to a ledger.
    pub fn new(activities: Vec<Activity>, ledger: L) -> Self {
        Self { activities, ledger }
    }

    /// The activity snapshot, in table order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// The ledger completions are read from and appended to.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Resolve an activity by id, then by exact name.
    pub fn find(&self, key: &str) -> Result<&Activity> {
        find_activity(&self.activities, key)
            .ok_or_else(|| TrackerError::ActivityNotFound(key.to_owned()))
    }

    /// Derived state for `activity` on `today`.
    pub fn status(&self, activity: &Activity, today: NaiveDate) -> ActivityStatus {
        ActivityStatus {
            scheduled_today: matches(activity.recurrence.as_ref(), today),
            overdue: is_overdue(&activity.id, &self.ledger, today),
            done_today: self.ledger.has_entry_on(&activity.id, today),
            last_completed: last_completed(&activity.id, &self.ledger),
            pending_dependencies: unmet_dependencies(activity, &self.activities, &self.ledger, today),
        }
    }

    /// Activities passing the schedule and search filters, in table order.
    fn filtered<'a>(&'a self, filter: &'a AgendaFilter) -> impl Iterator<Item = &'a Activity> {
        self.activities
            .iter()
            .filter(|a| filter.schedule.is_none_or(|kind| a.schedule_kind == kind))
            .filter(|a| filter.search.as_deref().is_none_or(|term| a.matches_search(term)))
    }

    /// Activities scheduled for or overdue on `today`, in table order.
    pub fn agenda(&self, today: NaiveDate, filter: &AgendaFilter) -> Vec<AgendaItem> {
        self.filtered(filter)
            .filter_map(|activity| {
                let status = self.status(activity, today);
                if filter.overdue_only && !status.overdue {
                    return None;
                }
                if !status.scheduled_today && !status.overdue {
                    return None;
                }
                Some(AgendaItem {
                    activity: activity.clone(),
                    status,
                })
            })
            .collect()
    }

    /// Mark an activity complete on `today`, backfilling missed dates.
    ///
    /// Refuses when an entry for `today` already exists or a dependency is
    /// still pending. All produced entries are appended in one call.
    pub fn complete(
        &mut self,
        key: &str,
        note: &CompletionNote,
        today: NaiveDate,
        logged_at: DateTime<Utc>,
    ) -> Result<Vec<LedgerEntry>> {
        let activity = self.find(key)?.clone();

        if self.ledger.has_entry_on(&activity.id, today) {
            return Err(TrackerError::AlreadyCompleted {
                activity: activity.name,
                date: today,
            });
        }
        let pending = unmet_dependencies(&activity, &self.activities, &self.ledger, today);
        if !pending.is_empty() {
            return Err(TrackerError::DependenciesPending {
                activity: activity.name,
                pending,
            });
        }

        let entries = compute_backfill_entries(&activity.id, &self.ledger, today, note, logged_at);
        self.ledger.append(entries.clone())?;

        let backfilled = entries.iter().filter(|e| e.was_backfilled).count();
        info!(
            "completed '{}' on {today} ({backfilled} backfilled)",
            activity.name
        );
        Ok(entries)
    }

    /// Entries for an activity, newest date first, at most `limit`.
    pub fn history(&self, key: &str, limit: usize) -> Result<Vec<LedgerEntry>> {
        let activity = self.find(key)?;
        let mut entries = self.ledger.entries_for(&activity.id);
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.logged_at.cmp(&a.logged_at)));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Completion grid for the `days` dates ending on `today`.
    ///
    /// Rows cover the activities passing the schedule and search filters;
    /// `overdue_only` does not apply.
    pub fn calendar(&self, today: NaiveDate, days: u32, filter: &AgendaFilter) -> CalendarView {
        let Some(start) = window_start(today, days) else {
            return CalendarView::default();
        };
        let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= today).collect();

        let rows = self
            .filtered(filter)
            .map(|activity| {
                let entries = self.ledger.entries_for(&activity.id);
                CalendarRow {
                    activity_id: activity.id.clone(),
                    name: activity.name.clone(),
                    done: dates
                        .iter()
                        .map(|d| entries.iter().any(|e| e.date == *d))
                        .collect(),
                }
            })
            .collect();
        CalendarView { dates, rows }
    }

    /// Entries per activity dated on or after `today - window_days`.
    ///
    /// Activities with no entries in the window are omitted.
    pub fn completion_counts(&self, today: NaiveDate, window_days: u32) -> Vec<CompletionCount> {
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MIN);
        debug!("counting completions since {cutoff}");
        self.activities
            .iter()
            .map(|activity| CompletionCount {
                activity_id: activity.id.clone(),
                name: activity.name.clone(),
                count: self
                    .ledger
                    .entries_for(&activity.id)
                    .iter()
                    .filter(|e| e.date >= cutoff)
                    .count(),
            })
            .filter(|c| c.count > 0)
            .collect()
    }

    /// Every dependency edge, in table order.
    pub fn dependency_edges(&self) -> Vec<DependencyEdge> {
        self.activities
            .iter()
            .flat_map(|activity| {
                activity.dependencies.iter().map(|dependency| DependencyEdge {
                    dependency: dependency.clone(),
                    activity: activity.name.clone(),
                    resolved: resolve_by_name(&self.activities, dependency).is_some(),
                })
            })
            .collect()
    }
}

fn window_start(today: NaiveDate, days: u32) -> Option<NaiveDate> {
    let back = days.checked_sub(1)?;
    today.checked_sub_days(Days::new(u64::from(back)))
}
