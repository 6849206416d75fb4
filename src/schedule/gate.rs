//! Dependency gate.
//!
//! Dependencies are activity *names*. A name that resolves to no activity is
//! not a constraint.

use chrono::NaiveDate;

use crate::activity::Activity;
use crate::ledger::CompletionLedger;

/// Find an activity by exact name; the first match wins.
pub fn resolve_by_name<'a>(activities: &'a [Activity], name: &str) -> Option<&'a Activity> {
    activities.iter().find(|a| a.name == name)
}

/// Returns `true` if every resolvable dependency has a ledger entry dated
/// `today`.
///
/// Stops at the first unmet dependency. An empty dependency list always
/// passes.
pub fn can_complete<L>(
    activity: &Activity,
    activities: &[Activity],
    ledger: &L,
    today: NaiveDate,
) -> bool
where
    L: CompletionLedger + ?Sized,
{
    for name in &activity.dependencies {
        let Some(dependency) = resolve_by_name(activities, name) else {
            continue;
        };
        if !ledger.has_entry_on(&dependency.id, today) {
            return false;
        }
    }
    true
}

/// Names of every resolvable dependency not yet completed `today`.
///
/// Empty exactly when [`can_complete`] returns `true`.
pub fn unmet_dependencies<L>(
    activity: &Activity,
    activities: &[Activity],
    ledger: &L,
    today: NaiveDate,
) -> Vec<String>
where
    L: CompletionLedger + ?Sized,
{
    activity
        .dependencies
        .iter()
        .filter(|name| {
            resolve_by_name(activities, name)
                .is_some_and(|dependency| !ledger.has_entry_on(&dependency.id, today))
        })
        .cloned()
        .collect()
}
