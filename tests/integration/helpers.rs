//! Shared helpers for integration tests.

use chrono::NaiveDate;
use sukhii::{ActivityStore, JsonlLedger, NewActivity, ScheduleKind, Tracker, TrackerConfig};

/// A config rooted in a fresh temporary data directory.
/// Returns `(config, tempdir)`; keep the tempdir alive for the test.
pub(crate) fn temp_config() -> (TrackerConfig, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut config = TrackerConfig::default();
    config.storage.data_dir = Some(dir.path().join("data"));
    (config, dir)
}

pub(crate) fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(crate) fn new_activity(name: &str, kind: ScheduleKind, days: &[u8], deps: &[&str]) -> NewActivity {
    NewActivity {
        name: name.to_owned(),
        schedule_kind: kind,
        days: days.to_vec(),
        dependencies: deps.iter().map(|d| (*d).to_owned()).collect(),
        ..NewActivity::default()
    }
}

pub(crate) fn open_store(config: &TrackerConfig) -> ActivityStore {
    ActivityStore::open(config.storage.activities_path()).expect("open activity store")
}

/// Fresh snapshot of both files, the way the CLI builds one per command.
pub(crate) fn open_tracker(config: &TrackerConfig) -> Tracker<JsonlLedger> {
    let store = open_store(config);
    let ledger = JsonlLedger::open(config.storage.ledger_path()).expect("open ledger");
    Tracker::new(store.into_activities(), ledger)
}
