use crate::helpers::{day, new_activity, open_store, open_tracker, temp_config};
use chrono::Utc;
use sukhii::schedule::{can_complete, is_overdue};
use sukhii::{AgendaFilter, CompletionLedger, CompletionNote, ScheduleKind, TrackerError};

#[test]
fn overdue_completion_backfills_and_persists() {
    let (config, _dir) = temp_config();
    let mut store = open_store(&config);
    let sweep = store
        .add(new_activity("Sweep stairs", ScheduleKind::Daily, &[], &[]))
        .expect("add");

    let mut tracker = open_tracker(&config);
    tracker
        .complete("Sweep stairs", &CompletionNote::by("caretaker"), day(2024, 1, 1), Utc::now())
        .expect("first completion");
    let written = tracker
        .complete(&sweep.id, &CompletionNote::by("caretaker"), day(2024, 1, 5), Utc::now())
        .expect("late completion");
    assert_eq!(written.iter().filter(|e| e.was_backfilled).count(), 3);

    let reopened = open_tracker(&config);
    assert!(!is_overdue(&sweep.id, reopened.ledger(), day(2024, 1, 5)));
    assert!(is_overdue(&sweep.id, reopened.ledger(), day(2024, 1, 6)));
    let history = reopened.history(&sweep.id, 10).expect("history");
    let dates: Vec<_> = history.iter().map(|e| e.date).collect();
    assert_eq!(
        dates,
        vec![
            day(2024, 1, 5),
            day(2024, 1, 4),
            day(2024, 1, 3),
            day(2024, 1, 2),
            day(2024, 1, 1)
        ]
    );
    assert!(history.iter().all(|e| e.user == "caretaker"));
}

#[test]
fn dependency_gate_blocks_until_prerequisite_done_today() {
    let (config, _dir) = temp_config();
    let mut store = open_store(&config);
    store
        .add(new_activity("Switch off pump", ScheduleKind::Daily, &[], &[]))
        .expect("add pump");
    let tank = store
        .add(new_activity(
            "Clean tank",
            ScheduleKind::Weekly,
            &[0],
            &["Switch off pump"],
        ))
        .expect("add tank");

    // 2024-01-01 is a Monday.
    let today = day(2024, 1, 1);
    let mut tracker = open_tracker(&config);
    let err = tracker
        .complete("Clean tank", &CompletionNote::default(), today, Utc::now())
        .expect_err("blocked");
    assert!(matches!(err, TrackerError::DependenciesPending { .. }));
    assert!(tracker.ledger().entries_for(&tank.id).is_empty());

    tracker
        .complete("Switch off pump", &CompletionNote::default(), today, Utc::now())
        .expect("pump");
    assert!(can_complete(
        tracker.find("Clean tank").expect("tank"),
        tracker.activities(),
        tracker.ledger(),
        today
    ));
    tracker
        .complete("Clean tank", &CompletionNote::default(), today, Utc::now())
        .expect("tank");

    let err = tracker
        .complete("Clean tank", &CompletionNote::default(), today, Utc::now())
        .expect_err("already done");
    assert!(matches!(err, TrackerError::AlreadyCompleted { .. }));
}

#[test]
fn agenda_reflects_fresh_snapshot() {
    let (config, _dir) = temp_config();
    let mut store = open_store(&config);
    store
        .add(new_activity("Fire drill", ScheduleKind::Monthly, &[15], &[]))
        .expect("add drill");
    store
        .add(new_activity("Water plants", ScheduleKind::Custom, &[2, 5], &[]))
        .expect("add plants");

    // Never completed: both are overdue on any date.
    let today = day(2024, 3, 15);
    let agenda = open_tracker(&config).agenda(today, &AgendaFilter::default());
    assert_eq!(agenda.len(), 2);
    assert!(agenda.iter().all(|item| item.status.overdue));

    let mut tracker = open_tracker(&config);
    tracker
        .complete("Fire drill", &CompletionNote::default(), today, Utc::now())
        .expect("drill");
    tracker
        .complete("Water plants", &CompletionNote::default(), today, Utc::now())
        .expect("plants");

    // 2024-03-16 is a Saturday: plants fire on Wed/Sat, drill is only overdue.
    let next = day(2024, 3, 16);
    let agenda = open_tracker(&config).agenda(next, &AgendaFilter::default());
    let names: Vec<_> = agenda.iter().map(|i| i.activity.name.as_str()).collect();
    assert_eq!(names, vec!["Fire drill", "Water plants"]);
    let overdue_only = open_tracker(&config).agenda(
        next,
        &AgendaFilter {
            overdue_only: true,
            schedule: Some(ScheduleKind::Custom),
            ..AgendaFilter::default()
        },
    );
    assert_eq!(overdue_only.len(), 1);
    assert!(overdue_only[0].status.scheduled_today);
}

#[test]
fn deleting_a_dependency_releases_the_gate() {
    let (config, _dir) = temp_config();
    let mut store = open_store(&config);
    let pump = store
        .add(new_activity("Switch off pump", ScheduleKind::Daily, &[], &[]))
        .expect("add pump");
    store
        .add(new_activity("Clean tank", ScheduleKind::Daily, &[], &["Switch off pump"]))
        .expect("add tank");
    assert!(store.remove(&pump.id).expect("remove"));

    let mut tracker = open_tracker(&config);
    tracker
        .complete("Clean tank", &CompletionNote::default(), day(2024, 5, 1), Utc::now())
        .expect("no longer gated");
    let edges = tracker.dependency_edges();
    assert_eq!(edges.len(), 1);
    assert!(!edges[0].resolved);
}
