use crate::helpers::{day, open_tracker, temp_config};
use sukhii::schedule::matches;
use sukhii::{ActivityStore, AgendaFilter, Recurrence, RecurrenceKind, ScheduleKind};

const LEGACY_TABLE: &str = r#"{
  "activities": [
    {
      "id": "",
      "name": "Clean filters",
      "schedule": "weekly",
      "recurrence": "{'type': 'weekly', 'days': [0, 3]}",
      "tags": "hvac, monthly-check",
      "dependencies": ""
    },
    {
      "id": "meter",
      "name": "Read meter",
      "schedule": "monthly",
      "recurrence": "__import__('os').system('true')"
    },
    {
      "id": "odd",
      "name": "Odd rule",
      "schedule": "daily",
      "recurrence": {"type": "fortnightly", "days": [1]}
    }
  ]
}"#;

#[test]
fn legacy_rows_load_with_structured_recurrence() {
    let (config, _dir) = temp_config();
    let path = config.storage.activities_path();
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, LEGACY_TABLE).expect("write table");

    let store = ActivityStore::open(path.clone()).expect("open");
    let filters = store.find("Clean filters").expect("filters");
    assert!(!filters.id.is_empty());
    assert_eq!(
        filters.recurrence,
        Some(Recurrence::on_days(RecurrenceKind::Weekly, [0, 3]))
    );
    assert_eq!(filters.tags, vec!["hvac".to_owned(), "monthly-check".to_owned()]);
    assert!(filters.dependencies.is_empty());

    // Non-mapping text is never evaluated; the schedule kind stands in.
    let meter = store.find("meter").expect("meter");
    assert_eq!(meter.schedule_kind, ScheduleKind::Monthly);
    assert_eq!(meter.recurrence, Some(Recurrence::new(RecurrenceKind::Monthly)));
    assert!(matches(meter.recurrence.as_ref(), day(2024, 6, 1)));
    assert!(!matches(meter.recurrence.as_ref(), day(2024, 6, 2)));

    let odd = store.find("odd").expect("odd");
    assert_eq!(
        odd.recurrence.as_ref().map(|r| r.kind),
        Some(RecurrenceKind::Unrecognized)
    );
    assert!(!matches(odd.recurrence.as_ref(), day(2024, 6, 3)));

    // The filled id was written back and is stable.
    let again = ActivityStore::open(path).expect("reopen");
    assert_eq!(
        again.find("Clean filters").map(|a| a.id.clone()),
        Some(filters.id.clone())
    );
}

#[test]
fn unrecognized_rule_still_shows_as_overdue() {
    let (config, _dir) = temp_config();
    let path = config.storage.activities_path();
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, LEGACY_TABLE).expect("write table");

    let tracker = open_tracker(&config);
    let agenda = tracker.agenda(day(2024, 6, 3), &AgendaFilter::default());
    let odd = agenda
        .iter()
        .find(|item| item.activity.id == "odd")
        .expect("odd listed");
    assert!(odd.status.overdue);
    assert!(!odd.status.scheduled_today);
}
