use crate::helpers::{day, temp_config};
use chrono::Utc;
use sukhii::schedule::is_overdue;
use sukhii::{CompletionLedger, CompletionNote, JsonlLedger, LedgerEntry};

fn entry(id: &str, y: i32, m: u32, d: u32) -> LedgerEntry {
    LedgerEntry::completed(id, day(y, m, d), &CompletionNote::default(), Utc::now(), false)
}

#[test]
fn appended_entries_survive_reopen() {
    let (config, _dir) = temp_config();
    let path = config.storage.ledger_path();

    let mut ledger = JsonlLedger::open(path.clone()).expect("open");
    ledger
        .append(vec![entry("a", 2024, 1, 1), entry("a", 2024, 1, 2)])
        .expect("append");
    ledger.append(vec![entry("b", 2024, 1, 2)]).expect("append");

    let reopened = JsonlLedger::open(path).expect("reopen");
    assert_eq!(reopened.entries().len(), 3);
    assert_eq!(reopened.entries_for("a").len(), 2);
    assert!(reopened.has_entry_on("b", day(2024, 1, 2)));
}

#[test]
fn malformed_lines_do_not_hide_good_entries() {
    let (config, _dir) = temp_config();
    let path = config.storage.ledger_path();
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");

    let good = serde_json::to_string(&entry("a", 2024, 2, 1)).expect("encode");
    std::fs::write(&path, format!("{good}\n{{truncated\n\n{good}\n")).expect("write");

    let ledger = JsonlLedger::open(path).expect("open");
    assert_eq!(ledger.entries().len(), 2);
    assert!(!is_overdue("a", &ledger, day(2024, 2, 1)));
}

#[test]
fn archive_moves_only_entries_before_cutoff() {
    let (config, _dir) = temp_config();
    let live = config.storage.ledger_path();
    let archive = config.storage.archive_path();

    let mut ledger = JsonlLedger::open(live.clone()).expect("open");
    ledger
        .append(vec![
            entry("a", 2023, 12, 30),
            entry("a", 2023, 12, 31),
            entry("a", 2024, 1, 1),
            entry("b", 2024, 1, 2),
        ])
        .expect("append");

    let moved = ledger
        .archive_before(day(2024, 1, 1), &archive)
        .expect("archive");
    assert_eq!(moved, 2);
    assert_eq!(ledger.entries().len(), 2);

    let live_again = JsonlLedger::open(live).expect("reopen live");
    let dates: Vec<_> = live_again.entries().iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![day(2024, 1, 1), day(2024, 1, 2)]);

    let archived = JsonlLedger::open(archive.clone()).expect("open archive");
    assert_eq!(archived.entries().len(), 2);
    assert!(archived.entries().iter().all(|e| e.date < day(2024, 1, 1)));

    assert_eq!(
        ledger
            .archive_before(day(2024, 1, 1), &archive)
            .expect("second archive"),
        0
    );
}
