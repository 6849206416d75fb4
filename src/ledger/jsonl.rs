//! File-backed ledger stored as JSON lines.
//!
//! The whole file is read into memory on open; appends go to the end of the
//! file and to the in-memory snapshot. One line per [`LedgerEntry`].

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::{CompletionLedger, LedgerEntry};
use crate::error::{Result, TrackerError};

/// JSON-lines ledger bound to a file path.
#[derive(Debug)]
pub struct JsonlLedger {
    path: PathBuf,
    entries: Vec<LedgerEntry>,
}

impl JsonlLedger {
    /// Open the ledger at `path`, loading existing entries.
    ///
    /// A missing file is an empty ledger. Malformed lines are skipped.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = read_entries(&path)?;
        tracing::debug!("loaded {} ledger entries from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    /// Every loaded entry, in file order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Re-read the file, discarding the in-memory snapshot.
    ///
    /// Picks up entries appended through other handles since `open`.
    pub fn reload(&mut self) -> Result<()> {
        self.entries = read_entries(&self.path)?;
        Ok(())
    }

    /// Move entries dated before `cutoff` into the archive file.
    ///
    /// Archived entries are appended to `archive_path`, then the live file is
    /// rewritten without them. Returns the number of entries moved.
    ///
    /// Entries already present in the archive are not appended again, so a
    /// retry after a failed rewrite leaves no duplicates behind.
    pub fn archive_before(&mut self, cutoff: NaiveDate, archive_path: &Path) -> Result<usize> {
        let (old, keep): (Vec<LedgerEntry>, Vec<LedgerEntry>) = self
            .entries
            .iter()
            .cloned()
            .partition(|entry| entry.date < cutoff);

        if old.is_empty() {
            return Ok(0);
        }

        let archived = read_entries(archive_path)?;
        let fresh: Vec<LedgerEntry> = old
            .iter()
            .filter(|entry| !archived.contains(entry))
            .cloned()
            .collect();
        if fresh.len() < old.len() {
            tracing::debug!(
                "{} entries already archived in {}",
                old.len() - fresh.len(),
                archive_path.display()
            );
        }
        if !fresh.is_empty() {
            append_lines(archive_path, &encode_lines(&fresh)?)?;
        }
        rewrite_file(&self.path, &encode_lines(&keep)?)?;

        let moved = old.len();
        self.entries = keep;
        tracing::info!(
            "archived {moved} ledger entries dated before {cutoff} to {}",
            archive_path.display()
        );
        Ok(moved)
    }
}

impl CompletionLedger for JsonlLedger {
    fn entries_for(&self, activity_id: &str) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.activity_id == activity_id)
            .cloned()
            .collect()
    }

    fn append(&mut self, entries: Vec<LedgerEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        // Encode everything before touching the file.
        let buffer = encode_lines(&entries)?;
        append_lines(&self.path, &buffer)?;

        tracing::debug!(
            "appended {} ledger entries to {}",
            entries.len(),
            self.path.display()
        );
        self.entries.extend(entries);
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Vec<LedgerEntry>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(TrackerError::Ledger(format!(
                "failed to read ledger {}: {e}",
                path.display()
            )));
        }
    };

    let mut entries = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<LedgerEntry>(trimmed) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(
                    "ignoring malformed ledger line {} in {}: {e}",
                    index + 1,
                    path.display()
                );
            }
        }
    }
    Ok(entries)
}

fn encode_lines(entries: &[LedgerEntry]) -> Result<String> {
    let mut buffer = String::new();
    for entry in entries {
        let json = serde_json::to_string(entry)
            .map_err(|e| TrackerError::Ledger(format!("failed to encode ledger entry: {e}")))?;
        buffer.push_str(&json);
        buffer.push('\n');
    }
    Ok(buffer)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            TrackerError::Ledger(format!("failed to create ledger directory: {e}"))
        })?;
    }
    Ok(())
}

fn append_lines(path: &Path, buffer: &str) -> Result<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TrackerError::Ledger(format!("failed to open {}: {e}", path.display())))?;
    file.write_all(buffer.as_bytes())
        .map_err(|e| TrackerError::Ledger(format!("failed to append to {}: {e}", path.display())))?;
    Ok(())
}

fn rewrite_file(path: &Path, buffer: &str) -> Result<()> {
    ensure_parent(path)?;
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, buffer)
        .map_err(|e| TrackerError::Ledger(format!("failed to write ledger temp file: {e}")))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| TrackerError::Ledger(format!("failed to finalize ledger file: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::ledger::CompletionNote;
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: &str, date: NaiveDate) -> LedgerEntry {
        LedgerEntry::completed(id, date, &CompletionNote::by("NA"), Utc::now(), false)
    }

    #[test]
    fn missing_file_opens_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let ledger = JsonlLedger::open(temp.path().join("ledger.jsonl")).unwrap();
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn append_persists_across_reopen() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("ledger.jsonl");

        let mut ledger = JsonlLedger::open(path.clone()).unwrap();
        ledger
            .append(vec![entry("a", day(2024, 1, 1)), entry("a", day(2024, 1, 2))])
            .unwrap();
        assert_eq!(ledger.entries_for("a").len(), 2);

        let reopened = JsonlLedger::open(path).unwrap();
        assert_eq!(reopened.entries().len(), 2);
        assert_eq!(reopened.entries()[1].date, day(2024, 1, 2));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("ledger.jsonl");
        let good = serde_json::to_string(&entry("a", day(2024, 5, 5))).unwrap();
        std::fs::write(&path, format!("{good}\nnot json\n\n{{\"date\": 1}}\n")).unwrap();

        let ledger = JsonlLedger::open(path).unwrap();
        assert_eq!(ledger.entries().len(), 1);
    }

    #[test]
    fn archive_moves_only_old_entries() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("ledger.jsonl");
        let archive = temp.path().join("ledger.archive.jsonl");

        let mut ledger = JsonlLedger::open(path.clone()).unwrap();
        ledger
            .append(vec![
                entry("a", day(2024, 1, 1)),
                entry("a", day(2024, 2, 1)),
                entry("b", day(2024, 3, 1)),
            ])
            .unwrap();

        let moved = ledger.archive_before(day(2024, 2, 1), &archive).unwrap();
        assert_eq!(moved, 1);
        assert_eq!(ledger.entries().len(), 2);

        let live = JsonlLedger::open(path).unwrap();
        assert_eq!(live.entries().len(), 2);
        let archived = JsonlLedger::open(archive.clone()).unwrap();
        assert_eq!(archived.entries().len(), 1);
        assert_eq!(archived.entries()[0].date, day(2024, 1, 1));

        assert_eq!(ledger.archive_before(day(2024, 2, 1), &archive).unwrap(), 0);
    }

    #[test]
    fn archive_retry_after_failed_rewrite_does_not_duplicate() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("ledger.jsonl");
        let archive = temp.path().join("ledger.archive.jsonl");

        let mut ledger = JsonlLedger::open(path.clone()).unwrap();
        ledger
            .append(vec![entry("a", day(2024, 1, 1)), entry("a", day(2024, 3, 1))])
            .unwrap();

        // A directory where the temp file should go makes the rewrite fail.
        let blocker = path.with_extension("tmp");
        std::fs::create_dir(&blocker).unwrap();
        assert!(matches!(
            ledger.archive_before(day(2024, 2, 1), &archive),
            Err(TrackerError::Ledger(_))
        ));
        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(JsonlLedger::open(path.clone()).unwrap().entries().len(), 2);

        std::fs::remove_dir(&blocker).unwrap();
        assert_eq!(ledger.archive_before(day(2024, 2, 1), &archive).unwrap(), 1);

        let archived = JsonlLedger::open(archive).unwrap();
        assert_eq!(archived.entries().len(), 1);
        let live = JsonlLedger::open(path).unwrap();
        assert_eq!(live.entries().len(), 1);
        assert_eq!(live.entries()[0].date, day(2024, 3, 1));
    }

    #[test]
    fn reload_sees_entries_appended_through_another_handle() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("ledger.jsonl");

        let mut reader = JsonlLedger::open(path.clone()).unwrap();
        let mut writer = JsonlLedger::open(path).unwrap();
        writer.append(vec![entry("a", day(2024, 4, 1))]).unwrap();
        assert!(reader.entries().is_empty());

        reader.reload().unwrap();
        assert!(reader.has_entry_on("a", day(2024, 4, 1)));
    }
}
