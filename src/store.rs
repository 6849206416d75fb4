//! Activity table persistence.
//!
//! The whole collection is read into memory and written back as a unit on
//! every mutation. The table lives in a single JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::activity::{Activity, Recurrence, ScheduleKind};
use crate::error::{Result, TrackerError};

/// Highest weekday index (Sunday).
const MAX_WEEKDAY: u8 = 6;
/// Highest day-of-month.
const MAX_MONTH_DAY: u8 = 31;

/// Persisted activity table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ActivityTable {
    /// Schema version.
    #[serde(default = "default_table_version")]
    version: u8,
    #[serde(default)]
    activities: Vec<Activity>,
}

fn default_table_version() -> u8 {
    1
}

/// Input for creating an activity.
#[derive(Debug, Clone, Default)]
pub struct NewActivity {
    pub name: String,
    pub description: Option<String>,
    pub schedule_kind: ScheduleKind,
    /// Weekday indices (weekly/custom) or days of month (monthly). Ignored
    /// for daily schedules; empty means "not specified".
    pub days: Vec<u8>,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
}

/// In-place edit of an existing activity. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ActivityEdit {
    pub name: Option<String>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub dependencies: Option<Vec<String>>,
}

/// Activity collection bound to an optional JSON file.
#[derive(Debug, Clone)]
pub struct ActivityStore {
    path: Option<PathBuf>,
    activities: Vec<Activity>,
}

impl ActivityStore {
    /// Load the table at `path`; a missing file is an empty table.
    ///
    /// Blank ids and missing recurrences are filled and written back so ids
    /// stay stable across loads.
    pub fn open(path: PathBuf) -> Result<Self> {
        let mut activities = load_table(&path)?;
        let mut changed = false;
        for activity in &mut activities {
            changed |= activity.normalize();
        }

        let store = Self {
            path: Some(path),
            activities,
        };
        if changed {
            info!("filled missing activity fields, rewriting table");
            store.save()?;
        }
        Ok(store)
    }

    /// A store that never touches disk.
    pub fn in_memory(mut activities: Vec<Activity>) -> Self {
        for activity in &mut activities {
            activity.normalize();
        }
        Self {
            path: None,
            activities,
        }
    }

    /// Current activities, in table order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Consume the store, returning the activity snapshot.
    pub fn into_activities(self) -> Vec<Activity> {
        self.activities
    }

    /// Find an activity by id, then by exact name.
    pub fn find(&self, key: &str) -> Option<&Activity> {
        find_activity(&self.activities, key)
    }

    /// Create an activity and persist the table.
    pub fn add(&mut self, new: NewActivity) -> Result<Activity> {
        let name = new.name.trim().to_owned();
        if name.is_empty() {
            return Err(TrackerError::InvalidInput(
                "activity name must not be empty".to_owned(),
            ));
        }
        if self.activities.iter().any(|a| a.name == name) {
            warn!("another activity is already named '{name}'");
        }
        let dependencies = self.checked_dependencies(&new.dependencies, None)?;
        let recurrence = build_recurrence(new.schedule_kind, &new.days)?;

        let mut activity = Activity::new(name, new.schedule_kind);
        activity.description = non_blank(new.description);
        activity.recurrence = Some(recurrence);
        activity.tags = clean_labels(new.tags);
        activity.dependencies = dependencies;

        self.activities.push(activity.clone());
        self.save()?;
        info!("added activity '{}' ({})", activity.name, activity.id);
        Ok(activity)
    }

    /// Edit name, description, tags, or dependencies in place.
    ///
    /// A dependency on the activity itself is dropped.
    pub fn update(&mut self, id: &str, edit: ActivityEdit) -> Result<Activity> {
        let index = self
            .activities
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| TrackerError::ActivityNotFound(id.to_owned()))?;

        let dependencies = match &edit.dependencies {
            Some(names) => Some(self.checked_dependencies(names, Some(id))?),
            None => None,
        };

        let activity = &mut self.activities[index];
        if let Some(name) = edit.name {
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(TrackerError::InvalidInput(
                    "activity name must not be empty".to_owned(),
                ));
            }
            activity.name = name;
        }
        if let Some(description) = edit.description {
            activity.description = non_blank(Some(description));
        }
        if let Some(tags) = edit.tags {
            activity.tags = clean_labels(tags);
        }
        if let Some(dependencies) = dependencies {
            activity.dependencies = dependencies;
        }

        let updated = activity.clone();
        self.save()?;
        info!("updated activity '{}' ({})", updated.name, updated.id);
        Ok(updated)
    }

    /// Delete an activity by id. Returns `true` if it existed.
    ///
    /// Dependencies naming the removed activity are left in place and
    /// stop constraining anything.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != id);
        let removed = self.activities.len() != before;
        if removed {
            self.save()?;
            info!("removed activity {id}");
        }
        Ok(removed)
    }

    /// Write the whole table back to disk.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        save_table(path, &self.activities)
    }

    fn checked_dependencies(&self, names: &[String], own_id: Option<&str>) -> Result<Vec<String>> {
        let own_name = own_id.and_then(|id| self.activities.iter().find(|a| a.id == id));
        let mut checked = Vec::new();
        for name in clean_labels(names.to_vec()) {
            if own_name.is_some_and(|own| own.name == name) {
                debug!("dropping self-dependency on '{name}'");
                continue;
            }
            if !self.activities.iter().any(|a| a.name == name) {
                return Err(TrackerError::UnknownDependency(name));
            }
            if !checked.contains(&name) {
                checked.push(name);
            }
        }
        Ok(checked)
    }
}

/// Find an activity by id, then by exact name.
pub fn find_activity<'a>(activities: &'a [Activity], key: &str) -> Option<&'a Activity> {
    activities
        .iter()
        .find(|a| a.id == key)
        .or_else(|| activities.iter().find(|a| a.name == key))
}

fn build_recurrence(kind: ScheduleKind, days: &[u8]) -> Result<Recurrence> {
    let max = match kind {
        ScheduleKind::Daily => return Ok(Recurrence::from_schedule(kind)),
        ScheduleKind::Weekly | ScheduleKind::Custom => MAX_WEEKDAY,
        ScheduleKind::Monthly => MAX_MONTH_DAY,
    };
    let min = if kind == ScheduleKind::Monthly { 1 } else { 0 };
    if let Some(bad) = days.iter().find(|d| **d < min || **d > max) {
        return Err(TrackerError::InvalidInput(format!(
            "day {bad} is out of range {min}..={max} for a {kind} schedule"
        )));
    }
    if days.is_empty() {
        Ok(Recurrence::from_schedule(kind))
    } else {
        Ok(Recurrence::on_days(kind.recurrence_kind(), days.iter().copied()))
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}

fn clean_labels(labels: Vec<String>) -> Vec<String> {
    labels
        .into_iter()
        .map(|l| l.trim().to_owned())
        .filter(|l| !l.is_empty())
        .collect()
}

fn load_table(path: &Path) -> Result<Vec<Activity>> {
    let bytes = match std::fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no activity table at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(TrackerError::Store(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    let table: ActivityTable = serde_json::from_slice(&bytes)
        .map_err(|e| TrackerError::Store(format!("cannot parse {}: {e}", path.display())))?;
    debug!(
        "loaded {} activities (table v{}) from {}",
        table.activities.len(),
        table.version,
        path.display()
    );
    Ok(table.activities)
}

fn save_table(path: &Path, activities: &[Activity]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| TrackerError::Store(format!("cannot create data dir: {e}")))?;
    }

    let table = ActivityTable {
        version: default_table_version(),
        activities: activities.to_vec(),
    };
    let json = serde_json::to_string_pretty(&table)
        .map_err(|e| TrackerError::Store(format!("cannot serialize activities: {e}")))?;

    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, json)
        .map_err(|e| TrackerError::Store(format!("cannot write activities: {e}")))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| TrackerError::Store(format!("cannot finalize activities: {e}")))?;
    Ok(())
}
