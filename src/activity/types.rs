//! Activity and recurrence definitions.
//!
//! Defines the [`Activity`] record, the [`ScheduleKind`] users pick when
//! creating one, and the structured [`Recurrence`] rule the matcher reads.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::legacy;
use crate::error::TrackerError;

/// Short weekday labels indexed Monday = 0.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Schedule category chosen when an activity is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// Every day.
    #[default]
    Daily,
    /// Selected weekdays.
    Weekly,
    /// Selected days of the month.
    Monthly,
    /// Selected weekdays, user-labelled as a custom rhythm.
    Custom,
}

impl ScheduleKind {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }

    /// The recurrence kind an activity of this schedule is created with.
    pub fn recurrence_kind(self) -> RecurrenceKind {
        match self {
            Self::Daily => RecurrenceKind::Daily,
            Self::Weekly => RecurrenceKind::Weekly,
            Self::Monthly => RecurrenceKind::Monthly,
            Self::Custom => RecurrenceKind::Custom,
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "custom" => Ok(Self::Custom),
            other => Err(TrackerError::InvalidInput(format!(
                "unknown schedule `{other}` (use daily|weekly|monthly|custom)"
            ))),
        }
    }
}

/// Kind of a recurrence rule.
///
/// Unknown names decode to [`RecurrenceKind::Unrecognized`] rather than
/// failing, and never match any date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    Custom,
    #[serde(other)]
    Unrecognized,
}

impl RecurrenceKind {
    /// Decode a kind name, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "custom" => Self::Custom,
            _ => Self::Unrecognized,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
            Self::Unrecognized => "unrecognized",
        }
    }
}

fn default_recurrence_kind() -> RecurrenceKind {
    RecurrenceKind::Daily
}

/// Structured recurrence rule: a kind plus an optional set of day numbers.
///
/// `days` holds weekday indices (Monday = 0 .. Sunday = 6) for weekly and
/// custom rules, or days of the month (1..=31) for monthly rules. `None`
/// means "not specified", which is distinct from an explicitly empty set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(rename = "type", alias = "kind", default = "default_recurrence_kind")]
    pub kind: RecurrenceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<BTreeSet<u8>>,
}

impl Recurrence {
    /// A rule of the given kind with no days specified.
    pub fn new(kind: RecurrenceKind) -> Self {
        Self { kind, days: None }
    }

    /// A rule of the given kind firing on the given day numbers.
    pub fn on_days(kind: RecurrenceKind, days: impl IntoIterator<Item = u8>) -> Self {
        Self {
            kind,
            days: Some(days.into_iter().collect()),
        }
    }

    /// The rule an activity gets when only its schedule kind is known.
    pub fn from_schedule(kind: ScheduleKind) -> Self {
        Self::new(kind.recurrence_kind())
    }

    /// Decode the legacy textual encoding, e.g. `{'type': 'weekly', 'days': [0, 2]}`.
    ///
    /// See [`super::recurrence_text`] for the accepted grammar.
    pub fn parse_text(text: &str) -> Result<Self, super::RecurrenceTextError> {
        super::recurrence_text::parse_recurrence_text(text)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        let Some(days) = &self.days else {
            return Ok(());
        };
        match self.kind {
            RecurrenceKind::Weekly | RecurrenceKind::Custom => {
                let labels: Vec<&str> = days
                    .iter()
                    .map(|d| WEEKDAY_LABELS.get(usize::from(*d)).copied().unwrap_or("?"))
                    .collect();
                write!(f, " on {}", labels.join(", "))
            }
            RecurrenceKind::Monthly => {
                let labels: Vec<String> = days.iter().map(u8::to_string).collect();
                write!(f, " on day {}", labels.join(", "))
            }
            RecurrenceKind::Daily | RecurrenceKind::Unrecognized => Ok(()),
        }
    }
}

/// A recurring maintenance activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Opaque unique identifier; filled with a fresh UUID when blank.
    #[serde(default)]
    pub id: String,
    /// Display name. Dependencies refer to activities by this name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Schedule category chosen at creation.
    #[serde(rename = "schedule", default)]
    pub schedule_kind: ScheduleKind,
    /// Recurrence rule. Legacy tables may store this as text.
    #[serde(default, deserialize_with = "legacy::recurrence")]
    pub recurrence: Option<Recurrence>,
    /// Informational labels.
    #[serde(default, deserialize_with = "legacy::label_list")]
    pub tags: Vec<String>,
    /// Names of activities that must be completed today first.
    #[serde(default, deserialize_with = "legacy::label_list")]
    pub dependencies: Vec<String>,
}

impl Activity {
    /// Create an activity with a fresh id and the schedule's default rule.
    pub fn new(name: impl Into<String>, schedule_kind: ScheduleKind) -> Self {
        Self {
            id: new_activity_id(),
            name: name.into(),
            description: None,
            schedule_kind,
            recurrence: Some(Recurrence::from_schedule(schedule_kind)),
            tags: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Fill a blank id and a missing recurrence.
    ///
    /// Returns `true` when anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        if self.id.trim().is_empty() {
            self.id = new_activity_id();
            changed = true;
        }
        if self.recurrence.is_none() {
            self.recurrence = Some(Recurrence::from_schedule(self.schedule_kind));
            changed = true;
        }
        changed
    }

    /// Case-insensitive substring match on name or description.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }
}

/// Generate a new opaque activity id.
pub fn new_activity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Split a comma-separated label string, trimming and dropping blanks.
pub fn split_labels(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
