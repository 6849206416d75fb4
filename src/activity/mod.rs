//! Activity definitions and their recurrence rules.

mod legacy;
pub mod recurrence_text;
pub mod types;

pub use recurrence_text::RecurrenceTextError;
pub use types::{
    Activity, Recurrence, RecurrenceKind, ScheduleKind, WEEKDAY_LABELS, new_activity_id,
    split_labels,
};
