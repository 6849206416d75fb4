//! Recurrence matcher.

use chrono::{Datelike, NaiveDate};

use crate::activity::{Recurrence, RecurrenceKind};

/// Day of month a monthly rule fires on when no days are given.
pub const DEFAULT_MONTHLY_DAY: u8 = 1;

/// Returns `true` if the rule schedules an occurrence on `today`.
///
/// - daily: always
/// - weekly / custom: today's weekday (Monday = 0) is listed; no days listed
///   never matches
/// - monthly: today's day of month is listed; absent days means the 1st
/// - unrecognized kind or no rule: never
pub fn matches(recurrence: Option<&Recurrence>, today: NaiveDate) -> bool {
    let Some(rec) = recurrence else {
        return false;
    };

    match rec.kind {
        RecurrenceKind::Daily => true,
        RecurrenceKind::Weekly | RecurrenceKind::Custom => {
            let weekday = today.weekday().num_days_from_monday();
            rec.days
                .as_ref()
                .is_some_and(|days| days.iter().any(|d| u32::from(*d) == weekday))
        }
        RecurrenceKind::Monthly => {
            let day = today.day();
            match &rec.days {
                Some(days) => days.iter().any(|d| u32::from(*d) == day),
                None => day == u32::from(DEFAULT_MONTHLY_DAY),
            }
        }
        RecurrenceKind::Unrecognized => false,
    }
}
