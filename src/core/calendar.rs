use crate::domain::model::{DayEntry, WeekDay};
use crate::utils::error::{PlannerError, Result};
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// Expands a delivery calendar from `start`.
///
/// Walks forward one calendar day at a time, marking every day whose
/// weekday is in `skipped_weekdays` as skipped, until `day_count`
/// non-skipped days have been emitted. Skipped days are kept in the
/// output but do not count towards `day_count`.
pub fn expand(start: NaiveDate, day_count: u32, skipped_weekdays: &[WeekDay]) -> Result<Vec<DayEntry>> {
    let skipped: HashSet<WeekDay> = skipped_weekdays.iter().copied().collect();

    if day_count > 0 && skipped.len() == WeekDay::ALL.len() {
        return Err(PlannerError::invalid_argument(
            "all seven weekdays are skipped, no delivery day can be planned",
        ));
    }

    // the last delivery day lies at least `day_count - 1` days after start
    let min_span = Days::new(u64::from(day_count.saturating_sub(1)));
    if start.checked_add_days(min_span).is_none() {
        return Err(PlannerError::DateOutOfRange { date: NaiveDate::MAX });
    }

    let mut entries = Vec::new();
    let mut cursor = start;
    let mut added_days = 0;

    while added_days < day_count {
        let is_skipped = skipped.contains(&WeekDay::of(cursor));
        entries.push(DayEntry {
            date: cursor,
            is_skipped,
        });

        if !is_skipped {
            added_days += 1;
        }

        if added_days < day_count {
            cursor = cursor
                .succ_opt()
                .ok_or(PlannerError::DateOutOfRange { date: cursor })?;
        }
    }

    tracing::trace!(
        "expanded {} delivery days from {} into {} calendar days",
        day_count,
        start,
        entries.len()
    );

    Ok(entries)
}

/// Converts an untrusted signed day count into the planner's unsigned one.
pub fn day_count_from_i64(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        PlannerError::invalid_argument(format!("day count must be between 0 and {}, got {}", u32::MAX, value))
    })
}

/// Customer orders may not start in the past.
pub fn validate_start_date(start: NaiveDate, today: NaiveDate) -> Result<()> {
    if start < today {
        return Err(PlannerError::invalid_argument(format!(
            "order start date {} is before today ({})",
            start, today
        )));
    }
    Ok(())
}
