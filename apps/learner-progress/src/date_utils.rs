//! Date utilities for daily reset hour handling.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};

/// Start of the current study day in `tz`.
///
/// A study day begins at `daily_reset_hour` local time. Before that hour the
/// previous study day is still running, so late-night reviews count towards it.
pub fn study_day_start<Tz: TimeZone>(
    now: DateTime<Utc>,
    tz: &Tz,
    daily_reset_hour: u32,
) -> DateTime<Utc> {
    let reset_hour = daily_reset_hour.min(23);
    let local = now.with_timezone(tz);

    let mut date = local.date_naive();
    if local.hour() < reset_hour {
        date = date.pred_opt().unwrap_or(date);
    }

    let Some(start) = date.and_hms_opt(reset_hour, 0, 0) else {
        return now - Duration::days(1);
    };
    match tz.from_local_datetime(&start).earliest() {
        Some(local_start) => local_start.with_timezone(&Utc),
        // Reset hour skipped by a DST transition
        None => start.and_utc(),
    }
}
