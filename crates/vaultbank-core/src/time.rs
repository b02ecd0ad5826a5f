//! Timestamp parsing and calendar boundaries
//!
//! All calendar arithmetic is done in UTC, which is what the backend
//! stamps `createdAt` with.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2024-01-05T10:00:00.000Z`), a naive ISO date-time
/// (taken as UTC) or a bare `YYYY-MM-DD` date (taken as UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    parse_date_input(raw).map(start_of_day)
}

/// Parse a date typed by the user (`YYYY-MM-DD`, or a full timestamp whose date part is used)
pub fn parse_date_input(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if raw.len() > 10 && raw.is_char_boundary(10) {
        return NaiveDate::parse_from_str(&raw[..10], "%Y-%m-%d").ok();
    }
    None
}

/// 00:00:00.000 on the given day
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// 23:59:59.999 on the given day, so same-day timestamps fall inside a range
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(last_milli))
}

/// First instant of the calendar month containing `now`
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    start_of_day(today.with_day(1).unwrap_or(today))
}
