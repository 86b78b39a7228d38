use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::consts::DATE_FORMAT;
use crate::core::DateRange;
use crate::error::AppError;

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// UTC instant range covering whole days; `until` runs to the end of its day
pub(crate) fn day_range(since: Option<NaiveDate>, until: Option<NaiveDate>) -> DateRange {
    let start = since.map(|d| d.and_time(NaiveTime::MIN).and_utc());
    let end = until.and_then(end_of_day);
    DateRange::new(start, end)
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
    Some(date.and_time(last).and_utc())
}

/// Parse an RFC 3339 / ISO-8601 instant, also accepting a bare date
pub(crate) fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}
