//! Day bucketing with a configurable day boundary
//!
//! A "day" starts `offset_hours` after UTC midnight. With the default noon
//! boundary, a night of running that crosses midnight lands in one bucket.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::consts::{DATE_FORMAT, DEFAULT_DAY_BOUNDARY_HOURS};
use crate::core::types::DerivedSession;

/// Sessions per day label; iterates in ascending (chronological) label order
pub(crate) type DayBuckets<'a> = BTreeMap<String, Vec<&'a DerivedSession>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DayBoundary {
    offset_hours: i64,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self {
            offset_hours: DEFAULT_DAY_BOUNDARY_HOURS,
        }
    }
}

impl DayBoundary {
    pub(crate) fn new(offset_hours: i64) -> Self {
        Self { offset_hours }
    }

    pub(crate) fn offset_hours(&self) -> i64 {
        self.offset_hours
    }

    /// `YYYY-MM-DD` label of the day an instant belongs to
    pub(crate) fn day_label(&self, instant: DateTime<Utc>) -> String {
        let shifted = instant
            .checked_sub_signed(Duration::hours(self.offset_hours))
            .unwrap_or(instant);
        shifted.format(DATE_FORMAT).to_string()
    }
}

/// Group sessions by the day of their start time
pub(crate) fn bucket_by_day(sessions: &[DerivedSession], boundary: DayBoundary) -> DayBuckets<'_> {
    let mut buckets: DayBuckets<'_> = BTreeMap::new();
    for session in sessions {
        buckets
            .entry(boundary.day_label(session.start_time))
            .or_default()
            .push(session);
    }
    buckets
}
