//! Core data types shared across all session sources
//!
//! Raw sessions are what sources hand over; derived sessions are what the
//! engine computes from them. The two are never mixed.

use chrono::{DateTime, Utc};

/// One wheel-rotation detection with co-sampled climate readings
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RotationLogEntry {
    pub(crate) id: i64,
    /// Unix seconds
    pub(crate) timestamp: i64,
    /// Degrees Celsius
    pub(crate) temperature: f64,
    /// Relative humidity in percent
    pub(crate) humidity: f64,
}

impl RotationLogEntry {
    pub(crate) fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Session record as persisted by ingestion
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawSession {
    pub(crate) id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) images: Vec<String>,
    pub(crate) rotation_log: Vec<RotationLogEntry>,
}

impl RawSession {
    /// Earliest rotation instant, or the creation time for an empty log
    pub(crate) fn start_instant(&self) -> DateTime<Utc> {
        self.rotation_log
            .iter()
            .map(|e| e.timestamp)
            .min()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or(self.created_at)
    }
}

/// Session with computed activity fields
///
/// Distances are meters, speeds km/h, durations derived from the instants.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DerivedSession {
    pub(crate) id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) images: Vec<String>,
    /// Sorted ascending by timestamp
    pub(crate) rotation_log: Vec<RotationLogEntry>,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) end_time: DateTime<Utc>,
    pub(crate) rotations: u64,
    pub(crate) distance_m: f64,
    pub(crate) speed_kmh: f64,
    pub(crate) temperature: f64,
    pub(crate) humidity: f64,
}

impl DerivedSession {
    pub(crate) fn image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Elapsed seconds between start and end, never negative
    pub(crate) fn duration_seconds(&self) -> f64 {
        let ms = (self.end_time - self.start_time).num_milliseconds();
        ms.max(0) as f64 / 1000.0
    }

    pub(crate) fn length_minutes(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 60_000.0
    }
}

/// Inclusive instant range; a missing bound leaves that side open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DateRange {
    pub(crate) start: Option<DateTime<Utc>>,
    pub(crate) end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub(crate) fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub(crate) fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub(crate) fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(s) = self.start
            && instant < s
        {
            return false;
        }
        if let Some(e) = self.end
            && instant > e
        {
            return false;
        }
        true
    }
}

/// Query handed to a session source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SessionQuery {
    /// 1-based page number
    pub(crate) page: u32,
    /// Sessions per page; `None` returns everything
    pub(crate) page_size: Option<u32>,
    /// Matched against each session's start time
    pub(crate) range: DateRange,
}

impl Default for SessionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: None,
            range: DateRange::default(),
        }
    }
}

impl SessionQuery {
    /// Number of sessions to skip before the requested page
    pub(crate) fn offset(&self) -> usize {
        match self.page_size {
            Some(size) => self.page.saturating_sub(1) as usize * size as usize,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn session(start: i64, end: i64) -> DerivedSession {
        DerivedSession {
            id: 1,
            created_at: at(start),
            images: Vec::new(),
            rotation_log: Vec::new(),
            start_time: at(start),
            end_time: at(end),
            rotations: 0,
            distance_m: 0.0,
            speed_kmh: 0.0,
            temperature: 0.0,
            humidity: 0.0,
        }
    }

    #[test]
    fn entry_time_converts_unix_seconds() {
        let entry = RotationLogEntry {
            id: 1,
            timestamp: 1_700_000_000,
            temperature: 20.0,
            humidity: 50.0,
        };
        assert_eq!(entry.time().unwrap().to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn image_is_first_of_images() {
        let mut s = session(0, 0);
        assert_eq!(s.image(), None);
        s.images = vec!["a.jpg".into(), "b.jpg".into()];
        assert_eq!(s.image(), Some("a.jpg"));
    }

    #[test]
    fn length_minutes_from_instants() {
        let s = session(1000, 1900);
        assert!((s.length_minutes() - 15.0).abs() < 1e-9);
        assert!((s.duration_seconds() - 900.0).abs() < 1e-9);
    }

    #[test]
    fn raw_start_instant_prefers_log() {
        let entry = |timestamp| RotationLogEntry {
            id: 0,
            timestamp,
            temperature: 0.0,
            humidity: 0.0,
        };
        let mut raw = RawSession {
            id: 1,
            created_at: at(9000),
            images: Vec::new(),
            rotation_log: Vec::new(),
        };
        assert_eq!(raw.start_instant(), at(9000));
        raw.rotation_log = vec![entry(500), entry(300)];
        assert_eq!(raw.start_instant(), at(300));
    }

    // --- DateRange ---

    #[test]
    fn date_range_no_bounds() {
        let r = DateRange::default();
        assert!(r.is_unbounded());
        assert!(r.contains(at(0)));
        assert!(r.contains(at(4_000_000_000)));
    }

    #[test]
    fn date_range_start_only() {
        let r = DateRange::new(Some(at(100)), None);
        assert!(!r.contains(at(99)));
        assert!(r.contains(at(100))); // inclusive
        assert!(r.contains(at(101)));
    }

    #[test]
    fn date_range_end_only() {
        let r = DateRange::new(None, Some(at(100)));
        assert!(r.contains(at(100))); // inclusive
        assert!(!r.contains(at(101)));
    }

    #[test]
    fn date_range_both_bounds() {
        let r = DateRange::new(Some(at(100)), Some(at(200)));
        assert!(!r.contains(at(99)));
        assert!(r.contains(at(150)));
        assert!(!r.contains(at(201)));
    }

    // --- SessionQuery ---

    #[test]
    fn query_offset_without_page_size_is_zero() {
        let q = SessionQuery {
            page: 3,
            ..Default::default()
        };
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn query_offset_pages() {
        let q = SessionQuery {
            page: 3,
            page_size: Some(10),
            range: DateRange::default(),
        };
        assert_eq!(q.offset(), 20);
        let first = SessionQuery {
            page: 0,
            page_size: Some(10),
            range: DateRange::default(),
        };
        assert_eq!(first.offset(), 0);
    }
}
