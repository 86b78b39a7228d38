//! Totals, averages and extremes over session collections
//!
//! Every function accepts either owned sessions or references (a day bucket),
//! and returns `None` instead of dividing by an empty count.

use std::borrow::Borrow;

use crate::core::bucket::DayBuckets;
use crate::core::geometry::to_kilometers;
use crate::core::types::DerivedSession;

/// Sums across a collection
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SessionTotals {
    pub(crate) sessions: usize,
    pub(crate) rotations: u64,
    pub(crate) distance_m: f64,
    /// Sum of per-session speeds; only meaningful divided by the count
    pub(crate) speed_kmh: f64,
    pub(crate) temperature: f64,
    pub(crate) humidity: f64,
    pub(crate) session_minutes: f64,
}

impl SessionTotals {
    fn add(&mut self, session: &DerivedSession) {
        self.sessions += 1;
        self.rotations += session.rotations;
        self.distance_m += session.distance_m;
        self.speed_kmh += session.speed_kmh;
        self.temperature += session.temperature;
        self.humidity += session.humidity;
        self.session_minutes += session.length_minutes();
    }
}

/// Per-session means across a collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SessionAverages {
    pub(crate) rotations: f64,
    pub(crate) distance_m: f64,
    pub(crate) speed_kmh: f64,
    pub(crate) temperature: f64,
    pub(crate) humidity: f64,
    pub(crate) session_minutes: f64,
}

impl SessionAverages {
    fn from_totals(totals: &SessionTotals) -> Option<Self> {
        if totals.sessions == 0 {
            return None;
        }
        let n = totals.sessions as f64;
        Some(Self {
            rotations: totals.rotations as f64 / n,
            distance_m: totals.distance_m / n,
            speed_kmh: totals.speed_kmh / n,
            temperature: totals.temperature / n,
            humidity: totals.humidity / n,
            session_minutes: totals.session_minutes / n,
        })
    }
}

/// Extremes shown in the overview; each is absent when nothing qualifies
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SessionExtremes {
    pub(crate) min_distance_m: Option<f64>,
    pub(crate) max_distance_m: Option<f64>,
    pub(crate) fastest_kmh: Option<f64>,
    pub(crate) slowest_kmh: Option<f64>,
    pub(crate) shortest_minutes: Option<f64>,
    pub(crate) longest_minutes: Option<f64>,
}

/// Everything the overview panel needs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Overview {
    pub(crate) totals: Option<SessionTotals>,
    pub(crate) averages: Option<SessionAverages>,
    pub(crate) extremes: SessionExtremes,
}

/// One row of the per-day view
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DaySummary {
    pub(crate) day: String,
    pub(crate) totals: SessionTotals,
    pub(crate) averages: SessionAverages,
    /// Day distance over day running time, not a mean of session speeds
    pub(crate) speed_kmh: f64,
}

fn each<S: Borrow<DerivedSession>>(sessions: &[S]) -> impl Iterator<Item = &DerivedSession> {
    sessions.iter().map(<S as Borrow<DerivedSession>>::borrow)
}

pub(crate) fn session_totals<S: Borrow<DerivedSession>>(sessions: &[S]) -> Option<SessionTotals> {
    if sessions.is_empty() {
        return None;
    }
    let mut totals = SessionTotals::default();
    for session in each(sessions) {
        totals.add(session);
    }
    Some(totals)
}

pub(crate) fn session_averages<S: Borrow<DerivedSession>>(
    sessions: &[S],
) -> Option<SessionAverages> {
    session_totals(sessions).and_then(|t| SessionAverages::from_totals(&t))
}

fn fold_extreme(values: impl Iterator<Item = f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    values.filter(|v| !v.is_nan()).reduce(pick)
}

/// Min/max distance skip idle sessions at or below `min_distance_m`
pub(crate) fn session_extremes<S: Borrow<DerivedSession>>(
    sessions: &[S],
    min_distance_m: f64,
) -> SessionExtremes {
    let all = || each(sessions);
    let active = || {
        all()
            .map(|s| s.distance_m)
            .filter(|d| *d > min_distance_m)
    };
    SessionExtremes {
        min_distance_m: fold_extreme(active(), f64::min),
        max_distance_m: fold_extreme(active(), f64::max),
        fastest_kmh: fold_extreme(all().map(|s| s.speed_kmh), f64::max),
        slowest_kmh: fold_extreme(all().map(|s| s.speed_kmh), f64::min),
        shortest_minutes: fold_extreme(all().map(|s| s.length_minutes()), f64::min),
        longest_minutes: fold_extreme(all().map(|s| s.length_minutes()), f64::max),
    }
}

pub(crate) fn overview<S: Borrow<DerivedSession>>(sessions: &[S], min_distance_m: f64) -> Overview {
    let totals = session_totals(sessions);
    Overview {
        totals,
        averages: session_averages(sessions),
        extremes: session_extremes(sessions, min_distance_m),
    }
}

/// Distance over running time of a whole collection, in km/h
pub(crate) fn weighted_speed_kmh<S: Borrow<DerivedSession>>(sessions: &[S]) -> f64 {
    let (distance_m, seconds) = each(sessions).fold((0.0, 0.0), |(d, t), s| {
        (d + s.distance_m, t + s.duration_seconds())
    });
    if seconds > 0.0 {
        to_kilometers(distance_m) / seconds * 3600.0
    } else {
        0.0
    }
}

/// Per-day rows in ascending day order
pub(crate) fn day_summaries(buckets: &DayBuckets<'_>) -> Vec<DaySummary> {
    buckets
        .iter()
        .filter_map(|(day, sessions)| {
            let totals = session_totals(sessions)?;
            let averages = SessionAverages::from_totals(&totals)?;
            Some(DaySummary {
                day: day.clone(),
                totals,
                averages,
                speed_kmh: weighted_speed_kmh(sessions),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::core::bucket::{DayBoundary, bucket_by_day};
    use chrono::{DateTime, Duration, Utc};

    fn session(id: i64, start: &str, minutes: i64, distance_m: f64, speed_kmh: f64) -> DerivedSession {
        let start: DateTime<Utc> = start.parse().unwrap();
        DerivedSession {
            id,
            created_at: start,
            images: Vec::new(),
            rotation_log: Vec::new(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            rotations: (distance_m / 0.88) as u64,
            distance_m,
            speed_kmh,
            temperature: 20.0 + id as f64,
            humidity: 50.0,
        }
    }

    #[test]
    fn empty_collection_is_no_data() {
        let empty: Vec<DerivedSession> = Vec::new();
        assert_eq!(session_totals(&empty), None);
        assert_eq!(session_averages(&empty), None);
        assert_eq!(session_extremes(&empty, 10.0), SessionExtremes::default());
        let o = overview(&empty, 10.0);
        assert!(o.totals.is_none() && o.averages.is_none());
        assert_eq!(weighted_speed_kmh(&empty), 0.0);
    }

    #[test]
    fn totals_and_averages_same_day() {
        let sessions = vec![
            session(1, "2025-03-01T20:00:00Z", 30, 1000.0, 2.0),
            session(2, "2025-03-01T22:00:00Z", 60, 2000.0, 2.0),
        ];
        let t = session_totals(&sessions).unwrap();
        assert_eq!(t.sessions, 2);
        assert_eq!(to_kilometers(t.distance_m), 3.0);
        assert_eq!(t.session_minutes, 90.0);
        assert_eq!(t.speed_kmh, 4.0);
        assert_eq!(t.temperature, 43.0);

        let a = session_averages(&sessions).unwrap();
        assert_eq!(to_kilometers(a.distance_m), 1.5);
        assert_eq!(a.session_minutes, 45.0);
        assert_eq!(a.temperature, 21.5);
        assert_eq!(a.humidity, 50.0);
    }

    #[test]
    fn works_on_bucket_references() {
        let sessions = vec![
            session(1, "2025-03-01T20:00:00Z", 30, 1000.0, 2.0),
            session(2, "2025-03-02T02:00:00Z", 60, 2000.0, 2.0),
        ];
        let buckets = bucket_by_day(&sessions, DayBoundary::default());
        let day = &buckets["2025-03-01"];
        let t = session_totals(day).unwrap();
        assert_eq!(t.distance_m, 3000.0);
        assert_eq!(session_averages(day).unwrap().distance_m, 1500.0);
    }

    #[test]
    fn extremes_skip_idle_distance_only() {
        let sessions = vec![
            session(1, "2025-03-01T20:00:00Z", 5, 0.0, 0.0),
            session(2, "2025-03-01T21:00:00Z", 30, 400.0, 0.8),
            session(3, "2025-03-01T22:00:00Z", 90, 2500.0, 1.7),
        ];
        let e = session_extremes(&sessions, 10.0);
        assert_eq!(e.min_distance_m, Some(400.0));
        assert_eq!(e.max_distance_m, Some(2500.0));
        assert_eq!(e.fastest_kmh, Some(1.7));
        assert_eq!(e.slowest_kmh, Some(0.0));
        assert_eq!(e.shortest_minutes, Some(5.0));
        assert_eq!(e.longest_minutes, Some(90.0));
    }

    #[test]
    fn all_idle_sessions_have_no_distance_extremes() {
        let sessions = vec![session(1, "2025-03-01T20:00:00Z", 5, 2.0, 0.0)];
        let e = session_extremes(&sessions, 10.0);
        assert_eq!(e.min_distance_m, None);
        assert_eq!(e.max_distance_m, None);
        assert_eq!(e.fastest_kmh, Some(0.0));
    }

    #[test]
    fn weighted_speed_is_not_mean_of_speeds() {
        // 1 km in 1 h and 1 km in 6 min: 2 km over 66 min
        let sessions = vec![
            session(1, "2025-03-01T13:00:00Z", 60, 1000.0, 1.0),
            session(2, "2025-03-01T20:00:00Z", 6, 1000.0, 10.0),
        ];
        let w = weighted_speed_kmh(&sessions);
        assert!((w - 2.0 / (66.0 / 60.0)).abs() < 1e-9);
        assert!(w < 5.5);
    }

    #[test]
    fn day_summaries_follow_day_order() {
        let sessions = vec![
            session(1, "2025-03-03T20:00:00Z", 30, 1000.0, 2.0),
            session(2, "2025-03-01T20:00:00Z", 60, 3000.0, 3.0),
            session(3, "2025-03-01T23:00:00Z", 0, 0.0, 0.0),
        ];
        let buckets = bucket_by_day(&sessions, DayBoundary::default());
        let days = day_summaries(&buckets);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, "2025-03-01");
        assert_eq!(days[0].totals.sessions, 2);
        assert_eq!(days[0].averages.distance_m, 1500.0);
        assert!((days[0].speed_kmh - 3.0).abs() < 1e-9);
        assert_eq!(days[1].day, "2025-03-03");
    }
}
