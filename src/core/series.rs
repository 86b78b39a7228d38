//! Chart-ready per-day series

use crate::core::bucket::DayBuckets;
use crate::core::stats::day_summaries;

/// Parallel arrays, one element per day label
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ChartSeries {
    pub(crate) days: Vec<String>,
    /// Total meters per day
    pub(crate) distance_m: Vec<f64>,
    pub(crate) rotations: Vec<u64>,
    /// Mean session length per day
    pub(crate) session_minutes: Vec<f64>,
    /// Day distance over day running time
    pub(crate) speed_kmh: Vec<f64>,
    pub(crate) avg_temperature: Vec<f64>,
    pub(crate) avg_humidity: Vec<f64>,
}

impl ChartSeries {
    pub(crate) fn len(&self) -> usize {
        self.days.len()
    }
}

pub(crate) fn build_series(buckets: &DayBuckets<'_>) -> ChartSeries {
    let mut series = ChartSeries::default();
    for day in day_summaries(buckets) {
        series.days.push(day.day);
        series.distance_m.push(day.totals.distance_m);
        series.rotations.push(day.totals.rotations);
        series.session_minutes.push(day.averages.session_minutes);
        series.speed_kmh.push(day.speed_kmh);
        series.avg_temperature.push(day.averages.temperature);
        series.avg_humidity.push(day.averages.humidity);
    }
    series
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::core::bucket::{DayBoundary, bucket_by_day};
    use crate::core::types::DerivedSession;
    use chrono::{DateTime, Duration, Utc};

    fn session(start: &str, minutes: i64, distance_m: f64, temperature: f64) -> DerivedSession {
        let start: DateTime<Utc> = start.parse().unwrap();
        DerivedSession {
            id: 0,
            created_at: start,
            images: Vec::new(),
            rotation_log: Vec::new(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            rotations: 10,
            distance_m,
            speed_kmh: 0.0,
            temperature,
            humidity: 40.0,
        }
    }

    #[test]
    fn empty_buckets_give_empty_series() {
        let series = build_series(&DayBuckets::new());
        assert!(series.days.is_empty());
        assert!(series.distance_m.is_empty());
    }

    #[test]
    fn arrays_align_with_sorted_days() {
        let sessions = vec![
            session("2025-03-05T20:00:00Z", 30, 500.0, 22.0),
            session("2025-03-01T20:00:00Z", 60, 1000.0, 20.0),
            session("2025-03-01T22:00:00Z", 0, 0.0, 24.0),
            session("2025-03-03T20:00:00Z", 10, 100.0, 21.0),
        ];
        let buckets = bucket_by_day(&sessions, DayBoundary::default());
        let s = build_series(&buckets);

        assert_eq!(s.days, vec!["2025-03-01", "2025-03-03", "2025-03-05"]);
        for len in [
            s.distance_m.len(),
            s.rotations.len(),
            s.session_minutes.len(),
            s.speed_kmh.len(),
            s.avg_temperature.len(),
            s.avg_humidity.len(),
        ] {
            assert_eq!(len, s.len());
        }

        assert_eq!(s.distance_m[0], 1000.0);
        assert_eq!(s.rotations[0], 20);
        assert_eq!(s.session_minutes[0], 30.0);
        assert_eq!(s.avg_temperature[0], 22.0);
        assert!((s.speed_kmh[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_day_has_zero_speed() {
        let sessions = vec![session("2025-03-01T20:00:00Z", 0, 0.88, 20.0)];
        let buckets = bucket_by_day(&sessions, DayBoundary::default());
        assert_eq!(build_series(&buckets).speed_kmh, vec![0.0]);
    }
}
