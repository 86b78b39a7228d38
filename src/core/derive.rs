//! Raw session to derived session mapping

use crate::core::geometry::{WheelGeometry, to_kilometers};
use crate::core::types::{DerivedSession, RawSession, RotationLogEntry};

fn mean(log: &[RotationLogEntry], value: impl Fn(&RotationLogEntry) -> f64) -> f64 {
    if log.is_empty() {
        return 0.0;
    }
    log.iter().map(value).sum::<f64>() / log.len() as f64
}

/// Compute the derived fields of one session (consumes it to avoid cloning)
pub(crate) fn derive_session(raw: RawSession, geometry: &WheelGeometry) -> DerivedSession {
    let RawSession {
        id,
        created_at,
        images,
        mut rotation_log,
    } = raw;

    // stable: equal timestamps keep their stored order
    rotation_log.sort_by_key(|e| e.timestamp);

    let rotations = rotation_log.len() as u64;
    let distance_m = geometry.distance_m(rotations);
    let temperature = mean(&rotation_log, |e| e.temperature);
    let humidity = mean(&rotation_log, |e| e.humidity);

    let (start_time, end_time, duration_seconds) = match (rotation_log.first(), rotation_log.last()) {
        (Some(first), Some(last)) => (
            first.time().unwrap_or(created_at),
            last.time().unwrap_or(created_at),
            last.timestamp - first.timestamp,
        ),
        _ => (created_at, created_at, 0),
    };

    let speed_kmh = if duration_seconds > 0 {
        to_kilometers(distance_m) / duration_seconds as f64 * 3600.0
    } else {
        0.0
    };

    DerivedSession {
        id,
        created_at,
        images,
        rotation_log,
        start_time,
        end_time,
        rotations,
        distance_m,
        speed_kmh,
        temperature,
        humidity,
    }
}

/// Derive every session, preserving input order
pub(crate) fn derive_sessions(raw: Vec<RawSession>, geometry: &WheelGeometry) -> Vec<DerivedSession> {
    raw.into_iter()
        .map(|session| derive_session(session, geometry))
        .collect()
}
