//! Session filtering by value ranges and start-time window

use std::fmt::Display;

use crate::core::types::{DateRange, DerivedSession};
use crate::error::AppError;

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ValueRange<T> {
    min: T,
    max: T,
}

impl<T: PartialOrd + Copy + Display> ValueRange<T> {
    pub(crate) fn new(min: T, max: T) -> Result<Self, AppError> {
        // NaN bounds compare false and land in the error branch
        if min <= max {
            return Ok(Self { min, max });
        }
        Err(AppError::InvalidRange {
            input: format!("{min}..{max}"),
            reason: "min must not exceed max".to_string(),
        })
    }

    pub(crate) fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    pub(crate) fn map<U>(self, f: impl Fn(T) -> U) -> ValueRange<U> {
        ValueRange {
            min: f(self.min),
            max: f(self.max),
        }
    }
}

impl Default for ValueRange<f64> {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }
}

impl Default for ValueRange<u64> {
    fn default() -> Self {
        Self {
            min: 0,
            max: u64::MAX,
        }
    }
}

/// Conjunction of per-field predicates; the default matches everything
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FilterCriteria {
    pub(crate) distance_m: ValueRange<f64>,
    pub(crate) temperature: ValueRange<f64>,
    pub(crate) humidity: ValueRange<f64>,
    pub(crate) rotations: ValueRange<u64>,
    pub(crate) speed_kmh: ValueRange<f64>,
    pub(crate) dates: DateRange,
}

impl FilterCriteria {
    pub(crate) fn matches(&self, session: &DerivedSession) -> bool {
        self.distance_m.contains(session.distance_m)
            && self.temperature.contains(session.temperature)
            && self.humidity.contains(session.humidity)
            && self.rotations.contains(session.rotations)
            && self.speed_kmh.contains(session.speed_kmh)
            && (self.dates.is_unbounded() || self.dates.contains(session.start_time))
    }
}

/// Keep matching sessions in their original order
pub(crate) fn filter_sessions(
    sessions: Vec<DerivedSession>,
    criteria: &FilterCriteria,
) -> Vec<DerivedSession> {
    sessions
        .into_iter()
        .filter(|s| criteria.matches(s))
        .collect()
}
