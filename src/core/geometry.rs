//! Wheel geometry: rotations to distance

use std::f64::consts::PI;

use crate::consts::DEFAULT_WHEEL_DIAMETER_M;
use crate::error::AppError;

/// Physical wheel the tracker is mounted on
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WheelGeometry {
    diameter_m: f64,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            diameter_m: DEFAULT_WHEEL_DIAMETER_M,
        }
    }
}

impl WheelGeometry {
    pub(crate) fn new(diameter_m: f64) -> Result<Self, AppError> {
        if !diameter_m.is_finite() || diameter_m <= 0.0 {
            return Err(AppError::InvalidDiameter { value: diameter_m });
        }
        Ok(Self { diameter_m })
    }

    pub(crate) fn diameter_m(&self) -> f64 {
        self.diameter_m
    }

    pub(crate) fn circumference_m(&self) -> f64 {
        PI * self.diameter_m
    }

    /// Distance in meters covered by `rotations` full turns
    pub(crate) fn distance_m(&self, rotations: u64) -> f64 {
        rotations as f64 * self.circumference_m()
    }
}

pub(crate) fn to_kilometers(meters: f64) -> f64 {
    meters / 1000.0
}

pub(crate) fn to_meters(kilometers: f64) -> f64 {
    kilometers * 1000.0
}
