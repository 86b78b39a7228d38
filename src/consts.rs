/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Diameter of the tracked wheel in meters
pub(crate) const DEFAULT_WHEEL_DIAMETER_M: f64 = 0.28;

/// Hours subtracted from a session start before taking its date (noon-to-noon days)
pub(crate) const DEFAULT_DAY_BOUNDARY_HOURS: i64 = 12;

/// Sessions at or below this distance are idle and ignored for min/max distance
pub(crate) const DEFAULT_MIN_DISTANCE_M: f64 = 10.0;
