//! Core module - session derivation and statistics shared by all sources
//!
//! Everything here is pure: sources fetch raw sessions, the core turns them
//! into derived sessions, day buckets, statistics and chart series.

mod bucket;
mod dedup;
mod derive;
mod filter;
mod geometry;
mod series;
mod stats;
mod types;

pub(crate) use bucket::{DayBoundary, DayBuckets, bucket_by_day};
pub(crate) use dedup::{DedupAccumulator, deduplicate};
pub(crate) use derive::derive_sessions;
pub(crate) use filter::{FilterCriteria, ValueRange, filter_sessions};
pub(crate) use geometry::{WheelGeometry, to_kilometers, to_meters};
pub(crate) use series::{ChartSeries, build_series};
pub(crate) use stats::{DaySummary, Overview, day_summaries, overview, session_totals};
pub(crate) use types::{DateRange, DerivedSession, RawSession, RotationLogEntry, SessionQuery};
