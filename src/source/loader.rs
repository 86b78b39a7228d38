//! Unified session loader for all sources
//!
//! fetch → deduplicate → derive → filter

use rayon::prelude::*;
use std::time::Instant;

use crate::core::{
    DedupAccumulator, DerivedSession, FilterCriteria, RawSession, SessionQuery, WheelGeometry,
    derive_sessions, filter_sessions,
};
use crate::error::AppError;
use crate::source::SessionSource;

#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) sessions: Vec<DerivedSession>,
    /// Ids of sessions dropped as re-uploads of another session
    pub(crate) duplicates: Vec<i64>,
    pub(crate) elapsed_ms: f64,
}

/// Deduplicate in parallel chunks and reduce the partial accumulators
pub(crate) fn dedup_parallel(sessions: Vec<RawSession>) -> (Vec<RawSession>, Vec<i64>) {
    sessions
        .into_par_iter()
        .fold(DedupAccumulator::new, |mut acc, session| {
            acc.push(session);
            acc
        })
        .reduce(DedupAccumulator::new, |mut acc, partial| {
            acc.merge(partial);
            acc
        })
        .finalize()
}

pub(crate) fn load_sessions(
    source: &dyn SessionSource,
    query: &SessionQuery,
    geometry: &WheelGeometry,
    criteria: &FilterCriteria,
) -> Result<LoadResult, AppError> {
    let load_start = Instant::now();

    let raw = source.fetch(query)?;
    let fetched = raw.len();
    log::info!(
        "fetched {} sessions from {} source {} ({:.2}ms)",
        fetched,
        source.name(),
        source.describe(),
        load_start.elapsed().as_secs_f64() * 1000.0
    );

    let (unique, duplicates) = dedup_parallel(raw);
    if !duplicates.is_empty() {
        log::info!("skipped {} duplicate sessions: {:?}", duplicates.len(), duplicates);
    }

    let derived = derive_sessions(unique, geometry);
    let sessions = filter_sessions(derived, criteria);
    log::debug!(
        "{} of {} sessions pass the filters",
        sessions.len(),
        fetched - duplicates.len()
    );

    Ok(LoadResult {
        sessions,
        duplicates,
        elapsed_ms: load_start.elapsed().as_secs_f64() * 1000.0,
    })
}
