//! Duplicate session detection
//!
//! Re-uploads after failed requests store the same session twice. Two sessions
//! are duplicates when their rotation logs span the same first and last
//! timestamp; the one with the lowest id is kept.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::core::types::RawSession;

/// Trait for sessions that can be deduplicated
pub(crate) trait Deduplicatable {
    fn id(&self) -> i64;
    /// `(first, last)` rotation timestamp; `None` never collides
    fn span_key(&self) -> Option<(i64, i64)>;
}

impl Deduplicatable for RawSession {
    fn id(&self) -> i64 {
        self.id
    }

    fn span_key(&self) -> Option<(i64, i64)> {
        let first = self.rotation_log.iter().map(|e| e.timestamp).min()?;
        let last = self.rotation_log.iter().map(|e| e.timestamp).max()?;
        Some((first, last))
    }
}

/// Incremental dedup accumulator for chunked/parallel loading.
#[derive(Debug, Clone)]
pub(crate) struct DedupAccumulator<T: Deduplicatable> {
    by_span: HashMap<(i64, i64), T>,
    unkeyed: Vec<T>,
    removed: Vec<i64>,
}

impl<T: Deduplicatable> Default for DedupAccumulator<T> {
    fn default() -> Self {
        Self {
            by_span: HashMap::new(),
            unkeyed: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<T: Deduplicatable> DedupAccumulator<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, session: T) {
        let Some(key) = session.span_key() else {
            self.unkeyed.push(session);
            return;
        };
        match self.by_span.entry(key) {
            Entry::Occupied(mut slot) => {
                if session.id() < slot.get().id() {
                    let previous = slot.insert(session);
                    self.removed.push(previous.id());
                } else {
                    self.removed.push(session.id());
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(session);
            }
        }
    }

    pub(crate) fn extend<I>(&mut self, sessions: I)
    where
        I: IntoIterator<Item = T>,
    {
        for session in sessions {
            self.push(session);
        }
    }

    pub(crate) fn merge(&mut self, other: DedupAccumulator<T>) {
        self.removed.extend(other.removed);
        self.unkeyed.extend(other.unkeyed);
        for session in other.by_span.into_values() {
            self.push(session);
        }
    }

    /// Kept sessions ordered by id, plus the ids of dropped duplicates
    pub(crate) fn finalize(self) -> (Vec<T>, Vec<i64>) {
        let mut kept: Vec<T> = self.by_span.into_values().collect();
        kept.extend(self.unkeyed);
        kept.sort_by_key(|s| (s.id(), s.span_key()));

        let mut removed = self.removed;
        removed.sort_unstable();
        (kept, removed)
    }
}

/// Deduplicate sessions by rotation span
/// Returns (kept sessions, removed ids)
pub(crate) fn deduplicate<T, I>(sessions: I) -> (Vec<T>, Vec<i64>)
where
    T: Deduplicatable,
    I: IntoIterator<Item = T>,
{
    let mut accumulator = DedupAccumulator::new();
    accumulator.extend(sessions);
    accumulator.finalize()
}
