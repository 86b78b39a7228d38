//! Session source abstraction layer
//!
//! A source hands over raw sessions for one page of a date-ranged query,
//! newest first. The SQLite store and a directory of exported payloads both
//! implement it; everything after the fetch is shared.

pub(crate) mod files;
pub(crate) mod loader;
pub(crate) mod payload;
pub(crate) mod sqlite;
pub(crate) mod upload_log;

use crate::core::{RawSession, SessionQuery};
use crate::error::AppError;

pub(crate) trait SessionSource {
    /// Short kind name ("sqlite", "files")
    fn name(&self) -> &'static str;

    /// Where the sessions come from, for log lines
    fn describe(&self) -> String;

    /// Sessions whose start time lies in the query range, ordered by start
    /// time descending, restricted to the requested page
    fn fetch(&self, query: &SessionQuery) -> Result<Vec<RawSession>, AppError>;
}

pub(crate) use files::{FileSource, find_payload_files, read_payload_file};
pub(crate) use loader::{LoadResult, load_sessions};
pub(crate) use sqlite::SqliteStore;
pub(crate) use upload_log::read_upload_log;
