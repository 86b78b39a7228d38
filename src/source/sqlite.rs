//! SQLite-backed session store
//!
//! Sessions and their rotation logs live in two tables joined by
//! `session_id`. Paging and the date range are resolved in SQL against each
//! session's start time (first rotation, or creation time for empty logs).

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, Transaction, params};

use super::SessionSource;
use crate::core::{RawSession, RotationLogEntry, SessionQuery};
use crate::error::AppError;

const SCHEMA_VERSION: i32 = 1;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS hamster_session (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at_ms INTEGER NOT NULL,
    images        TEXT    NOT NULL DEFAULT '[]'
);
CREATE TABLE IF NOT EXISTS rotation_log_entry (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id  INTEGER NOT NULL REFERENCES hamster_session(id) ON DELETE CASCADE,
    timestamp   INTEGER NOT NULL,
    temperature REAL    NOT NULL,
    humidity    REAL    NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_rotation_log_session ON rotation_log_entry(session_id);
";

const SELECT_PAGE: &str = "
SELECT id, created_at_ms, images FROM (
    SELECT s.id, s.created_at_ms, s.images,
           COALESCE(
               (SELECT MIN(e.timestamp) FROM rotation_log_entry e WHERE e.session_id = s.id) * 1000,
               s.created_at_ms
           ) AS start_ms
    FROM hamster_session s
)
WHERE (?1 IS NULL OR start_ms >= ?1)
  AND (?2 IS NULL OR start_ms <= ?2)
ORDER BY start_ms DESC, id DESC
LIMIT ?3 OFFSET ?4
";

pub(crate) struct SqliteStore {
    conn: Connection,
    label: String,
}

impl SqliteStore {
    pub(crate) fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| AppError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn, path.display().to_string())
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self, AppError> {
        Self::init(Connection::open_in_memory()?, ":memory:".to_string())
    }

    fn init(mut conn: Connection, label: String) -> Result<Self, AppError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrate(&mut conn)?;
        Ok(Self { conn, label })
    }

    /// Persist sessions in one transaction; returns the assigned ids
    ///
    /// Ids carried by the sessions are ignored, the store assigns its own.
    pub(crate) fn insert_all(&mut self, sessions: &[RawSession]) -> Result<Vec<i64>, AppError> {
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(sessions.len());
        for session in sessions {
            ids.push(insert_session(&tx, session)?);
        }
        tx.commit()?;
        log::debug!("stored {} sessions in {}", ids.len(), self.label);
        Ok(ids)
    }

    /// Delete sessions and their rotation logs; returns the number removed
    pub(crate) fn delete(&mut self, ids: &[i64]) -> Result<usize, AppError> {
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM hamster_session WHERE id = ?1")?;
            for id in ids {
                removed += stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    fn load_log(&self, session_id: i64) -> Result<Vec<RotationLogEntry>, AppError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, timestamp, temperature, humidity
             FROM rotation_log_entry
             WHERE session_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![session_id], row_to_entry)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn migrate(conn: &mut Connection) -> Result<(), AppError> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_V1)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

fn insert_session(tx: &Transaction<'_>, session: &RawSession) -> Result<i64, AppError> {
    let images = serde_json::to_string(&session.images).map_err(|source| AppError::Json {
        origin: format!("session {} images", session.id),
        source,
    })?;
    tx.execute(
        "INSERT INTO hamster_session (created_at_ms, images) VALUES (?1, ?2)",
        params![session.created_at.timestamp_millis(), images],
    )?;
    let id = tx.last_insert_rowid();

    let mut stmt = tx.prepare_cached(
        "INSERT INTO rotation_log_entry (session_id, timestamp, temperature, humidity)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for entry in &session.rotation_log {
        stmt.execute(params![id, entry.timestamp, entry.temperature, entry.humidity])?;
    }
    Ok(id)
}

fn row_to_entry(row: &Row) -> rusqlite::Result<RotationLogEntry> {
    Ok(RotationLogEntry {
        id: row.get("id")?,
        timestamp: row.get("timestamp")?,
        temperature: row.get("temperature")?,
        humidity: row.get("humidity")?,
    })
}

type SessionRow = (i64, i64, String);

fn row_to_session(row: &Row) -> rusqlite::Result<SessionRow> {
    Ok((row.get("id")?, row.get("created_at_ms")?, row.get("images")?))
}

fn parse_session_row(
    (id, created_at_ms, images): SessionRow,
    rotation_log: Vec<RotationLogEntry>,
) -> Result<RawSession, AppError> {
    let origin = format!("stored session {id}");
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_at_ms).ok_or_else(|| {
        AppError::malformed(&origin, format!("created_at_ms {created_at_ms} is out of range"))
    })?;
    let images: Vec<String> =
        serde_json::from_str(&images).map_err(|source| AppError::Json { origin, source })?;
    Ok(RawSession {
        id,
        created_at,
        images,
        rotation_log,
    })
}

impl SessionSource for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn describe(&self) -> String {
        self.label.clone()
    }

    fn fetch(&self, query: &SessionQuery) -> Result<Vec<RawSession>, AppError> {
        let limit: i64 = query.page_size.map_or(-1, i64::from);
        let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);
        let start_ms = query.range.start.map(|t| t.timestamp_millis());
        let end_ms = query.range.end.map(|t| t.timestamp_millis());

        let rows = {
            let mut stmt = self.conn.prepare(SELECT_PAGE)?;
            let mapped = stmt.query_map(params![start_ms, end_ms, limit, offset], row_to_session)?;
            mapped.collect::<Result<Vec<_>, _>>()?
        };

        rows.into_iter()
            .map(|row| {
                let log = self.load_log(row.0)?;
                parse_session_row(row, log)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DateRange;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn session(created: i64, stamps: &[i64]) -> RawSession {
        RawSession {
            id: 0,
            created_at: at(created),
            images: vec![format!("img-{created}.jpg")],
            rotation_log: stamps
                .iter()
                .enumerate()
                .map(|(i, &timestamp)| RotationLogEntry {
                    id: i as i64 + 1,
                    timestamp,
                    temperature: 21.0,
                    humidity: 50.0,
                })
                .collect(),
        }
    }

    fn seeded() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_all(&[
                session(1_000, &[1_000, 1_060]),
                session(5_000, &[5_000, 5_030, 5_090]),
                session(9_000, &[]),
            ])
            .unwrap();
        store
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let ids = store.insert_all(&[session(1, &[1]), session(2, &[2])]).unwrap();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn fetch_orders_by_start_descending() {
        let store = seeded();
        let all = store.fetch(&SessionQuery::default()).unwrap();
        let starts: Vec<_> = all.iter().map(RawSession::start_instant).collect();
        assert_eq!(starts, vec![at(9_000), at(5_000), at(1_000)]);
        assert_eq!(all[1].rotation_log.len(), 3);
        assert_eq!(all[1].images, vec!["img-5000.jpg"]);
    }

    #[test]
    fn fetch_paginates() {
        let store = seeded();
        let page = |page| {
            store
                .fetch(&SessionQuery {
                    page,
                    page_size: Some(2),
                    range: DateRange::default(),
                })
                .unwrap()
        };
        assert_eq!(page(1).len(), 2);
        let second = page(2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].start_instant(), at(1_000));
        assert!(page(3).is_empty());
    }

    #[test]
    fn fetch_applies_date_range_to_start_time() {
        let store = seeded();
        let query = SessionQuery {
            range: DateRange::new(Some(at(4_000)), Some(at(6_000))),
            ..Default::default()
        };
        let found = store.fetch(&query).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start_instant(), at(5_000));

        let open_start = SessionQuery {
            range: DateRange::new(None, Some(at(5_000))),
            ..Default::default()
        };
        assert_eq!(store.fetch(&open_start).unwrap().len(), 2);
    }

    #[test]
    fn delete_cascades_to_log() {
        let mut store = seeded();
        let all = store.fetch(&SessionQuery::default()).unwrap();
        let target = all[1].id;
        assert_eq!(store.delete(&[target, 999]).unwrap(), 1);
        assert_eq!(store.fetch(&SessionQuery::default()).unwrap().len(), 2);
        let orphans: i64 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM rotation_log_entry WHERE session_id = ?1",
                params![target],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn reopening_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sessions.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.insert_all(&[session(1_000, &[1_000])]).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.fetch(&SessionQuery::default()).unwrap().len(), 1);
        assert!(store.describe().ends_with("sessions.db"));
    }
}
