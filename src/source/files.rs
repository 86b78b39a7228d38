//! Directory of exported session payloads
//!
//! Every `*.json` file holds one payload or an array of them, every `*.jsonl`
//! file one payload per line. Files are parsed in parallel; sessions without
//! an explicit id are numbered after the highest explicit one, and an explicit
//! id may appear only once.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use super::SessionSource;
use super::payload::{SessionPayload, parse_json_document, parse_json_lines};
use crate::core::{RawSession, SessionQuery};
use crate::error::AppError;

pub(crate) struct FileSource {
    root: PathBuf,
}

/// Payloads read from one file, with the file's modification time
pub(crate) struct PayloadFile {
    pub(crate) origin: String,
    pub(crate) modified: DateTime<Utc>,
    pub(crate) payloads: Vec<SessionPayload>,
}

fn io_error(path: &Path, source: std::io::Error) -> AppError {
    AppError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Payload files under `root`, sorted by path; a file root is returned as-is
pub(crate) fn find_payload_files(root: &Path) -> Result<Vec<PathBuf>, AppError> {
    let meta = fs::metadata(root).map_err(|e| io_error(root, e))?;
    if meta.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let base = glob::Pattern::escape(&root.display().to_string());
    let mut files = Vec::new();
    for ext in ["json", "jsonl"] {
        if let Ok(entries) = glob::glob(&format!("{base}/**/*.{ext}")) {
            files.extend(entries.flatten());
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn read_payload_file(path: &Path) -> Result<PayloadFile, AppError> {
    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let origin = path.display().to_string();
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    let is_jsonl = path.extension().is_some_and(|ext| ext == "jsonl");
    let payloads = if is_jsonl {
        parse_json_lines(&content, &origin)?
    } else {
        parse_json_document(&content, &origin)?
    };
    Ok(PayloadFile {
        origin,
        modified,
        payloads,
    })
}

impl FileSource {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn load_all(&self) -> Result<Vec<RawSession>, AppError> {
        let files = find_payload_files(&self.root)?;
        log::debug!("found {} payload files under {}", files.len(), self.root.display());

        let parsed = files
            .par_iter()
            .map(|path| read_payload_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut next_id = parsed
            .iter()
            .flat_map(|file| file.payloads.iter().filter_map(|p| p.id))
            .max()
            .unwrap_or(0);

        let mut explicit: HashMap<i64, String> = HashMap::new();
        let mut sessions = Vec::new();
        for file in parsed {
            for payload in file.payloads {
                let id = match payload.id {
                    Some(id) => {
                        if let Some(first) = explicit.insert(id, file.origin.clone()) {
                            return Err(AppError::malformed(
                                &file.origin,
                                format!("session id {id} is already used in {first}"),
                            ));
                        }
                        id
                    }
                    None => {
                        next_id += 1;
                        next_id
                    }
                };
                sessions.push(payload.into_raw(id, file.modified, &file.origin)?);
            }
        }
        Ok(sessions)
    }
}

impl SessionSource for FileSource {
    fn name(&self) -> &'static str {
        "files"
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn fetch(&self, query: &SessionQuery) -> Result<Vec<RawSession>, AppError> {
        let mut sessions: Vec<(DateTime<Utc>, RawSession)> = self
            .load_all()?
            .into_iter()
            .map(|s| (s.start_instant(), s))
            .filter(|(start, _)| query.range.contains(*start))
            .collect();
        sessions.sort_by(|(a_start, a), (b_start, b)| b_start.cmp(a_start).then(b.id.cmp(&a.id)));

        let page = sessions.into_iter().skip(query.offset()).map(|(_, s)| s);
        Ok(match query.page_size {
            Some(size) => page.take(size as usize).collect(),
            None => page.collect(),
        })
    }
}
