//! Recovery of uploads rejected by the ingestion endpoint
//!
//! The tracker logs every upload attempt as a `Session data: {...}` line,
//! printed as a Python dict, and the response as a later line carrying
//! `status: <code>`. Sessions whose upload was answered with 401 never reached
//! the store and can be replayed from the log.

use std::fs;
use std::path::Path;

use super::payload::SessionPayload;
use crate::error::AppError;

const SESSION_PREFIX: &str = "Session data:";
const UNAUTHORIZED: &str = "status: 401";

/// A payload whose upload was refused, with the log line it was printed on
#[derive(Debug)]
pub(crate) struct RejectedUpload {
    pub(crate) line: usize,
    pub(crate) payload: SessionPayload,
}

/// Turn a Python dict repr into JSON: drop escaped braces and quotes, then
/// switch single quotes to double quotes
pub(crate) fn python_dict_to_json(raw: &str) -> String {
    raw.replace("\\{", "{")
        .replace("\\}", "}")
        .replace("\\'", "'")
        .replace('\'', "\"")
}

/// The dict part of a `Session data:` line, cut after the last closing bracket
fn session_body(line: &str) -> Option<&str> {
    let body = line.strip_prefix(SESSION_PREFIX)?.trim();
    match body.rfind(['}', ']']) {
        Some(end) => Some(&body[..=end]),
        None => Some(body),
    }
}

/// Payloads that were followed by a 401 response before the next upload
///
/// A session line that cannot be parsed is skipped with a warning and also
/// clears the pending payload, so a later 401 is not attributed to an
/// earlier session.
pub(crate) fn parse_upload_log(content: &str, origin: &str) -> Vec<RejectedUpload> {
    let mut rejected = Vec::new();
    let mut pending: Option<RejectedUpload> = None;

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        if let Some(body) = session_body(line) {
            pending = match serde_json::from_str(&python_dict_to_json(body)) {
                Ok(payload) => Some(RejectedUpload {
                    line: line_no,
                    payload,
                }),
                Err(err) => {
                    log::warn!("skipping unreadable session at {origin}:{line_no}: {err}");
                    None
                }
            };
        }

        if line.contains(UNAUTHORIZED)
            && let Some(upload) = pending.take()
        {
            log::debug!("upload from {origin}:{} was rejected with 401", upload.line);
            rejected.push(upload);
        }
    }

    rejected
}

pub(crate) fn read_upload_log(path: &Path) -> Result<Vec<RejectedUpload>, AppError> {
    let content = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_upload_log(&content, &path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn session_line(ts: i64) -> String {
        format!(
            "Session data: \\{{'images': ['cam/{ts}.jpg'], 'rotationLog': [\\{{'timestamp': {ts}, 'temperature': 21.5, 'humidity': 48\\}}]\\}} (sent)"
        )
    }

    fn fallback() -> DateTime<Utc> {
        DateTime::from_timestamp(0, 0).unwrap()
    }

    #[test]
    fn python_quoting_becomes_json() {
        let fixed = python_dict_to_json(r"\{'images': [], 'note': \'x\'\}");
        assert_eq!(fixed, r#"{"images": [], "note": "x"}"#);
        assert!(serde_json::from_str::<serde_json::Value>(&fixed).is_ok());
    }

    #[test]
    fn body_stops_at_last_bracket() {
        assert_eq!(
            session_body("Session data: {'a': [1]} trailing text"),
            Some("{'a': [1]}")
        );
        assert_eq!(session_body("Upload finished"), None);
    }

    #[test]
    fn only_sessions_answered_with_401_are_recovered() {
        let log = [
            session_line(1_000),
            "Response status: 200".to_string(),
            session_line(2_000),
            "Response status: 401 Unauthorized".to_string(),
            session_line(3_000),
            "Response status: 500".to_string(),
            session_line(4_000),
            "retrying...".to_string(),
            "Response status: 401".to_string(),
        ]
        .join("\n");

        let rejected = parse_upload_log(&log, "upload.log");
        let lines: Vec<usize> = rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 7]);

        let raw = rejected
            .into_iter()
            .next()
            .unwrap()
            .payload
            .into_raw(1, fallback(), "upload.log:3")
            .unwrap();
        assert_eq!(raw.images, vec!["cam/2000.jpg".to_string()]);
        assert_eq!(raw.rotation_log[0].timestamp, 2_000);
        assert_eq!(raw.created_at, fallback());
    }

    #[test]
    fn second_401_without_new_session_is_ignored() {
        let log = format!(
            "{}\nstatus: 401\nstatus: 401\n",
            session_line(1_000)
        );
        assert_eq!(parse_upload_log(&log, "upload.log").len(), 1);
    }

    #[test]
    fn unreadable_session_clears_pending() {
        let log = format!(
            "{}\nSession data: {{'rotationLog': [oops]}}\nstatus: 401\n",
            session_line(1_000)
        );
        assert!(parse_upload_log(&log, "upload.log").is_empty());
    }
}
