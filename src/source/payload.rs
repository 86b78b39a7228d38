//! Ingestion payloads
//!
//! The tracker uploads `{images, createdAt?, rotationLog: [...]}` documents.
//! They are validated here, before anything is persisted or derived.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::core::{RawSession, RotationLogEntry};
use crate::error::AppError;
use crate::utils::parse_instant;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionPayload {
    #[serde(default)]
    pub(crate) id: Option<i64>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    rotation_log: Vec<EntryPayload>,
}

#[derive(Debug, Clone, Deserialize)]
struct EntryPayload {
    #[serde(default)]
    id: Option<i64>,
    timestamp: i64,
    temperature: f64,
    humidity: f64,
}

impl EntryPayload {
    fn validate(&self, origin: &str, index: usize) -> Result<(), AppError> {
        let at = |reason: String| AppError::malformed(origin, format!("rotationLog[{index}]: {reason}"));
        if DateTime::from_timestamp(self.timestamp, 0).is_none() {
            return Err(at(format!("timestamp {} is out of range", self.timestamp)));
        }
        if !self.temperature.is_finite() {
            return Err(at("temperature is not a finite number".to_string()));
        }
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(at(format!("humidity {} is outside 0..=100", self.humidity)));
        }
        Ok(())
    }
}

impl SessionPayload {
    /// Validate and convert; `created_fallback` stands in for a missing `createdAt`
    pub(crate) fn into_raw(
        self,
        id: i64,
        created_fallback: DateTime<Utc>,
        origin: &str,
    ) -> Result<RawSession, AppError> {
        let created_at = match self.created_at.as_deref() {
            Some(raw) => parse_instant(raw).ok_or_else(|| {
                AppError::malformed(origin, format!("createdAt \"{raw}\" is not an ISO-8601 instant"))
            })?,
            None => created_fallback,
        };

        let mut rotation_log = Vec::with_capacity(self.rotation_log.len());
        for (index, entry) in self.rotation_log.into_iter().enumerate() {
            entry.validate(origin, index)?;
            rotation_log.push(RotationLogEntry {
                id: entry.id.unwrap_or(index as i64 + 1),
                timestamp: entry.timestamp,
                temperature: entry.temperature,
                humidity: entry.humidity,
            });
        }

        Ok(RawSession {
            id: self.id.unwrap_or(id),
            created_at,
            images: self.images,
            rotation_log,
        })
    }
}

/// Parse a document holding one payload object or an array of them
pub(crate) fn parse_json_document(content: &str, origin: &str) -> Result<Vec<SessionPayload>, AppError> {
    let json_err = |source| AppError::Json {
        origin: origin.to_string(),
        source,
    };
    let value: Value = serde_json::from_str(content).map_err(json_err)?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(json_err),
        _ => serde_json::from_value(value).map(|p| vec![p]).map_err(json_err),
    }
}

/// Parse one payload per non-empty line
pub(crate) fn parse_json_lines(content: &str, origin: &str) -> Result<Vec<SessionPayload>, AppError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).map_err(|source| AppError::Json {
                origin: format!("{origin}:{}", n + 1),
                source,
            })
        })
        .collect()
}
