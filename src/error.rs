use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid range \"{input}\": {reason}")]
    InvalidRange { input: String, reason: String },

    #[error("Invalid wheel diameter {value} (must be a positive number of meters)")]
    InvalidDiameter { value: f64 },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Malformed session in {origin}: {reason}")]
    MalformedInput { origin: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session store error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl AppError {
    pub(crate) fn malformed(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::MalformedInput {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}
