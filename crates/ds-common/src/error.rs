//! Error types for dag-stress.

use thiserror::Error;

/// Result type alias for dag-stress operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for dag-stress.
///
/// A definition build either succeeds completely or aborts with one of
/// these; no partial definition set is ever published.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value for {var}: {reason}")]
    ConfigValue { var: String, reason: String },

    #[error("invalid location count: {count}")]
    LocationCount { count: u32 },

    // Dataset table errors (20-29)
    #[error("dataset table error: {0}")]
    Table(String),

    #[error("dataset table row {line}: {reason}")]
    TableRow { line: usize, reason: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in logs and exit status.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::ConfigValue { .. } => 11,
            Error::LocationCount { .. } => 12,
            Error::Table(_) => 20,
            Error::TableRow { .. } => 21,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_grouped_by_category() {
        assert_eq!(Error::Config("x".into()).code(), 10);
        assert_eq!(Error::LocationCount { count: 0 }.code(), 12);
        assert_eq!(
            Error::TableRow {
                line: 3,
                reason: "bad".into()
            }
            .code(),
            21
        );
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::ConfigValue {
            var: "DAG_STRESS_WINDOW_DAYS".into(),
            reason: "must be at least 1".into(),
        };
        let text = err.to_string();
        assert!(text.contains("DAG_STRESS_WINDOW_DAYS"));
        assert!(text.contains("at least 1"));
    }
}
