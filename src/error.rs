//! Custom error types for nenpo-seika.
//!
//! All library functions return `Result<T, NenpoError>`; the binary wraps
//! them in `anyhow` for reporting.

use thiserror::Error;

/// Main error type for nenpo-seika operations.
#[derive(Debug, Error)]
pub enum NenpoError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// researchmap API returned a non-success status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: i32,
        /// Error message
        message: String,
    },

    /// Malformed record delivered by a record source
    #[error("Parse error: {0}")]
    Parse(String),

    /// Multilingual value with no language entries
    #[error("empty multilingual value")]
    EmptyValue,

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error (bad batch rows, unknown language, bad dates)
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `NenpoError`
pub type Result<T> = std::result::Result<T, NenpoError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| NenpoError::Parse(msg.to_string()))
    }
}
