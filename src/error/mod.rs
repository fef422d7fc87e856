use thiserror::Error;

/// Error types for the virtual doctor.
///
/// Every failure the crate can hit falls into one of these categories. Inside
/// a conversation they never escape to the caller: the session turns them into
/// a [`Reply::Failed`](crate::Reply) and the display surface decides how to
/// show them.
///
/// # Examples
///
/// ```
/// use virtual_doctor::{DoctorError, Result};
///
/// fn require_key(key: &str) -> Result<()> {
///     if key.is_empty() {
///         return Err(DoctorError::ConfigError("API key is empty".into()));
///     }
///     Ok(())
/// }
///
/// match require_key("") {
///     Err(DoctorError::ConfigError(msg)) => println!("Bad config: {}", msg),
///     other => println!("Unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum DoctorError {
    /// Error returned by the remote model API
    #[error("API error: {0}")]
    ApiError(String),

    /// Request to the remote model timed out
    #[error("Timeout error")]
    Timeout,

    /// HTTP client error (from reqwest)
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error (from serde_json)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Text could not be extracted from an uploaded report
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// Filesystem error while reading a report
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// reqwest, serde_json and io errors don't implement PartialEq,
// so those variants never compare equal.
impl PartialEq for DoctorError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ApiError(a), Self::ApiError(b)) => a == b,
            (Self::Timeout, Self::Timeout) => true,
            (Self::ConfigError(a), Self::ConfigError(b)) => a == b,
            (Self::ExtractionError(a), Self::ExtractionError(b)) => a == b,
            _ => false,
        }
    }
}

/// A specialized Result type for virtual doctor operations.
pub type Result<T> = std::result::Result<T, DoctorError>;
