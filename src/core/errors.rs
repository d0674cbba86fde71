//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Missing or invalid client configuration
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What was missing or invalid
        message: String,
    },

    /// Language detection produced no usable result
    #[error("Detection error: {message}")]
    DetectionError {
        /// Why no language could be extracted
        message: String,
    },

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslateError>;
