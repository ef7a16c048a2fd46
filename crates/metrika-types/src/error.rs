//! Error types for metrika

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Health store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Health data store is not available on this host")]
    Unavailable,

    #[error("Authorization denied for: {0}")]
    AuthorizationDenied(String),

    #[error("Could not save {0}")]
    WriteFailed(String),

    #[error("Store IO error: {0}")]
    IoError(String),

    #[error("Store data corrupted: {0}")]
    Corrupted(String),
}

/// Text recognition errors
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Recognizer command is not configured")]
    NotConfigured,

    #[error("Recognizer command is invalid: {0}")]
    InvalidCommand(String),

    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("Recognition cache IO error: {0}")]
    CacheIo(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Recognition error: {0}")]
    Vision(#[from] VisionError),

    #[error("Operation timed out after {0}s")]
    Timeout(u64),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("CSV export error: {0}")]
    CsvExport(String),
}

pub type Result<T> = std::result::Result<T, Error>;
