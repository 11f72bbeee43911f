//! Error types for the corx_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for corx_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Startup data missing or malformed (rule table, record table)
    #[error("Load error: {0}")]
    Load(String),

    /// Missing required input; recoverable, the caller retries
    #[error("Validation error: {0}")]
    Validation(String),

    /// PDF rendering error
    #[error("PDF error: {0}")]
    Pdf(String),
}
