//! Error types for the tariff tool server.

use thiserror::Error;

/// Library-level error type for tariff-mcp operations.
#[derive(Error, Debug)]
pub enum TariffError {
    #[error("Missing required environment variable: {0}")]
    MissingConfig(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Tariff API returned {status}: {body}")]
    TariffApi { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl TariffError {
    /// Whether this error was raised before any downstream call was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(self, TariffError::InvalidInput(_))
    }
}

/// Result type alias for tariff-mcp operations.
pub type Result<T> = std::result::Result<T, TariffError>;
