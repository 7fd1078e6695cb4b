//! Error types for Lobster Core

use thiserror::Error;

/// Result type alias for lobster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lobster error types
///
/// Every variant is terminal: nothing in the pipeline retries or recovers.
#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config error: {context}")]
    ConfigIo {
        context: String,
        source: std::io::Error,
    },

    // Fetch errors
    #[error("Failed to fetch sources: {0}")]
    Fetch(String),

    #[error("Request to {url} failed")]
    Http { url: String, source: reqwest::Error },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // Decode errors
    #[error("Failed to decode payload: {0}")]
    Decode(String),

    #[error("Failed to decode payload")]
    Json(#[from] serde_json::Error),

    // Validation errors
    #[error("No playable source for quality '{quality}'")]
    NoMediaUrl { quality: String },

    // Launch errors
    #[error("Failed to start player '{program}'")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Player '{program}' exited with {status}")]
    PlayerExit { program: String, status: String },

    #[error("Player '{program}' interrupted")]
    Interrupted { program: String },
}

impl Error {
    /// Create a config error carrying an I/O cause
    pub fn config_io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::ConfigIo {
            context: context.into(),
            source,
        }
    }

    /// Pipeline stage the error belongs to
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::ConfigIo { .. } => "config",
            Error::Fetch(_) | Error::Http { .. } | Error::Timeout { .. } => "fetch",
            Error::Decode(_) | Error::Json(_) => "decode",
            Error::NoMediaUrl { .. } => "validation",
            Error::Spawn { .. } | Error::PlayerExit { .. } | Error::Interrupted { .. } => "launch",
        }
    }

    /// Returns the stable error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG",
            Error::ConfigIo { .. } => "CONFIG_IO",
            Error::Fetch(_) => "FETCH",
            Error::Http { .. } => "FETCH_HTTP",
            Error::Timeout { .. } => "FETCH_TIMEOUT",
            Error::Decode(_) => "DECODE",
            Error::Json(_) => "DECODE_JSON",
            Error::NoMediaUrl { .. } => "NO_MEDIA_URL",
            Error::Spawn { .. } => "LAUNCH_SPAWN",
            Error::PlayerExit { .. } => "LAUNCH_EXIT",
            Error::Interrupted { .. } => "LAUNCH_INTERRUPTED",
        }
    }
}
