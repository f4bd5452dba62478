//! Core error types.

use autoissues_parser::ParseError;
use autoissues_tracker::TrackerError;
use thiserror::Error;

/// Errors that can occur while configuring or running the issue transforms.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tracker backend error.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Persisted cache could not be read or written.
    #[error("Cache error: {0}")]
    Cache(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    /// Returns true if the error must be fixed in the configuration.
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Tracker(e) => e.is_config(),
            _ => false,
        }
    }
}
