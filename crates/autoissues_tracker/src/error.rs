//! Error types for tracker lookups.

use thiserror::Error;

/// Errors raised by tracker backends and the registry.
///
/// Failed lookups (network errors, unexpected status codes) are not errors:
/// backends log a warning and report the issue as not found. Only problems
/// the user has to fix in the configuration surface here.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracker configuration is unusable for this backend.
    #[error("Invalid tracker configuration: {0}")]
    Config(String),

    /// No backend is registered under the requested name.
    #[error("Unknown issue tracker: {0}")]
    UnknownTracker(String),

    /// The HTTP client could not be created.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl TrackerError {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true if this error comes from the user's configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnknownTracker(_))
    }
}
