//! Parse error types.

use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text is invalid.
    #[error("Invalid source: {message}")]
    InvalidSource {
        /// Error message.
        message: String,
        /// Byte offset where the error occurred.
        offset: Option<usize>,
    },

    /// The source is too large to be addressed by 32-bit spans.
    #[error("Source too large: {0} bytes")]
    TooLarge(usize),
}

impl ParseError {
    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset: None,
        }
    }

    /// Checks that `source` fits in a [`autoissues_ast::Span`].
    pub(crate) fn check_len(source: &str) -> Result<(), Self> {
        if u32::try_from(source.len()).is_err() {
            return Err(Self::TooLarge(source.len()));
        }
        Ok(())
    }
}
