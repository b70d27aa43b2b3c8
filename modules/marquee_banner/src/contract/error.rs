//! Contract error types for the marquee banner
//!
//! Malformed settings never produce an error: they fall back to defaults during
//! validation. These errors only cover collaborators failing (storage) and
//! requests that cannot be interpreted at all.

/// Banner service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BannerError {
    /// Settings store failed
    #[error("Settings storage failed: {0}")]
    Storage(String),

    /// Request could not be interpreted
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// Internal error
    #[error("Internal error")]
    Internal,
}

impl BannerError {
    pub fn storage(error: impl std::fmt::Display) -> Self {
        Self::Storage(error.to_string())
    }
}
