//! Error types using thiserror 2.0.
//!
//! Every bootstrap and renewal failure is classified here; only the
//! narrow `Unavailable`/`InvalidInput`/`WriteFailed` kinds cross the
//! `SecretClient` boundary.

use thiserror::Error;

/// Errors raised by the session client.
#[derive(Error, Debug)]
pub enum VaultError {
    /// A required bootstrap input was absent or empty
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// The secret store explicitly refused the login
    #[error("authentication rejected: {0}")]
    AuthenticationRejected(String),

    /// Network, timeout or unexpected error during an outbound call
    #[error("transport failure: {0}")]
    Transport(String),

    /// Renewal refused by the store (e.g. maximum lifetime reached)
    #[error("renewal rejected: {0}")]
    RenewalRejected(String),

    /// Read succeeded at the transport level but the path or field had no value
    #[error("secret not found at path: {0}")]
    NotFound(String),

    /// No usable session; the store is currently considered unreachable
    #[error("secret store unavailable")]
    Unavailable,

    /// Caller passed an empty or malformed argument
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A secret write was attempted and the store reported a failure
    #[error("write to {path} failed: {source}")]
    WriteFailed {
        /// The path the write was addressed to
        path: String,
        /// The underlying classified failure
        #[source]
        source: Box<VaultError>,
    },

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for session client operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Check if error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Http(_) | Self::Unavailable
        )
    }

    /// Create a transport failure.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a missing credential error.
    #[must_use]
    pub fn missing_credential(msg: impl Into<String>) -> Self {
        Self::MissingCredential(msg.into())
    }

    /// Create an authentication rejected error.
    #[must_use]
    pub fn auth_rejected(msg: impl Into<String>) -> Self {
        Self::AuthenticationRejected(msg.into())
    }

    /// Create a renewal rejected error.
    #[must_use]
    pub fn renewal_rejected(msg: impl Into<String>) -> Self {
        Self::RenewalRejected(msg.into())
    }

    /// Create a not found error for the given path.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Wrap a store-side failure for a write to `path`.
    #[must_use]
    pub fn write_failed(path: impl Into<String>, source: Self) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
