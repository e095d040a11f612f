//! Common error types for revisit

use thiserror::Error;

/// Common result type for revisit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the revisit client and server
#[derive(Error, Debug)]
pub enum Error {
    /// Strong-identity provider is missing or failed to initialize.
    /// Fatal to the identification flow: no soft-only fallback exists.
    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Strong-identity provider loaded but its computation failed.
    /// Fatal to the identification flow, same as [`Error::ProviderUnavailable`].
    #[error("Identity provider error: {0}")]
    ProviderError(String),

    /// Failed, aborted, or non-OK network round trip. Retryable per the
    /// calling component's policy; never to be conflated with "no match".
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid user input. Local and non-fatal; no network call was issued.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Backend declined to acknowledge a store request.
    #[error("Save was not acknowledged by the backend")]
    SaveFailed,

    /// Backend declined to acknowledge a delete request.
    #[error("Forget was not acknowledged by the backend")]
    DeleteFailed,

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for failures that a retry policy may legitimately retry.
    ///
    /// Only transport-level failures qualify: provider failures are fatal,
    /// validation failures are local, and negative acknowledgements are
    /// definitive answers from the backend.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
