//! Error types for the Finboard client library.

/// All errors that can occur when using the Finboard client.
#[derive(Debug, thiserror::Error)]
pub enum FinboardError {
    /// HTTP transport failed (connection, TLS, timeout, body read).
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// A file was rejected before upload.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
}

/// Coarse, copyable classification of a [`FinboardError`].
///
/// Carried by [`crate::fetch::FetchOutcome`] so callers can tell why a
/// page walk stopped early without holding on to the error itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network or transport failure.
    Transport,
    /// Non-success HTTP status.
    Api {
        /// HTTP status code.
        status: u16,
    },
    /// Response body could not be decoded.
    Decode,
    /// Client-side configuration or input was rejected.
    Config,
}

impl FinboardError {
    /// Returns the coarse classification of this error.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Http(_) => ErrorKind::Transport,
            Self::Api { status, .. } => ErrorKind::Api { status },
            Self::Serialization(_) => ErrorKind::Decode,
            Self::InvalidBaseUrl(_) | Self::InvalidUpload(_) => ErrorKind::Config,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, FinboardError>;
