//! Error types and handling for dex-core operations.
//!
//! Errors are categorized for logging and exit-code mapping, and carry a
//! recoverability hint used by callers deciding whether a fresh trigger is worth it.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: cache directory and file access
//! - **Network Errors**: transport failures and non-2xx responses
//! - **Decode Errors**: response bodies that don't match the expected shape
//! - **Storage Errors**: key-value cache operations
//! - **Configuration Errors**: unreadable or invalid config files
//!
//! ```rust
//! use dex_core::Error;
//!
//! let err = Error::NotFound("pokemon/9999".to_string());
//! assert_eq!(err.category(), "not_found");
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for dex-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers transport errors, timeouts, and non-2xx responses other than 404.
    /// The underlying `reqwest::Error` is preserved so the status can be inspected.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote API answered 404 for a list or detail request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is malformed or no identifier can be derived from it.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A value could not be interpreted as an item identifier.
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// A response body did not match the expected JSON shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Key-value cache operation failed.
    ///
    /// ## Common Causes
    ///
    /// - Cache directory not writable
    /// - Key that cannot be mapped onto a file name
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization of cached data failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Check if the error might go away when the same request is triggered again.
    ///
    /// Timeouts, connection failures, 5xx and 429 responses, and interrupted I/O
    /// are considered transient. Everything else is permanent.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| {
                        s.is_server_error() || s == reqwest::StatusCode::TOO_MANY_REQUESTS
                    })
            },
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Used for structured logging and for mapping errors onto CLI exit codes.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(e) if e.is_timeout() => "timeout",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::InvalidId(_) => "invalid_id",
            Self::Decode(_) => "decode",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
