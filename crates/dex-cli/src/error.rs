//! CLI error handling with semantic exit codes.
//!
//! Errors are categorized so that scripts can branch on the exit status.
//!
//! # Exit Code Categories
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Command completed successfully |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Invalid arguments or configuration |
//! | 3 | `NotFound` | Requested item not found |
//! | 5 | `Network` | Network or fetch failure |
//! | 6 | `Timeout` | Request timed out |
//!
//! # Usage
//!
//! ```bash
//! dex fav missingno
//! case $? in
//!     0) echo "Toggled" ;;
//!     3) echo "No such creature" ;;
//!     *) echo "Other error" ;;
//! esac
//! ```

use std::fmt;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    ///
    /// Also used for undecodable responses and local storage failures.
    Internal = 1,

    /// Invalid arguments or configuration (exit code 2).
    Usage = 2,

    /// Requested item not found (exit code 3).
    NotFound = 3,

    /// Network or fetch failure (exit code 5).
    ///
    /// HTTP errors, DNS failures, refused connections.
    Network = 5,

    /// Request timed out (exit code 6).
    Timeout = 6,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::NotFound => "not found",
            Self::Network => "network error",
            Self::Timeout => "timeout",
        }
    }

    /// Infer the error category from an error message.
    ///
    /// Fallback for errors that reach `main` without a category.
    #[must_use]
    pub fn infer_from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Check before Network so "connection timed out" is categorized correctly
        if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            return Self::Timeout;
        }

        if msg_lower.contains("not found") || msg_lower.contains("no such") {
            return Self::NotFound;
        }

        if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("dns")
            || msg_lower.contains("http")
            || msg_lower.contains("unreachable")
        {
            return Self::Network;
        }

        if msg_lower.contains("configuration")
            || msg_lower.contains("invalid identifier")
            || msg_lower.contains("invalid argument")
        {
            return Self::Usage;
        }

        Self::Internal
    }

    /// Category for an error raised by `dex-core`.
    #[must_use]
    pub fn from_core(err: &dex_core::Error) -> Self {
        Self::from_core_category(err.category())
    }

    /// Category for a `dex_core::Error::category` name.
    #[must_use]
    pub fn from_core_category(category: &str) -> Self {
        match category {
            "timeout" => Self::Timeout,
            "network" => Self::Network,
            "not_found" => Self::NotFound,
            "config" | "invalid_id" | "invalid_url" => Self::Usage,
            _ => Self::Internal,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// Wraps an `anyhow::Error` so context chains survive.
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<dex_core::Error> for CliError {
    fn from(err: dex_core::Error) -> Self {
        Self::new(ErrorCategory::from_core(&err), err)
    }
}

/// Determine the exit code from an `anyhow::Error`.
///
/// A `CliError` (or a `dex_core::Error`) anywhere in the chain decides the
/// code; otherwise the category is inferred from the message.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return cli_err.exit_code();
        }
        if let Some(core_err) = cause.downcast_ref::<dex_core::Error>() {
            return ErrorCategory::from_core(core_err).exit_code();
        }
    }

    ErrorCategory::infer_from_message(&err.to_string()).exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    mod error_category {
        use super::*;

        #[test]
        fn test_exit_codes() {
            assert_eq!(ErrorCategory::Internal.exit_code(), 1);
            assert_eq!(ErrorCategory::Usage.exit_code(), 2);
            assert_eq!(ErrorCategory::NotFound.exit_code(), 3);
            assert_eq!(ErrorCategory::Network.exit_code(), 5);
            assert_eq!(ErrorCategory::Timeout.exit_code(), 6);
        }

        #[test]
        fn test_infer_from_message() {
            assert_eq!(
                ErrorCategory::infer_from_message("Network error: error sending request"),
                ErrorCategory::Network
            );
            assert_eq!(
                ErrorCategory::infer_from_message(
                    "Network error: error sending request: operation timed out"
                ),
                ErrorCategory::Timeout
            );
            assert_eq!(
                ErrorCategory::infer_from_message("Not found: Resource not found at 'x'"),
                ErrorCategory::NotFound
            );
            assert_eq!(
                ErrorCategory::infer_from_message("Something went wrong"),
                ErrorCategory::Internal
            );
        }

        #[test]
        fn test_from_core_category() {
            assert_eq!(
                ErrorCategory::from_core_category("timeout"),
                ErrorCategory::Timeout
            );
            assert_eq!(
                ErrorCategory::from_core_category("decode"),
                ErrorCategory::Internal
            );
        }

        #[test]
        fn test_from_core() {
            assert_eq!(
                ErrorCategory::from_core(&dex_core::Error::NotFound("pokemon/0".into())),
                ErrorCategory::NotFound
            );
            assert_eq!(
                ErrorCategory::from_core(&dex_core::Error::Config("bad".into())),
                ErrorCategory::Usage
            );
            assert_eq!(
                ErrorCategory::from_core(&dex_core::Error::InvalidId("a/b".into())),
                ErrorCategory::Usage
            );
            assert_eq!(
                ErrorCategory::from_core(&dex_core::Error::Storage("disk full".into())),
                ErrorCategory::Internal
            );
        }
    }

    mod cli_error {
        use super::*;

        #[test]
        fn test_new() {
            let err = CliError::new(ErrorCategory::NotFound, anyhow!("No such creature"));
            assert_eq!(err.category, ErrorCategory::NotFound);
            assert_eq!(err.exit_code(), 3);
        }

        #[test]
        fn test_display() {
            let err = CliError::new(ErrorCategory::Usage, anyhow!("--pages must be at least 1"));
            assert_eq!(err.to_string(), "--pages must be at least 1");
        }
    }

    mod exit_code_from_error {
        use super::*;

        #[test]
        fn test_cli_error() {
            let err: anyhow::Error = CliError::new(ErrorCategory::NotFound, anyhow!("gone")).into();
            assert_eq!(exit_code_from_error(&err), 3);
        }

        #[test]
        fn test_core_error_with_context() {
            let result: Result<(), dex_core::Error> =
                Err(dex_core::Error::NotFound("pokemon/9999".into()));
            let err = result.context("Failed to load details").unwrap_err();
            assert_eq!(exit_code_from_error(&err), 3);
        }

        #[test]
        fn test_regular_error() {
            let err = anyhow!("Operation timed out");
            assert_eq!(exit_code_from_error(&err), 6);
        }
    }
}
