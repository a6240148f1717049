//! Centralized transport error type.
//!
//! Errors raised while talking to platform services are collected here so
//! every caller classifies them the same way.

use thiserror::Error;

/// Common error type for platform transport operations.
///
/// All errors are classified as either retryable or non-retryable,
/// which helps callers decide whether to retry failed operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A service URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Timeout occurred
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlatformError {
    /// Check if this error is retryable.
    ///
    /// Connection failures, timeouts and temporary unavailability are
    /// retryable. Everything else needs the caller to change something.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_common::PlatformError;
    ///
    /// let err = PlatformError::unavailable("maintenance");
    /// assert!(err.is_retryable());
    ///
    /// let err = PlatformError::invalid_input("bad header");
    /// assert!(!err.is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::Unavailable(_) | Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// Create an unavailable error with the given message.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an internal error with the given message.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(PlatformError::unavailable("test").is_retryable());
        assert!(PlatformError::Timeout("test".to_string()).is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!PlatformError::invalid_input("test").is_retryable());
        assert!(!PlatformError::internal("test").is_retryable());

        let parse_err = url::Url::parse("not a url").unwrap_err();
        assert!(!PlatformError::from(parse_err).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = PlatformError::unavailable("cluster draining");
        assert_eq!(err.to_string(), "Service unavailable: cluster draining");

        let err = PlatformError::invalid_input("header name");
        assert_eq!(err.to_string(), "Invalid input: header name");
    }
}
