//! Error taxonomy for grant exchange, token issuance and service transport.

use reqwest::header::HeaderMap;
use rust_common::PlatformError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a presented token was not accepted.
///
/// The variants are kept apart for diagnostics; callers should not branch
/// on them beyond reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenRejection {
    /// Signature verified but `exp` plus leeway lies in the past.
    Expired,
    /// Malformed token, bad signature, wrong issuer or tenant, missing `exp`.
    Invalid,
    /// The token does not carry `refresh: true`.
    MissingRefreshClaim,
    /// The token subject differs from the requesting user.
    SubjectMismatch,
}

impl TokenRejection {
    /// Short label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Invalid => "invalid",
            Self::MissingRefreshClaim => "missing_refresh_claim",
            Self::SubjectMismatch => "subject_mismatch",
        }
    }

    /// Human-readable description of a refresh token rejection.
    #[must_use]
    pub const fn refresh_description(&self) -> &'static str {
        match self {
            Self::Expired => "Refresh token has expired",
            Self::Invalid => "Refresh token is invalid",
            Self::MissingRefreshClaim => "Refresh token does not have a refresh claim",
            Self::SubjectMismatch => "Refresh token has an invalid user id",
        }
    }

    /// Human-readable description of an access token rejection.
    #[must_use]
    pub const fn access_description(&self) -> &'static str {
        match self {
            Self::Expired => "Access token has expired",
            Self::Invalid | Self::MissingRefreshClaim | Self::SubjectMismatch => {
                "Access token is invalid"
            }
        }
    }
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream service answered with a 4xx or 5xx status.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body, or the canonical reason phrase when the body is empty
    pub description: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.description)
    }
}

/// JSON error body handed to the HTTP layer: `{error, error_description}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description
    pub error_description: String,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Unsupported grant type: {}", .0.as_deref().unwrap_or("<missing>"))]
    UnsupportedGrantType(Option<String>),

    #[error("Invalid refresh token: {0}")]
    InvalidRefreshToken(TokenRejection),

    #[error("Invalid access token: {0}")]
    InvalidAccessToken(TokenRejection),

    #[error("Reserved claim name: {0}")]
    ReservedClaim(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT encoding error: {0}")]
    JwtEncoding(String),

    #[error("Transport error: {0}")]
    Transport(#[from] PlatformError),

    #[error("Service error response {0}")]
    ErrorResponse(ErrorResponse),

    #[error("Unsupported redirect response: {0}")]
    UnsupportedRedirect(u16),

    #[error("Unsupported response code: {0}")]
    UnsupportedStatus(u16),
}

impl TokenError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Only transient transport failures are worth retrying; grant
    /// rejections always need a new credential or a corrected request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_retryable(),
            Self::ErrorResponse(resp) => matches!(resp.status, 502..=504),
            _ => false,
        }
    }

    /// HTTP status the boundary should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedGrantType(_)
            | Self::InvalidRefreshToken(_)
            | Self::InvalidAccessToken(_) => 401,
            Self::ReservedClaim(_) => 400,
            Self::Config(_) | Self::JwtEncoding(_) => 500,
            Self::Transport(_) => 502,
            Self::ErrorResponse(resp) => resp.status,
            Self::UnsupportedRedirect(status) | Self::UnsupportedStatus(status) => *status,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedGrantType(_) => INVALID_GRANT_TYPE,
            Self::InvalidRefreshToken(_) => INVALID_REFRESH_TOKEN,
            Self::InvalidAccessToken(_) => INVALID_TOKEN,
            Self::ReservedClaim(_) => INVALID_REQUEST,
            _ => SERVER_ERROR,
        }
    }

    /// Build the `{error, error_description}` body. Internal failures are
    /// reported generically so configuration and transport details stay
    /// server-side.
    #[must_use]
    pub fn error_body(&self) -> ErrorBody {
        let error_description = match self {
            Self::UnsupportedGrantType(Some(grant_type)) => {
                format!("The grant_type provided, {grant_type}, is unsupported")
            }
            Self::UnsupportedGrantType(None) => "No grant_type was provided".to_string(),
            Self::InvalidRefreshToken(reason) => reason.refresh_description().to_string(),
            Self::InvalidAccessToken(reason) => reason.access_description().to_string(),
            Self::ReservedClaim(name) => {
                format!("The claim name {name} is reserved and cannot be set by a service")
            }
            _ => "The server could not complete the request".to_string(),
        };

        ErrorBody {
            error: self.error_code().to_string(),
            error_description,
        }
    }
}

impl From<reqwest::Error> for TokenError {
    fn from(err: reqwest::Error) -> Self {
        TokenError::Transport(PlatformError::from(err))
    }
}

// Error codes for HTTP error bodies
pub const INVALID_GRANT_TYPE: &str = "invalid_grant_type";
pub const INVALID_REFRESH_TOKEN: &str = "invalid_refresh_token";
pub const INVALID_TOKEN: &str = "invalid_token";
pub const INVALID_REQUEST: &str = "invalid_request";
pub const SERVER_ERROR: &str = "server_error";
