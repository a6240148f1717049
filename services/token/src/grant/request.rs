use serde::{Deserialize, Serialize};
use std::fmt;

/// Grant types understood by the authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantType {
    ClientCredentials,
    RefreshToken,
}

impl GrantType {
    /// Parse a `grant_type` field. Matching is exact and case-sensitive.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "client_credentials" => Some(Self::ClientCredentials),
            "refresh_token" => Some(Self::RefreshToken),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClientCredentials => "client_credentials",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grant payload as received from the client, already parsed from the
/// request body.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl GrantRequest {
    #[must_use]
    pub fn client_credentials() -> Self {
        Self {
            grant_type: Some(GrantType::ClientCredentials.as_str().to_string()),
            refresh_token: None,
        }
    }

    #[must_use]
    pub fn refresh(token: impl Into<String>) -> Self {
        Self {
            grant_type: Some(GrantType::RefreshToken.as_str().to_string()),
            refresh_token: Some(token.into()),
        }
    }
}

// Refresh tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for GrantRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrantRequest")
            .field("grant_type", &self.grant_type)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
