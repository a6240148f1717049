//! Per-request issuance options.

use crate::error::TokenError;
use crate::jwt::ServiceClaims;
use serde_json::Value;

/// Parameters for one authentication or issuance call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthenticateOptions {
    /// Subject of the issued tokens
    pub user_id: Option<String>,
    /// Claims a calling service attaches to the access token
    pub service_claims: ServiceClaims,
    /// Superuser flag
    pub su: Option<bool>,
    /// Access token lifetime override in seconds; zero means unset
    pub token_expiry: Option<u64>,
}

impl AuthenticateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn with_service_claims(mut self, claims: ServiceClaims) -> Self {
        self.service_claims = claims;
        self
    }

    /// Attach one service claim.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ReservedClaim`] if `key` is a reserved name.
    pub fn with_service_claim(
        mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Self, TokenError> {
        self.service_claims.insert(key, value)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_su(mut self, su: bool) -> Self {
        self.su = Some(su);
        self
    }

    #[must_use]
    pub fn with_token_expiry(mut self, secs: u64) -> Self {
        self.token_expiry = Some(secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let options = AuthenticateOptions::new()
            .with_user_id("u1")
            .with_su(true)
            .with_token_expiry(60)
            .with_service_claim("team", json!("blue"))
            .unwrap();

        assert_eq!(options.user_id.as_deref(), Some("u1"));
        assert_eq!(options.su, Some(true));
        assert_eq!(options.token_expiry, Some(60));
        assert_eq!(options.service_claims.get("team"), Some(&json!("blue")));
    }

    #[test]
    fn test_reserved_service_claim_rejected() {
        let err = AuthenticateOptions::new()
            .with_service_claim("iss", json!("api_keys/evil"))
            .unwrap_err();
        assert!(matches!(err, TokenError::ReservedClaim(ref name) if name == "iss"));
    }
}
