//! Grant dispatch and refresh token validation.

use crate::clock::{Clock, SystemClock};
use crate::error::{TokenError, TokenRejection};
use crate::grant::request::{GrantRequest, GrantType};
use crate::grant::response::{AuthenticationResponse, AuthenticationResult};
use crate::jwt::{AccessTokenClaims, IssuedToken, TokenIssuer};
use crate::metrics;
use crate::options::AuthenticateOptions;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Exchanges grants for token pairs on behalf of one tenant key.
///
/// Every call is independent. Nothing is stored between calls, so a
/// presented refresh token stays usable until it expires.
pub struct Authenticator {
    issuer: TokenIssuer,
    clock: Arc<dyn Clock>,
}

impl Authenticator {
    #[must_use]
    pub fn new(issuer: TokenIssuer) -> Self {
        Self::with_clock(issuer, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(issuer: TokenIssuer, clock: Arc<dyn Clock>) -> Self {
        Self { issuer, clock }
    }

    #[must_use]
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    #[must_use]
    pub fn into_issuer(self) -> TokenIssuer {
        self.issuer
    }

    /// Dispatch a grant request and return a fresh token pair.
    ///
    /// # Errors
    ///
    /// - [`TokenError::UnsupportedGrantType`] for a missing or unknown grant type
    /// - [`TokenError::InvalidRefreshToken`] when a refresh grant fails validation
    pub fn authenticate(
        &self,
        request: &GrantRequest,
        options: &AuthenticateOptions,
    ) -> AuthenticationResult {
        let Some(grant_type) = request.grant_type.as_deref().and_then(GrantType::parse) else {
            warn!(grant_type = ?request.grant_type, "Unsupported grant type");
            metrics::record_grant("unsupported", "rejected");
            return Err(TokenError::UnsupportedGrantType(request.grant_type.clone()));
        };

        let result = match grant_type {
            GrantType::ClientCredentials => self.issue_pair(options),
            GrantType::RefreshToken => self.refresh(request.refresh_token.as_deref(), options),
        };

        let outcome = if result.is_ok() { "issued" } else { "rejected" };
        metrics::record_grant(grant_type.as_str(), outcome);
        result
    }

    /// Issue an access token without a refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::JwtEncoding`] if signing fails.
    pub fn generate_access_token(
        &self,
        options: &AuthenticateOptions,
    ) -> Result<IssuedToken, TokenError> {
        let issued = self.issuer.issue_access_token(options, self.clock.now())?;
        info!(
            instance_id = %self.issuer.identity().instance_id(),
            user_id = ?options.user_id,
            expires_in = issued.expires_in,
            "Issued access token"
        );
        Ok(issued)
    }

    /// Issue a short-lived `su: true` access token for the SDK's own
    /// requests to platform services.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::JwtEncoding`] if signing fails.
    pub fn generate_superuser_token(&self) -> Result<IssuedToken, TokenError> {
        let options = AuthenticateOptions::new()
            .with_su(true)
            .with_token_expiry(self.issuer.policy().superuser_token_expiry);
        let issued = self.issuer.issue_access_token(&options, self.clock.now())?;
        debug!(expires_in = issued.expires_in, "Issued superuser token");
        Ok(issued)
    }

    /// Verify an access token minted by this tenant key.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidAccessToken`] with the rejection reason.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        self.issuer
            .verify_access_token(token, self.clock.now())
            .map_err(|reason| {
                warn!(reason = %reason, "Access token rejected");
                TokenError::InvalidAccessToken(reason)
            })
    }

    fn refresh(&self, token: Option<&str>, options: &AuthenticateOptions) -> AuthenticationResult {
        self.validate_refresh_token(token, options).map_err(|reason| {
            warn!(
                instance_id = %self.issuer.identity().instance_id(),
                reason = %reason,
                "Refresh token rejected"
            );
            metrics::record_refresh_rejection(reason.as_str());
            TokenError::InvalidRefreshToken(reason)
        })?;

        self.issue_pair(options)
    }

    fn validate_refresh_token(
        &self,
        token: Option<&str>,
        options: &AuthenticateOptions,
    ) -> Result<(), TokenRejection> {
        let token = token.ok_or(TokenRejection::Invalid)?;
        let claims = self.issuer.verify_refresh_token(token, self.clock.now())?;

        if !claims.is_refresh() {
            return Err(TokenRejection::MissingRefreshClaim);
        }
        if claims.sub != options.user_id {
            return Err(TokenRejection::SubjectMismatch);
        }
        debug!(iat = claims.iat, exp = claims.exp, "Refresh token accepted");
        Ok(())
    }

    fn issue_pair(&self, options: &AuthenticateOptions) -> AuthenticationResult {
        let now = self.clock.now();
        let access = self.issuer.issue_access_token(options, now)?;
        let refresh_token = self.issuer.issue_refresh_token(options, now)?;

        info!(
            instance_id = %self.issuer.identity().instance_id(),
            user_id = ?options.user_id,
            expires_in = access.expires_in,
            "Issued token pair"
        );

        Ok(AuthenticationResponse::bearer(
            access.token,
            access.expires_in,
            refresh_token,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::TokenPolicy;
    use crate::identity::Identity;
    use crate::jwt::JwtSerializer;
    use jsonwebtoken::EncodingKey;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn authenticator() -> (Authenticator, Arc<FixedClock>) {
        let identity = Identity::new("inst1", "key1", "s3cr3t").unwrap();
        let clock = Arc::new(FixedClock::new(NOW));
        let issuer = TokenIssuer::new(identity, TokenPolicy::default());
        (Authenticator::with_clock(issuer, clock.clone()), clock)
    }

    fn user(id: &str) -> AuthenticateOptions {
        AuthenticateOptions::new().with_user_id(id)
    }

    #[test]
    fn test_client_credentials_issues_pair() {
        let (auth, _) = authenticator();
        let response = auth
            .authenticate(&GrantRequest::client_credentials(), &user("u1"))
            .unwrap();

        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.expires_in, 86_400);

        let claims = auth.verify_access_token(&response.access_token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("u1"));
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_refresh_grant_issues_new_pair() {
        let (auth, clock) = authenticator();
        let first = auth
            .authenticate(&GrantRequest::client_credentials(), &user("u1"))
            .unwrap();

        clock.advance(60);
        let second = auth
            .authenticate(&GrantRequest::refresh(first.refresh_token.clone()), &user("u1"))
            .unwrap();

        assert_ne!(second.access_token, first.access_token);
        assert_ne!(second.refresh_token, first.refresh_token);
    }

    #[test]
    fn test_unsupported_grant_types() {
        let (auth, _) = authenticator();
        for grant_type in [None, Some("password"), Some(""), Some("REFRESH_TOKEN")] {
            let request = GrantRequest {
                grant_type: grant_type.map(str::to_string),
                refresh_token: None,
            };
            let err = auth.authenticate(&request, &user("u1")).unwrap_err();
            assert!(matches!(
                err,
                TokenError::UnsupportedGrantType(ref g) if g.as_deref() == grant_type
            ));
        }
    }

    #[test]
    fn test_missing_refresh_token_is_invalid() {
        let (auth, _) = authenticator();
        let request = GrantRequest {
            grant_type: Some("refresh_token".to_string()),
            refresh_token: None,
        };
        let err = auth.authenticate(&request, &user("u1")).unwrap_err();
        assert!(matches!(err, TokenError::InvalidRefreshToken(TokenRejection::Invalid)));
    }

    #[test]
    fn test_subject_mismatch() {
        let (auth, _) = authenticator();
        let pair = auth
            .authenticate(&GrantRequest::client_credentials(), &user("u1"))
            .unwrap();

        let err = auth
            .authenticate(&GrantRequest::refresh(pair.refresh_token.clone()), &user("u2"))
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidRefreshToken(TokenRejection::SubjectMismatch)));

        let err = auth
            .authenticate(&GrantRequest::refresh(pair.refresh_token), &AuthenticateOptions::new())
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidRefreshToken(TokenRejection::SubjectMismatch)));
    }

    #[test]
    fn test_anonymous_subjects_match() {
        let (auth, _) = authenticator();
        let pair = auth
            .authenticate(&GrantRequest::client_credentials(), &AuthenticateOptions::new())
            .unwrap();
        assert!(auth
            .authenticate(&GrantRequest::refresh(pair.refresh_token), &AuthenticateOptions::new())
            .is_ok());
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let (auth, _) = authenticator();
        let pair = auth
            .authenticate(&GrantRequest::client_credentials(), &user("u1"))
            .unwrap();

        let err = auth
            .authenticate(&GrantRequest::refresh(pair.access_token), &user("u1"))
            .unwrap_err();
        assert!(matches!(
            err,
            TokenError::InvalidRefreshToken(TokenRejection::MissingRefreshClaim)
        ));
    }

    #[test]
    fn test_non_boolean_refresh_marker_rejected() {
        let (auth, _) = authenticator();
        let payload = json!({
            "instance": "inst1",
            "iss": "api_keys/key1",
            "iat": NOW,
            "exp": NOW + 600,
            "sub": "u1",
            "refresh": "true",
            "jti": "j",
        });
        let token = JwtSerializer::new()
            .serialize(&payload, &EncodingKey::from_secret(b"s3cr3t"))
            .unwrap();

        let err = auth
            .authenticate(&GrantRequest::refresh(token), &user("u1"))
            .unwrap_err();
        assert!(matches!(
            err,
            TokenError::InvalidRefreshToken(TokenRejection::MissingRefreshClaim)
        ));
    }

    #[test]
    fn test_expired_refresh_token() {
        let (auth, clock) = authenticator();
        let pair = auth
            .authenticate(&GrantRequest::client_credentials(), &user("u1"))
            .unwrap();

        clock.advance(604_800 + 31);
        let err = auth
            .authenticate(&GrantRequest::refresh(pair.refresh_token), &user("u1"))
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidRefreshToken(TokenRejection::Expired)));
    }

    #[test]
    fn test_refresh_token_from_other_key_is_invalid() {
        let (auth, _) = authenticator();
        let other = Authenticator::with_clock(
            TokenIssuer::new(
                Identity::new("inst1", "key1", "other-secret").unwrap(),
                TokenPolicy::default(),
            ),
            Arc::new(FixedClock::new(NOW)),
        );
        let pair = other
            .authenticate(&GrantRequest::client_credentials(), &user("u1"))
            .unwrap();

        let err = auth
            .authenticate(&GrantRequest::refresh(pair.refresh_token), &user("u1"))
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidRefreshToken(TokenRejection::Invalid)));
    }

    #[test]
    fn test_superuser_token() {
        let (auth, _) = authenticator();
        let issued = auth.generate_superuser_token().unwrap();
        assert_eq!(issued.expires_in, 300);

        let claims = auth.verify_access_token(&issued.token).unwrap();
        assert!(claims.is_superuser());
        assert!(claims.sub.is_none());
    }

    #[test]
    fn test_verify_expired_access_token() {
        let (auth, clock) = authenticator();
        let issued = auth.generate_access_token(&user("u1")).unwrap();

        clock.advance(86_400 + 31);
        let err = auth.verify_access_token(&issued.token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidAccessToken(TokenRejection::Expired)));
    }
}
