//! Access and refresh token issuance for one tenant key.

use crate::config::TokenPolicy;
use crate::error::{TokenError, TokenRejection};
use crate::identity::Identity;
use crate::jwt::claims::{AccessTokenClaims, RefreshTokenClaims};
use crate::jwt::serializer::JwtSerializer;
use crate::metrics;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A signed token and its lifetime in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// Mints and verifies tokens signed with a tenant's key secret.
///
/// Holds no mutable state: every method is a function of its inputs, the
/// identity and the policy, so one issuer can be shared across threads.
pub struct TokenIssuer {
    identity: Identity,
    issuer: String,
    policy: TokenPolicy,
    serializer: JwtSerializer,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(identity: Identity, policy: TokenPolicy) -> Self {
        let encoding_key = EncodingKey::from_secret(identity.secret_bytes());
        let decoding_key = DecodingKey::from_secret(identity.secret_bytes());
        let issuer = identity.issuer();

        TokenIssuer {
            identity,
            issuer,
            policy,
            serializer: JwtSerializer::new(),
            encoding_key,
            decoding_key,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Claims an access token issued at `now` would carry.
    #[must_use]
    pub fn access_token_claims(
        &self,
        options: &crate::AuthenticateOptions,
        now: i64,
    ) -> AccessTokenClaims {
        let expiry = self.policy.resolve_access_expiry(options.token_expiry);

        AccessTokenClaims {
            instance: self.identity.instance_id().to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: expires_at(now, expiry),
            sub: options.user_id.clone(),
            su: options.su,
            jti: uuid::Uuid::new_v4().to_string(),
            service: options.service_claims.clone(),
        }
    }

    /// Claims a refresh token issued at `now` would carry.
    #[must_use]
    pub fn refresh_token_claims(
        &self,
        options: &crate::AuthenticateOptions,
        now: i64,
    ) -> RefreshTokenClaims {
        RefreshTokenClaims {
            instance: self.identity.instance_id().to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: expires_at(now, self.policy.refresh_token_expiry),
            sub: options.user_id.clone(),
            refresh: Some(Value::Bool(true)),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Issue an access token valid for the resolved lifetime from `now`.
    pub fn issue_access_token(
        &self,
        options: &crate::AuthenticateOptions,
        now: i64,
    ) -> Result<IssuedToken, TokenError> {
        let claims = self.access_token_claims(options, now);
        let token = self.serializer.serialize(&claims, &self.encoding_key)?;
        metrics::record_token_issued("access");

        Ok(IssuedToken {
            token,
            expires_in: self.policy.resolve_access_expiry(options.token_expiry),
        })
    }

    /// Issue a refresh token bound to the subject in `options`.
    pub fn issue_refresh_token(
        &self,
        options: &crate::AuthenticateOptions,
        now: i64,
    ) -> Result<String, TokenError> {
        let claims = self.refresh_token_claims(options, now);
        let token = self.serializer.serialize(&claims, &self.encoding_key)?;
        metrics::record_token_issued("refresh");
        Ok(token)
    }

    /// Check signature, issuer, tenant and expiry of a refresh token.
    ///
    /// The refresh marker and subject are left to the caller so that each
    /// failure can be reported separately.
    pub fn verify_refresh_token(
        &self,
        token: &str,
        now: i64,
    ) -> Result<RefreshTokenClaims, TokenRejection> {
        let claims: RefreshTokenClaims =
            self.serializer.deserialize(token, &self.decoding_key, &self.issuer)?;
        self.check_tenant(&claims.instance)?;
        if claims.is_expired_at(now, self.policy.leeway) {
            debug!(exp = claims.exp, now, "Refresh token expired");
            return Err(TokenRejection::Expired);
        }
        Ok(claims)
    }

    /// Check signature, issuer, tenant and expiry of an access token.
    ///
    /// Payloads carrying the refresh marker fail to decode as access claims
    /// and are rejected as invalid.
    pub fn verify_access_token(
        &self,
        token: &str,
        now: i64,
    ) -> Result<AccessTokenClaims, TokenRejection> {
        let claims: AccessTokenClaims =
            self.serializer.deserialize(token, &self.decoding_key, &self.issuer)?;
        self.check_tenant(&claims.instance)?;
        if claims.is_expired_at(now, self.policy.leeway) {
            debug!(exp = claims.exp, now, "Access token expired");
            return Err(TokenRejection::Expired);
        }
        Ok(claims)
    }

    /// Decode a token payload without verification.
    pub fn peek(&self, token: &str) -> Result<Value, TokenRejection> {
        self.serializer.deserialize_unverified(token)
    }

    fn check_tenant(&self, instance: &str) -> Result<(), TokenRejection> {
        if instance == self.identity.instance_id() {
            Ok(())
        } else {
            debug!("Token was issued for a different instance");
            Err(TokenRejection::Invalid)
        }
    }
}

fn expires_at(now: i64, secs: u64) -> i64 {
    now.saturating_add(i64::try_from(secs).unwrap_or(i64::MAX))
}
