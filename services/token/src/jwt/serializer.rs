use crate::error::{TokenError, TokenRejection};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Compact JWS encoding with a single symmetric algorithm.
///
/// Verification accepts only the configured algorithm, so tokens using
/// `none` or an asymmetric algorithm never reach claim parsing.
#[derive(Debug, Clone, Copy)]
pub struct JwtSerializer {
    algorithm: Algorithm,
}

impl Default for JwtSerializer {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256,
        }
    }
}

impl JwtSerializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn serialize<T: Serialize>(
        &self,
        claims: &T,
        key: &EncodingKey,
    ) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, key)
            .map_err(|e| TokenError::JwtEncoding(e.to_string()))
    }

    /// Verify signature and issuer, then decode the payload as `T`.
    ///
    /// `exp` is not checked here: callers compare it against their own
    /// clock. Every library error is collapsed into a [`TokenRejection`].
    pub fn deserialize<T: DeserializeOwned>(
        &self,
        token: &str,
        key: &DecodingKey,
        issuer: &str,
    ) -> Result<T, TokenRejection> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["iss"]);
        validation.set_issuer(&[issuer]);

        decode::<T>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(kind = ?e.kind(), "Token verification failed");
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    _ => TokenRejection::Invalid,
                }
            })
    }

    /// Decode the payload without verifying anything. For diagnostics only.
    pub fn deserialize_unverified(&self, token: &str) -> Result<serde_json::Value, TokenRejection> {
        let mut parts = token.split('.');
        let (Some(_), Some(payload), Some(_), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenRejection::Invalid);
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenRejection::Invalid)?;
        serde_json::from_slice(&bytes).map_err(|_| TokenRejection::Invalid)
    }
}
