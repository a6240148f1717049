//! Tenant identity and key material.

use crate::error::TokenError;
use secrecy::{ExposeSecret, SecretString};

/// Prefix of the `iss` claim for tokens signed with an instance key.
pub const ISSUER_PREFIX: &str = "api_keys/";

/// Immutable `(instance_id, key_id, key_secret)` triple.
///
/// The secret never leaves process memory: it is only exposed to build
/// signing keys, and `Debug` output redacts it.
#[derive(Debug)]
pub struct Identity {
    instance_id: String,
    key_id: String,
    key_secret: SecretString,
}

impl Identity {
    /// Build an identity from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Config`] if any part is empty or the key id
    /// contains the `:` separator.
    pub fn new(
        instance_id: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let instance_id = instance_id.into();
        let key_id = key_id.into();
        let key_secret = key_secret.into();

        if instance_id.is_empty() {
            return Err(TokenError::config("instance id must not be empty"));
        }
        if key_id.is_empty() || key_id.contains(':') {
            return Err(TokenError::config("key id must be non-empty and must not contain ':'"));
        }
        if key_secret.is_empty() {
            return Err(TokenError::config("key secret must not be empty"));
        }

        Ok(Self {
            instance_id,
            key_id,
            key_secret: SecretString::from(key_secret),
        })
    }

    /// Build an identity from a combined `keyId:keySecret` credential.
    ///
    /// The credential is split on the first colon, so secrets may contain
    /// colons themselves.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Config`] if the separator is missing or either
    /// side of it is empty.
    pub fn from_key(instance_id: impl Into<String>, key: &str) -> Result<Self, TokenError> {
        let (key_id, key_secret) = key
            .split_once(':')
            .ok_or_else(|| TokenError::config("Invalid instance key: expected keyId:keySecret"))?;
        if key_id.is_empty() || key_secret.is_empty() {
            return Err(TokenError::config("Invalid instance key: expected keyId:keySecret"));
        }
        Self::new(instance_id, key_id, key_secret)
    }

    /// Tenant identifier.
    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Key identifier.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// `iss` claim value for tokens signed with this key.
    #[must_use]
    pub fn issuer(&self) -> String {
        format!("{ISSUER_PREFIX}{}", self.key_id)
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.key_secret.expose_secret().as_bytes()
    }
}
