use crate::error::TokenError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim names owned by the issuer. Service claims may never use them.
pub const RESERVED_CLAIMS: &[&str] =
    &["instance", "iss", "iat", "exp", "sub", "su", "refresh", "jti"];

/// Caller-supplied claims merged into an access token.
///
/// Construction rejects reserved names, and so does deserialization, so a
/// value of this type can never shadow an issuer claim or carry the refresh
/// marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ServiceClaims(Map<String, Value>);

impl ServiceClaims {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ReservedClaim`] if `key` is a reserved name.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), TokenError> {
        let key = key.into();
        if RESERVED_CLAIMS.contains(&key.as_str()) {
            return Err(TokenError::ReservedClaim(key));
        }
        self.0.insert(key, value);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl TryFrom<Map<String, Value>> for ServiceClaims {
    type Error = TokenError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        if let Some(reserved) = map.keys().find(|k| RESERVED_CLAIMS.contains(&k.as_str())) {
            return Err(TokenError::ReservedClaim(reserved.clone()));
        }
        Ok(Self(map))
    }
}

impl TryFrom<Value> for ServiceClaims {
    type Error = TokenError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::try_from(map),
            Value::Null => Ok(Self::default()),
            other => Err(TokenError::config(format!(
                "service claims must be a JSON object, got {other}"
            ))),
        }
    }
}

impl From<ServiceClaims> for Map<String, Value> {
    fn from(claims: ServiceClaims) -> Self {
        claims.0
    }
}

/// Signed payload of an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenClaims {
    pub instance: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub su: Option<bool>,
    pub jti: String,

    #[serde(flatten)]
    pub service: ServiceClaims,
}

impl AccessTokenClaims {
    /// Whether the token is past `exp` once `leeway` seconds of skew are allowed.
    #[must_use]
    pub fn is_expired_at(&self, now: i64, leeway: u64) -> bool {
        is_expired(self.exp, now, leeway)
    }

    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.su == Some(true)
    }
}

/// Signed payload of a refresh token.
///
/// `refresh` is kept as a raw JSON value so that only a literal `true`
/// counts as the refresh marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshTokenClaims {
    pub instance: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<Value>,
    pub jti: String,
}

impl RefreshTokenClaims {
    #[must_use]
    pub fn is_refresh(&self) -> bool {
        matches!(self.refresh, Some(Value::Bool(true)))
    }

    /// Whether the token is past `exp` once `leeway` seconds of skew are allowed.
    #[must_use]
    pub fn is_expired_at(&self, now: i64, leeway: u64) -> bool {
        is_expired(self.exp, now, leeway)
    }
}

fn is_expired(exp: i64, now: i64, leeway: u64) -> bool {
    let leeway = i64::try_from(leeway).unwrap_or(i64::MAX);
    exp.saturating_add(leeway) < now
}
