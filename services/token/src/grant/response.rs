use crate::error::TokenError;
use serde::{Deserialize, Serialize};

/// Token type reported to clients.
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Successful grant exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: String,
}

impl AuthenticationResponse {
    #[must_use]
    pub fn bearer(access_token: String, expires_in: u64, refresh_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
            refresh_token,
        }
    }
}

/// Outcome of one grant exchange.
pub type AuthenticationResult = Result<AuthenticationResponse, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let response =
            AuthenticationResponse::bearer("a.b.c".to_string(), 86_400, "d.e.f".to_string());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "a.b.c");
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["expires_in"], 86_400);
        assert_eq!(json["refresh_token"], "d.e.f");
    }
}
