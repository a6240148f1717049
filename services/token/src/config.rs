//! Centralized configuration for the token authenticator.
//!
//! Configuration is loaded from environment variables (with `.env`
//! support) and validated at startup. Lifetimes and leeway live in a
//! [`TokenPolicy`] value that is handed to the issuer at construction.

use crate::error::TokenError;
use crate::identity::Identity;
use crate::instance::InstanceLocator;
use rust_common::TracingConfig;
use std::env;

/// Default access token lifetime (24 hours).
pub const DEFAULT_TOKEN_EXPIRY: u64 = 24 * 60 * 60;
/// Default refresh token lifetime (7 days).
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: u64 = 7 * 24 * 60 * 60;
/// Default clock skew tolerated during verification.
pub const DEFAULT_TOKEN_LEEWAY: u64 = 30;
/// Default superuser token lifetime. Long enough for a single request.
pub const DEFAULT_SUPERUSER_TOKEN_EXPIRY: u64 = 5 * 60;

/// Token lifetimes and verification leeway, all in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    /// Access token lifetime when the request does not override it
    pub access_token_expiry: u64,
    /// Refresh token lifetime
    pub refresh_token_expiry: u64,
    /// Clock skew tolerated when checking `exp`
    pub leeway: u64,
    /// Lifetime of tokens minted for the SDK's own superuser requests
    pub superuser_token_expiry: u64,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            access_token_expiry: DEFAULT_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
            leeway: DEFAULT_TOKEN_LEEWAY,
            superuser_token_expiry: DEFAULT_SUPERUSER_TOKEN_EXPIRY,
        }
    }
}

impl TokenPolicy {
    #[must_use]
    pub const fn with_access_token_expiry(mut self, secs: u64) -> Self {
        self.access_token_expiry = secs;
        self
    }

    #[must_use]
    pub const fn with_refresh_token_expiry(mut self, secs: u64) -> Self {
        self.refresh_token_expiry = secs;
        self
    }

    #[must_use]
    pub const fn with_leeway(mut self, secs: u64) -> Self {
        self.leeway = secs;
        self
    }

    #[must_use]
    pub const fn with_superuser_token_expiry(mut self, secs: u64) -> Self {
        self.superuser_token_expiry = secs;
        self
    }

    /// Lifetime for an access token. A requested value of zero counts as
    /// unset.
    #[must_use]
    pub const fn resolve_access_expiry(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(secs) if secs > 0 => secs,
            _ => self.access_token_expiry,
        }
    }

    /// Reject lifetimes that would mint already-expired tokens.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Config`] if any lifetime is zero.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.access_token_expiry == 0 {
            return Err(TokenError::config("TOKEN_EXPIRY must be greater than zero"));
        }
        if self.refresh_token_expiry == 0 {
            return Err(TokenError::config("REFRESH_TOKEN_EXPIRY must be greater than zero"));
        }
        if self.superuser_token_expiry == 0 {
            return Err(TokenError::config("SUPERUSER_TOKEN_EXPIRY must be greater than zero"));
        }
        Ok(())
    }
}

/// Process configuration for the token binary and embedding services.
#[derive(Debug)]
pub struct Config {
    /// Parsed `version:cluster:instance` locator
    pub locator: InstanceLocator,
    /// Signing identity derived from the locator and `INSTANCE_KEY`
    pub identity: Identity,
    /// Token lifetimes and leeway
    pub policy: TokenPolicy,
    /// Logging setup
    pub tracing: TracingConfig,
    /// Subject of the token the binary mints (`TOKEN_USER_ID`)
    pub token_user_id: Option<String>,
    /// Mint a superuser token instead of a user token (`TOKEN_SUPERUSER`)
    pub token_superuser: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, TokenError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TokenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let locator = lookup("INSTANCE_LOCATOR")
            .ok_or_else(|| TokenError::config("INSTANCE_LOCATOR is required"))?;
        let locator = InstanceLocator::parse(&locator)?;

        let key = lookup("INSTANCE_KEY")
            .ok_or_else(|| TokenError::config("INSTANCE_KEY is required"))?;
        let identity = Identity::from_key(locator.instance_id.clone(), &key)?;

        let policy = TokenPolicy {
            access_token_expiry: parse_env(&lookup, "TOKEN_EXPIRY", DEFAULT_TOKEN_EXPIRY)?,
            refresh_token_expiry: parse_env(
                &lookup,
                "REFRESH_TOKEN_EXPIRY",
                DEFAULT_REFRESH_TOKEN_EXPIRY,
            )?,
            leeway: parse_env(&lookup, "TOKEN_LEEWAY", DEFAULT_TOKEN_LEEWAY)?,
            superuser_token_expiry: parse_env(
                &lookup,
                "SUPERUSER_TOKEN_EXPIRY",
                DEFAULT_SUPERUSER_TOKEN_EXPIRY,
            )?,
        };
        policy.validate()?;

        let tracing = TracingConfig::default()
            .with_log_level(lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()))
            .with_json_output(parse_env(&lookup, "LOG_JSON", false)?);

        let token_user_id = lookup("TOKEN_USER_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let token_superuser = parse_env(&lookup, "TOKEN_SUPERUSER", false)?;

        Ok(Self {
            locator,
            identity,
            policy,
            tracing,
            token_user_id,
            token_superuser,
        })
    }
}

/// Parse a variable with a default value.
fn parse_env<F, T>(lookup: &F, name: &str, default: T) -> Result<T, TokenError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|e| TokenError::config(format!("Invalid {}: {}", name, e))),
        None => Ok(default),
    }
}
