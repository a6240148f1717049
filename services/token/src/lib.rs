//! Platform token library.
//!
//! Provides OAuth2-style grant exchange (`client_credentials` and
//! `refresh_token`), HS256 token issuance for tenant keys, and a
//! bearer-authenticated client for platform services.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod grant;
pub mod identity;
pub mod instance;
pub mod jwt;
pub mod metrics;
pub mod options;

// Re-exports for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, TokenPolicy};
pub use error::{TokenError, TokenRejection};
pub use grant::{
    AuthenticationResponse, AuthenticationResult, Authenticator, GrantRequest, GrantType,
};
pub use identity::Identity;
pub use instance::{Instance, InstanceOptions};
pub use jwt::{IssuedToken, ServiceClaims, TokenIssuer};
pub use options::AuthenticateOptions;
