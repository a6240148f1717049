//! OAuth2-style grant exchange.

pub mod authenticator;
pub mod request;
pub mod response;

pub use authenticator::Authenticator;
pub use request::{GrantRequest, GrantType};
pub use response::{AuthenticationResponse, AuthenticationResult};
