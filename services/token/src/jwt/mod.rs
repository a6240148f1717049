pub mod claims;
pub mod issuer;
pub mod serializer;

pub use claims::{AccessTokenClaims, RefreshTokenClaims, ServiceClaims, RESERVED_CLAIMS};
pub use issuer::{IssuedToken, TokenIssuer};
pub use serializer::JwtSerializer;
