//! Shared proptest generators.
//!
//! Generators return plain strings and JSON values so any crate in the
//! workspace can build its own domain types from them.

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Claim names an issuer owns. Caller-supplied claims must avoid them.
pub const RESERVED_CLAIM_NAMES: &[&str] =
    &["instance", "iss", "iat", "exp", "sub", "su", "refresh", "jti"];

/// Recognized grant types.
pub const GRANT_TYPES: &[&str] = &["client_credentials", "refresh_token"];

/// Generate tenant instance identifiers.
pub fn instance_id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{8}-[a-z0-9]{4}-[a-z0-9]{4}"
}

/// Generate key identifiers (never containing the `:` separator).
pub fn key_id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,32}"
}

/// Generate key secrets. Secrets may contain colons.
pub fn key_secret_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:+/=]{8,64}"
}

/// Generate `(instance_id, key_id, key_secret)` triples.
pub fn identity_parts_strategy() -> impl Strategy<Value = (String, String, String)> {
    (instance_id_strategy(), key_id_strategy(), key_secret_strategy())
}

/// Generate user identifiers.
pub fn user_id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.@-]{1,64}"
}

/// Generate optional user identifiers.
pub fn optional_user_id_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(user_id_strategy())
}

/// Generate access token lifetimes in seconds (1 minute to 30 days).
pub fn token_expiry_strategy() -> impl Strategy<Value = u64> {
    60u64..2_592_000
}

/// Generate Unix timestamps well inside the 64-bit range.
pub fn timestamp_strategy() -> impl Strategy<Value = i64> {
    1_500_000_000i64..2_500_000_000
}

/// Generate grant type strings that are not recognized.
pub fn unsupported_grant_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("password".to_string()),
        Just("authorization_code".to_string()),
        Just("CLIENT_CREDENTIALS".to_string()),
        Just("refresh_token ".to_string()),
        ".{0,40}",
    ]
    .prop_filter("must not be a recognized grant type", |s| {
        !GRANT_TYPES.contains(&s.as_str())
    })
}

/// Generate scalar JSON values.
pub fn json_scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ]
}

/// Generate caller claim maps whose keys avoid the reserved names.
pub fn service_claims_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z][a-z_]{0,15}", json_scalar_strategy(), 0..6).prop_map(|m| {
        m.into_iter()
            .filter(|(k, _)| !RESERVED_CLAIM_NAMES.contains(&k.as_str()))
            .collect()
    })
}

/// Generate one of the reserved claim names.
pub fn reserved_claim_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(RESERVED_CLAIM_NAMES).prop_map(str::to_string)
}
