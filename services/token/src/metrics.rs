//! Prometheus metrics for the token authenticator.
//!
//! Counters are registered in the default registry on first use.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec};

/// Tokens issued counter.
pub static TOKENS_ISSUED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "token_service_tokens_issued_total",
        "Total number of tokens issued",
        &["token_type"]
    )
    .expect("Failed to register tokens_issued metric")
});

/// Grant exchanges counter.
pub static GRANTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "token_service_grants_total",
        "Total number of grant exchanges by grant type and outcome",
        &["grant_type", "outcome"]
    )
    .expect("Failed to register grants metric")
});

/// Refresh token rejections counter.
pub static REFRESH_REJECTIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "token_service_refresh_rejections_total",
        "Total number of rejected refresh tokens",
        &["reason"]
    )
    .expect("Failed to register refresh_rejections metric")
});

/// Record a token issuance.
pub fn record_token_issued(token_type: &str) {
    TOKENS_ISSUED.with_label_values(&[token_type]).inc();
}

/// Record a grant exchange.
pub fn record_grant(grant_type: &str, outcome: &str) {
    GRANTS.with_label_values(&[grant_type, outcome]).inc();
}

/// Record a refresh token rejection.
pub fn record_refresh_rejection(reason: &str) {
    REFRESH_REJECTIONS.with_label_values(&[reason]).inc();
}
