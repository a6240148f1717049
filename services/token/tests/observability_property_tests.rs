//! Property-based tests for observability.
//!
//! Property 9: Grant Outcomes Are Counted

use platform_token::metrics::{GRANTS, REFRESH_REJECTIONS, TOKENS_ISSUED};
use platform_token::{
    AuthenticateOptions, Authenticator, FixedClock, GrantRequest, Identity, TokenIssuer,
    TokenPolicy,
};
use proptest::prelude::*;
use std::sync::Arc;
use test_utils::unsupported_grant_type_strategy;

fn authenticator() -> Authenticator {
    let identity = Identity::new("inst1", "key1", "s3cr3t").unwrap();
    Authenticator::with_clock(
        TokenIssuer::new(identity, TokenPolicy::default()),
        Arc::new(FixedClock::new(1_700_000_000)),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Property 9: Grant Outcomes Are Counted
    ///
    /// Counters only grow, and each exchange bumps its own outcome.
    #[test]
    fn prop_grant_outcomes_counted(grant_type in unsupported_grant_type_strategy()) {
        let auth = authenticator();

        let rejected = GRANTS.with_label_values(&["unsupported", "rejected"]);
        let rejected_before = rejected.get();
        let request = GrantRequest { grant_type: Some(grant_type), refresh_token: None };
        let _ = auth.authenticate(&request, &AuthenticateOptions::new());
        prop_assert!(rejected.get() > rejected_before);

        let issued = GRANTS.with_label_values(&["client_credentials", "issued"]);
        let issued_before = issued.get();
        let access_before = TOKENS_ISSUED.with_label_values(&["access"]).get();
        let refresh_before = TOKENS_ISSUED.with_label_values(&["refresh"]).get();
        auth.authenticate(&GrantRequest::client_credentials(), &AuthenticateOptions::new())
            .unwrap();
        prop_assert!(issued.get() > issued_before);
        prop_assert!(TOKENS_ISSUED.with_label_values(&["access"]).get() > access_before);
        prop_assert!(TOKENS_ISSUED.with_label_values(&["refresh"]).get() > refresh_before);
    }
}

#[test]
fn test_refresh_rejection_reason_counted() {
    let auth = authenticator();
    let before = REFRESH_REJECTIONS.with_label_values(&["invalid"]).get();

    let _ = auth.authenticate(&GrantRequest::refresh("not-a-token"), &AuthenticateOptions::new());

    assert!(REFRESH_REJECTIONS.with_label_values(&["invalid"]).get() > before);
}
