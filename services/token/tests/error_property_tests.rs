//! Property-based tests for error mapping.
//!
//! Property 7: Grant Rejections Are Client Errors
//! Property 8: Internal Details Never Reach The Wire

use platform_token::error::{ErrorResponse, INVALID_GRANT_TYPE, INVALID_REFRESH_TOKEN, SERVER_ERROR};
use platform_token::{TokenError, TokenRejection};
use proptest::prelude::*;
use reqwest::header::HeaderMap;

fn arb_rejection() -> impl Strategy<Value = TokenRejection> {
    prop_oneof![
        Just(TokenRejection::Expired),
        Just(TokenRejection::Invalid),
        Just(TokenRejection::MissingRefreshClaim),
        Just(TokenRejection::SubjectMismatch),
    ]
}

fn arb_grant_error() -> impl Strategy<Value = TokenError> {
    prop_oneof![
        proptest::option::of("[a-z_]{0,20}").prop_map(TokenError::UnsupportedGrantType),
        arb_rejection().prop_map(TokenError::InvalidRefreshToken),
        arb_rejection().prop_map(TokenError::InvalidAccessToken),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 7: Grant Rejections Are Client Errors
    #[test]
    fn prop_grant_errors_are_401_and_final(err in arb_grant_error()) {
        prop_assert_eq!(err.status_code(), 401);
        prop_assert!(!err.is_retryable());
        prop_assert_ne!(err.error_code(), SERVER_ERROR);
    }

    /// Every refresh rejection shares one wire code and has a description.
    #[test]
    fn prop_refresh_rejection_body(reason in arb_rejection()) {
        let body = TokenError::InvalidRefreshToken(reason).error_body();
        prop_assert_eq!(body.error, INVALID_REFRESH_TOKEN);
        prop_assert!(body.error_description.starts_with("Refresh token"));
    }

    /// Unsupported grant types are echoed back in the description.
    #[test]
    fn prop_unsupported_grant_description(grant_type in "[a-z_]{1,20}") {
        let body = TokenError::UnsupportedGrantType(Some(grant_type.clone())).error_body();
        prop_assert_eq!(body.error, INVALID_GRANT_TYPE);
        prop_assert_eq!(
            body.error_description,
            format!("The grant_type provided, {grant_type}, is unsupported")
        );
    }

    /// Property 8: Internal Details Never Reach The Wire
    #[test]
    fn prop_internal_errors_sanitized(detail in "[A-Z_]{4,20}=[a-z0-9]{4,20}") {
        for err in [TokenError::config(detail.clone()), TokenError::JwtEncoding(detail.clone())] {
            let body = err.error_body();
            prop_assert_eq!(body.error, SERVER_ERROR);
            prop_assert!(!body.error_description.contains(&detail));
            prop_assert_eq!(err.status_code(), 500);
        }
    }

    /// Upstream status codes pass through; only gateway failures retry.
    #[test]
    fn prop_upstream_status_passthrough(status in 400u16..600) {
        let err = TokenError::ErrorResponse(ErrorResponse {
            status,
            headers: HeaderMap::new(),
            description: String::new(),
        });
        prop_assert_eq!(err.status_code(), status);
        prop_assert_eq!(err.is_retryable(), (502..=504).contains(&status));
    }
}
