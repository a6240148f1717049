//! Property-based tests for rust-common crate.
//!
//! These tests verify universal properties across all inputs using proptest.

use proptest::prelude::*;
use rust_common::{HttpConfig, PlatformError, build_http_client};

// Retryability classification is a pure function of the variant, never of
// the message it carries.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_retryable_errors_are_consistent(
        msg in "[a-zA-Z0-9 ]{1,50}"
    ) {
        let retryable_errors = vec![
            PlatformError::unavailable(msg.clone()),
            PlatformError::Timeout(msg.clone()),
        ];

        for err in retryable_errors {
            prop_assert!(err.is_retryable(), "Error {:?} should be retryable", err);
        }

        let non_retryable_errors = vec![
            PlatformError::invalid_input(msg.clone()),
            PlatformError::internal(msg.clone()),
        ];

        for err in non_retryable_errors {
            prop_assert!(!err.is_retryable(), "Error {:?} should not be retryable", err);
        }
    }

    #[test]
    fn prop_malformed_json_is_not_retryable(s in "[a-z]{1,20}") {
        prop_assume!(s != "true" && s != "false" && s != "null");
        let parse_err = serde_json::from_str::<serde_json::Value>(&s).unwrap_err();
        let err = PlatformError::from(parse_err);
        prop_assert!(!err.is_retryable());
    }
}

// Well-formed header names and printable ASCII values always produce a client.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_valid_default_headers_build(
        name in "X-[A-Za-z]{1,16}",
        value in "[ -~]{0,40}",
    ) {
        let config = HttpConfig::default().with_default_header(name, value.trim().to_string());
        prop_assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn prop_header_names_with_spaces_rejected(
        left in "[A-Za-z]{1,8}",
        right in "[A-Za-z]{1,8}",
    ) {
        let config = HttpConfig::default().with_default_header(format!("{left} {right}"), "v");
        let result = build_http_client(&config);
        prop_assert!(matches!(result, Err(PlatformError::InvalidInput(_))));
    }
}
