//! Test fixtures with sample data.

/// Sample tenant identifier.
pub const SAMPLE_INSTANCE_ID: &str = "inst1";

/// Sample key identifier.
pub const SAMPLE_KEY_ID: &str = "key1";

/// Sample key secret.
pub const SAMPLE_KEY_SECRET: &str = "s3cr3t";

/// Sample combined `keyId:keySecret` credential.
pub const SAMPLE_KEY: &str = "key1:s3cr3t";

/// Sample instance locator (`version:cluster:instance`).
pub const SAMPLE_LOCATOR: &str = "v1:us1:inst1";

/// Sample user identifier.
pub const SAMPLE_USER_ID: &str = "u1";

/// A fixed "now" for deterministic token tests (2023-11-14T22:13:20Z).
pub const SAMPLE_NOW: i64 = 1_700_000_000;

/// Issuer string tokens for the sample key carry.
#[must_use]
pub fn sample_issuer() -> String {
    format!("api_keys/{SAMPLE_KEY_ID}")
}

/// Environment variables for a minimal valid configuration.
#[must_use]
pub fn sample_env() -> Vec<(&'static str, &'static str)> {
    vec![("INSTANCE_LOCATOR", SAMPLE_LOCATOR), ("INSTANCE_KEY", SAMPLE_KEY)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_key_matches_parts() {
        assert_eq!(SAMPLE_KEY, format!("{SAMPLE_KEY_ID}:{SAMPLE_KEY_SECRET}"));
        assert!(SAMPLE_LOCATOR.ends_with(SAMPLE_INSTANCE_ID));
        assert_eq!(sample_issuer(), "api_keys/key1");
    }
}
