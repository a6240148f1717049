//! SDK metadata sent with every platform request.

pub const HEADER_PRODUCT: &str = "X-SDK-Product";
pub const HEADER_VERSION: &str = "X-SDK-Version";
pub const HEADER_LANGUAGE: &str = "X-SDK-Language";
pub const HEADER_PLATFORM: &str = "X-SDK-Platform";

/// Identifies the calling SDK to platform services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkInfo {
    pub product_name: String,
    pub version: String,
    pub language: String,
    pub platform: String,
}

impl SdkInfo {
    /// Metadata for `product_name` at `version`, reported as a Rust server SDK.
    #[must_use]
    pub fn new(product_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            version: version.into(),
            language: "rust".to_string(),
            platform: "server".to_string(),
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 4] {
        [
            (HEADER_PRODUCT, self.product_name.as_str()),
            (HEADER_VERSION, self.version.as_str()),
            (HEADER_LANGUAGE, self.language.as_str()),
            (HEADER_PLATFORM, self.platform.as_str()),
        ]
    }
}

impl Default for SdkInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let info = SdkInfo::new("chat", "1.2.0");
        assert_eq!(info.language, "rust");
        assert_eq!(info.platform, "server");
    }

    #[test]
    fn test_headers() {
        let info = SdkInfo::new("chat", "1.2.0").with_platform("lambda");
        let headers = info.headers();
        assert_eq!(headers[0], ("X-SDK-Product", "chat"));
        assert_eq!(headers[1], ("X-SDK-Version", "1.2.0"));
        assert_eq!(headers[2], ("X-SDK-Language", "rust"));
        assert_eq!(headers[3], ("X-SDK-Platform", "lambda"));
    }
}
