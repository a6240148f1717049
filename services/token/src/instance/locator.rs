use crate::error::TokenError;
use std::fmt;

/// Base domain of the hosted platform. Instances live at `<cluster>.<base>`.
pub const DEFAULT_HOST_BASE: &str = "pusherplatform.io";
/// Platform services only listen on TLS.
pub const DEFAULT_PORT: u16 = 443;

/// Parsed `version:cluster:instance_id` locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceLocator {
    pub platform_version: String,
    pub cluster: String,
    pub instance_id: String,
}

impl InstanceLocator {
    /// Parse a locator string.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Config`] unless the locator has exactly three
    /// non-empty colon-separated parts.
    pub fn parse(locator: &str) -> Result<Self, TokenError> {
        let parts: Vec<&str> = locator.split(':').collect();
        match parts.as_slice() {
            [version, cluster, instance_id]
                if !version.is_empty() && !cluster.is_empty() && !instance_id.is_empty() =>
            {
                Ok(Self {
                    platform_version: (*version).to_string(),
                    cluster: (*cluster).to_string(),
                    instance_id: (*instance_id).to_string(),
                })
            }
            _ => Err(TokenError::config(format!(
                "Invalid instance locator {locator:?}: expected version:cluster:instanceId"
            ))),
        }
    }

    /// `<cluster>.pusherplatform.io`
    #[must_use]
    pub fn default_host(&self) -> String {
        format!("{}.{}", self.cluster, DEFAULT_HOST_BASE)
    }
}

impl fmt::Display for InstanceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.platform_version, self.cluster, self.instance_id)
    }
}
