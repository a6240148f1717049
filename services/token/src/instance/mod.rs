//! One tenant instance: grant exchange plus requests to its services.

pub mod locator;

pub use locator::{InstanceLocator, DEFAULT_HOST_BASE, DEFAULT_PORT};

use crate::client::{BaseClient, RequestOptions, SdkInfo, ServiceEndpoint, ServiceResponse};
use crate::clock::Clock;
use crate::config::TokenPolicy;
use crate::error::TokenError;
use crate::grant::{AuthenticationResult, Authenticator, GrantRequest};
use crate::identity::Identity;
use crate::jwt::{IssuedToken, TokenIssuer};
use crate::options::AuthenticateOptions;
use rust_common::HttpConfig;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Construction parameters for an [`Instance`].
#[derive(Clone)]
pub struct InstanceOptions {
    /// `version:cluster:instance_id`
    pub locator: String,
    /// `keyId:keySecret`
    pub key: String,
    pub service_name: String,
    pub service_version: String,
    /// Defaults to `<cluster>.pusherplatform.io`
    pub host: Option<String>,
    /// Defaults to 443
    pub port: Option<u16>,
    /// Defaults to `https`
    pub scheme: Option<String>,
    pub sdk_info: Option<SdkInfo>,
    pub policy: TokenPolicy,
    pub http: HttpConfig,
    /// Shared HTTP client; one is built from `http` when unset
    pub client: Option<reqwest::Client>,
}

impl InstanceOptions {
    #[must_use]
    pub fn new(
        locator: impl Into<String>,
        key: impl Into<String>,
        service_name: impl Into<String>,
        service_version: impl Into<String>,
    ) -> Self {
        Self {
            locator: locator.into(),
            key: key.into(),
            service_name: service_name.into(),
            service_version: service_version.into(),
            host: None,
            port: None,
            scheme: None,
            sdk_info: None,
            policy: TokenPolicy::default(),
            http: HttpConfig::default(),
            client: None,
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    #[must_use]
    pub fn with_sdk_info(mut self, sdk_info: SdkInfo) -> Self {
        self.sdk_info = Some(sdk_info);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }
}

impl fmt::Debug for InstanceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceOptions")
            .field("locator", &self.locator)
            .field("key", &"[REDACTED]")
            .field("service_name", &self.service_name)
            .field("service_version", &self.service_version)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Authenticator and service client bound to one instance and key.
pub struct Instance {
    locator: InstanceLocator,
    authenticator: Authenticator,
    client: BaseClient,
}

impl Instance {
    /// Validate options and wire the instance.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Config`] for a malformed locator or key, an
    /// empty service name or version, or an invalid token policy.
    pub fn new(options: InstanceOptions) -> Result<Self, TokenError> {
        let locator = InstanceLocator::parse(&options.locator)?;
        let identity = Identity::from_key(locator.instance_id.clone(), &options.key)?;
        if options.service_name.is_empty() {
            return Err(TokenError::config("service name is required"));
        }
        if options.service_version.is_empty() {
            return Err(TokenError::config("service version is required"));
        }
        options.policy.validate()?;

        let endpoint = ServiceEndpoint {
            scheme: options.scheme.unwrap_or_else(|| "https".to_string()),
            host: options.host.unwrap_or_else(|| locator.default_host()),
            port: options.port.unwrap_or(DEFAULT_PORT),
            service_name: options.service_name,
            service_version: options.service_version,
            instance_id: locator.instance_id.clone(),
        };
        let sdk_info = options.sdk_info.unwrap_or_default();
        let client = match options.client {
            Some(http) => BaseClient::with_client(endpoint, sdk_info, http),
            None => BaseClient::new(endpoint, sdk_info, &options.http)?,
        };

        info!(
            instance_id = %locator.instance_id,
            cluster = %locator.cluster,
            host = %client.endpoint().host,
            "Instance configured"
        );

        Ok(Self {
            authenticator: Authenticator::new(TokenIssuer::new(identity, options.policy)),
            locator,
            client,
        })
    }

    /// Replace the time source used for issuance and verification.
    #[must_use]
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        let Self {
            locator,
            authenticator,
            client,
        } = self;
        let issuer = authenticator.into_issuer();
        Self {
            locator,
            authenticator: Authenticator::with_clock(issuer, clock),
            client,
        }
    }

    #[must_use]
    pub fn locator(&self) -> &InstanceLocator {
        &self.locator
    }

    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Exchange a grant for a token pair.
    ///
    /// # Errors
    ///
    /// See [`Authenticator::authenticate`].
    pub fn authenticate(
        &self,
        request: &GrantRequest,
        options: &AuthenticateOptions,
    ) -> AuthenticationResult {
        self.authenticator.authenticate(request, options)
    }

    /// Issue an access token without a refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::JwtEncoding`] if signing fails.
    pub fn generate_access_token(
        &self,
        options: &AuthenticateOptions,
    ) -> Result<IssuedToken, TokenError> {
        self.authenticator.generate_access_token(options)
    }

    /// Issue a short-lived superuser access token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::JwtEncoding`] if signing fails.
    pub fn generate_superuser_token(&self) -> Result<IssuedToken, TokenError> {
        self.authenticator.generate_superuser_token()
    }

    /// Send a request to this instance's service. Requests without a token
    /// are sent with a freshly minted superuser token.
    ///
    /// # Errors
    ///
    /// See [`BaseClient::request`].
    pub async fn request(
        &self,
        mut options: RequestOptions,
    ) -> Result<ServiceResponse, TokenError> {
        if options.jwt.is_none() {
            debug!(path = %options.path, "Attaching superuser token");
            options.jwt = Some(self.generate_superuser_token()?.token);
        }
        self.client.request(options).await
    }
}
