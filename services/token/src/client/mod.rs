//! Bearer-authenticated HTTP transport to platform services.

pub mod sdk_info;

pub use sdk_info::SdkInfo;

use crate::error::{ErrorResponse, TokenError};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use rust_common::{build_http_client, HttpConfig};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Where a service lives: `<scheme>://<host>:<port>/services/<name>/<version>/<instance>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub service_version: String,
    pub instance_id: String,
}

impl ServiceEndpoint {
    /// Path of a service resource, with repeated slashes collapsed and
    /// any trailing slash removed.
    #[must_use]
    pub fn service_path(&self, path: &str) -> String {
        let raw = format!(
            "services/{}/{}/{}/{}",
            self.service_name, self.service_version, self.instance_id, path
        );
        let mut normalized = String::with_capacity(raw.len());
        for c in raw.chars() {
            if c == '/' && normalized.ends_with('/') {
                continue;
            }
            normalized.push(c);
        }
        while normalized.ends_with('/') {
            normalized.pop();
        }
        normalized
    }

    /// Absolute URL of a service resource.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Transport`] if scheme or host do not form a valid URL.
    pub fn url(&self, path: &str) -> Result<Url, TokenError> {
        let base = Url::parse(&format!("{}://{}:{}/", self.scheme, self.host, self.port))
            .map_err(rust_common::PlatformError::from)?;
        let url = base
            .join(&self.service_path(path))
            .map_err(rust_common::PlatformError::from)?;
        Ok(url)
    }
}

/// One request to a platform service.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub path: String,
    /// Bearer token; the instance mints a superuser token when unset
    pub jwt: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            jwt: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_jwt(mut self, jwt: impl Into<String>) -> Self {
        self.jwt = Some(jwt.into());
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// 2xx response from a platform service.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl ServiceResponse {
    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Transport`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TokenError> {
        serde_json::from_str(&self.body)
            .map_err(|e| TokenError::Transport(rust_common::PlatformError::from(e)))
    }
}

/// Sends requests to one service of one instance.
#[derive(Debug, Clone)]
pub struct BaseClient {
    endpoint: ServiceEndpoint,
    sdk_info: SdkInfo,
    http: Client,
}

impl BaseClient {
    /// Build a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: ServiceEndpoint,
        sdk_info: SdkInfo,
        http_config: &HttpConfig,
    ) -> Result<Self, TokenError> {
        let http = build_http_client(http_config)?;
        Ok(Self::with_client(endpoint, sdk_info, http))
    }

    /// Build a client on top of an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(endpoint: ServiceEndpoint, sdk_info: SdkInfo, http: Client) -> Self {
        Self {
            endpoint,
            sdk_info,
            http,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Send a request and classify the response by status.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Transport`] on network failure
    /// - [`TokenError::UnsupportedRedirect`] for 3xx
    /// - [`TokenError::ErrorResponse`] for 4xx and 5xx
    /// - [`TokenError::UnsupportedStatus`] for anything else
    pub async fn request(&self, options: RequestOptions) -> Result<ServiceResponse, TokenError> {
        let url = self.endpoint.url(&options.path)?;
        debug!(method = %options.method, url = %url, "Sending service request");

        let mut builder = self.http.request(options.method, url).headers(options.headers);
        for (name, value) in self.sdk_info.headers() {
            builder = builder.header(name, value);
        }
        if let Some(jwt) = options.jwt {
            builder = builder.header(AUTHORIZATION, format!("Bearer {jwt}"));
        }
        if let Some(body) = options.body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        match status.as_u16() {
            200..=299 => {
                let body = response.text().await?;
                Ok(ServiceResponse {
                    status: status.as_u16(),
                    headers,
                    body,
                })
            }
            300..=399 => Err(TokenError::UnsupportedRedirect(status.as_u16())),
            400..=599 => {
                let body = response.text().await.unwrap_or_default();
                Err(TokenError::ErrorResponse(ErrorResponse {
                    status: status.as_u16(),
                    headers,
                    description: describe(status, body),
                }))
            }
            other => Err(TokenError::UnsupportedStatus(other)),
        }
    }
}

fn describe(status: StatusCode, body: String) -> String {
    if body.trim().is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        body
    }
}
