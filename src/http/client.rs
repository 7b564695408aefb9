//! Service client: the transport every resource module talks through
//!
//! Provides a uniform call contract over one service endpoint:
//! - Auth token injection, with one re-authentication on 401
//! - JSON request bodies and JSON response decoding
//! - Status classification against per-method accepted codes
//! - Optional client-side rate limiting
//!
//! Network errors are returned as-is; nothing here retries them.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::{Method, OkCodes};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for a service client
#[derive(Debug, Clone)]
pub struct ServiceClientConfig {
    /// Base URL of the service (e.g. `https://lb.example.com/v2.0/`)
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// Status codes accepted per method when a request names none
    pub ok_codes: OkCodes,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ServiceClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout: Duration::from_secs(30),
            ok_codes: OkCodes::default(),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("stackpager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ServiceClientConfig {
    /// Create a new config builder
    pub fn builder(endpoint: impl Into<String>) -> ServiceClientConfigBuilder {
        ServiceClientConfigBuilder {
            config: ServiceClientConfig {
                endpoint: endpoint.into(),
                ..Default::default()
            },
        }
    }
}

/// Builder for service client config
#[derive(Debug)]
pub struct ServiceClientConfigBuilder {
    config: ServiceClientConfig,
}

impl ServiceClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Replace the accepted status code table
    pub fn ok_codes(mut self, ok_codes: OkCodes) -> Self {
        self.config.ok_codes = ok_codes;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ServiceClientConfig {
        self.config
    }
}

/// Request body
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Serialized as JSON with `Content-Type: application/json`
    Json(Value),
    /// Sent verbatim with the caller's content type
    Raw {
        content_type: String,
        data: Vec<u8>,
    },
}

/// Options for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestOpts {
    /// Request body
    pub body: Option<RequestBody>,
    /// Accepted status codes, overriding the client's table
    pub ok_codes: Option<Vec<u16>>,
    /// Extra request headers
    pub headers: HashMap<String, String>,
    /// Send without a token and never reauthenticate
    pub omit_auth: bool,
}

impl RequestOpts {
    /// Create new request options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Set a raw body with an explicit content type
    #[must_use]
    pub fn raw(mut self, content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.body = Some(RequestBody::Raw {
            content_type: content_type.into(),
            data: data.into(),
        });
        self
    }

    /// Override the accepted status codes
    #[must_use]
    pub fn ok_codes(mut self, codes: impl Into<Vec<u16>>) -> Self {
        self.ok_codes = Some(codes.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Skip token injection and re-authentication
    #[must_use]
    pub fn omit_auth(mut self) -> Self {
        self.omit_auth = true;
        self
    }
}

/// A successful, decoded response
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded JSON body, `Value::Null` when the body was empty
    pub body: Value,
    /// URL that was requested
    pub url: Url,
}

impl Response {
    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Authenticated client bound to one service endpoint.
///
/// Cloning is cheap and clones share the token and rate limiter.
#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
    config: Arc<ServiceClientConfig>,
    endpoint: Url,
    authenticator: Option<Arc<Authenticator>>,
    rate_limiter: Option<RateLimiter>,
}

impl ServiceClient {
    /// Create a new service client without authentication
    pub fn new(config: ServiceClientConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(Error::missing_field("endpoint"));
        }
        let endpoint = parse_endpoint(&config.endpoint)?;
        validate_headers(&config.default_headers)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config: Arc::new(config),
            endpoint,
            authenticator: None,
            rate_limiter,
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: ServiceClientConfig, auth_config: AuthConfig) -> Result<Self> {
        Ok(Self::new(config)?.with_authenticator(Authenticator::new(auth_config)))
    }

    /// Set the authenticator
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    /// Service endpoint, always ending in `/`
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Client configuration
    pub fn config(&self) -> &ServiceClientConfig {
        &self.config
    }

    /// The authenticator, if any
    pub fn authenticator(&self) -> Option<&Authenticator> {
        self.authenticator.as_deref()
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Join path segments onto the endpoint
    pub fn service_url(&self, parts: &[&str]) -> String {
        format!("{}{}", self.endpoint, parts.join("/"))
    }

    /// Join a fixed path and caller-supplied segments onto the endpoint.
    ///
    /// Each segment is percent-encoded, so a `/`, `?` or `#` inside an id
    /// stays part of that segment.
    pub fn resource_url(&self, path: &str, segments: &[&str]) -> Result<String> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::config(format!("endpoint '{}' cannot take a path", self.endpoint))
            })?
            .pop_if_empty()
            .extend(path.split('/').filter(|part| !part.is_empty()))
            .extend(segments);
        Ok(url.into())
    }

    /// Resolve an absolute URL, or a path relative to the endpoint
    pub fn resolve_url(&self, url: &str) -> Result<Url> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(Url::parse(url)?);
        }
        Ok(self.endpoint.join(url.trim_start_matches('/'))?)
    }

    /// Make a GET request
    pub async fn get(&self, url: &str, opts: RequestOpts) -> Result<Response> {
        self.request(Method::GET, url, opts).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, url: &str, body: Value, opts: RequestOpts) -> Result<Response> {
        self.request(Method::POST, url, opts.json(body)).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, url: &str, body: Value, opts: RequestOpts) -> Result<Response> {
        self.request(Method::PUT, url, opts.json(body)).await
    }

    /// Make a PATCH request with a JSON body
    pub async fn patch(&self, url: &str, body: Value, opts: RequestOpts) -> Result<Response> {
        self.request(Method::PATCH, url, opts.json(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str, opts: RequestOpts) -> Result<Response> {
        self.request(Method::DELETE, url, opts).await
    }

    /// Make a HEAD request
    pub async fn head(&self, url: &str, opts: RequestOpts) -> Result<Response> {
        self.request(Method::HEAD, url, opts).await
    }

    /// Make a generic request.
    ///
    /// A 401 triggers at most one re-authentication and replay, and only when
    /// the authenticator has a hook and `omit_auth` is unset.
    pub async fn request(&self, method: Method, url: &str, opts: RequestOpts) -> Result<Response> {
        let url = self.resolve_url(url)?;
        let ok_codes: Vec<u16> = opts
            .ok_codes
            .clone()
            .unwrap_or_else(|| self.config.ok_codes.for_method(method).to_vec());
        let auth = if opts.omit_auth {
            None
        } else {
            self.authenticator.as_deref()
        };

        let mut reauth_attempted = false;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self
                .client
                .request(method.into(), url.clone())
                .header(ACCEPT, "application/json");

            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }

            req = match &opts.body {
                Some(RequestBody::Json(body)) => req.json(body),
                Some(RequestBody::Raw { content_type, data }) => req
                    .header(CONTENT_TYPE, content_type.as_str())
                    .body(data.clone()),
                None => req,
            };

            for (key, value) in &opts.headers {
                req = req.header(key.as_str(), value.as_str());
            }

            let used_token = match auth {
                Some(authenticator) => {
                    let (authorized, token) = authenticator.authorize(req).await;
                    req = authorized;
                    token
                }
                None => None,
            };

            debug!(method = %method, url = %url, "Sending request");
            let response = req.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let text = response.text().await?;
            debug!(method = %method, url = %url, status, "Received response");

            if status == 401 && !ok_codes.contains(&status) {
                if let Some(authenticator) = auth {
                    if authenticator.can_reauthenticate() && !reauth_attempted {
                        reauth_attempted = true;
                        authenticator.reauthenticate(used_token.as_deref()).await?;
                        continue;
                    }
                }
                return Err(Error::Unauthorized {
                    method: method.to_string(),
                    url: url.to_string(),
                    body: text,
                    reauth_attempted,
                });
            }

            if !ok_codes.contains(&status) {
                return Err(Error::http_status(status, method.as_str(), url.as_str(), text));
            }

            let body = decode_body(&text)?;
            return Ok(Response {
                status,
                headers,
                body,
                url,
            });
        }
    }
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticator", &self.authenticator)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Parse an endpoint and make sure relative joins land beneath it
fn parse_endpoint(raw: &str) -> Result<Url> {
    let mut endpoint = Url::parse(raw)?;
    if !endpoint.path().ends_with('/') {
        let path = format!("{}/", endpoint.path());
        endpoint.set_path(&path);
    }
    Ok(endpoint)
}

fn validate_headers(headers: &HashMap<String, String>) -> Result<()> {
    for (name, value) in headers {
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidHeader {
            name: name.clone(),
            message: e.to_string(),
        })?;
        HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
            name: name.clone(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}

/// Decode a response body; an empty body becomes `Value::Null`
fn decode_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
        .map_err(|e| Error::decode(format!("response is not valid JSON: {e}"), text))
}
