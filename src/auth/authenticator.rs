//! Authenticator implementation
//!
//! Injects the current token into requests and swaps it for a fresh one when
//! a service rejects it.

use super::types::{AuthConfig, DEFAULT_TOKEN_HEADER};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Source of a fresh token after the service answered 401
#[async_trait]
pub trait Reauthenticator: Send + Sync {
    /// Obtain a new token
    async fn reauthenticate(&self) -> Result<String>;
}

/// Adapter turning an async closure into a [`Reauthenticator`]
pub struct ReauthFn<F>(pub F);

#[async_trait]
impl<F, Fut> Reauthenticator for ReauthFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send,
{
    async fn reauthenticate(&self) -> Result<String> {
        (self.0)().await
    }
}

/// Authenticator handles applying the token to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Token currently in use
    token: RwLock<Option<String>>,
    /// Hook used on 401
    reauth: Option<Arc<dyn Reauthenticator>>,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        let token = config.initial_token().map(str::to_string);
        Self {
            config,
            token: RwLock::new(token),
            reauth: None,
        }
    }

    /// Attach a re-authentication hook
    #[must_use]
    pub fn with_reauth(mut self, reauth: Arc<dyn Reauthenticator>) -> Self {
        self.reauth = Some(reauth);
        self
    }

    /// Whether a 401 can be answered with a single re-authentication
    pub fn can_reauthenticate(&self) -> bool {
        self.reauth.is_some()
    }

    /// The token that the next request will carry
    pub async fn current_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Apply the current token to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        self.authorize(req).await.0
    }

    /// Apply the current token and return the token that was sent.
    ///
    /// The token is read once, so the returned value is exactly what the
    /// request carries. A token held under `AuthConfig::None` came from the
    /// reauthentication hook and goes in the default token header.
    pub async fn authorize(&self, req: RequestBuilder) -> (RequestBuilder, Option<String>) {
        let token = self.token.read().await.clone();
        let Some(value) = token.as_deref() else {
            return (req, None);
        };

        let req = match &self.config {
            AuthConfig::None => req.header(DEFAULT_TOKEN_HEADER, value),
            AuthConfig::Token { header_name, .. } => {
                let header = header_name.as_deref().unwrap_or(DEFAULT_TOKEN_HEADER);
                req.header(header, value)
            }
            AuthConfig::Bearer { .. } => req.bearer_auth(value),
        };
        (req, token)
    }

    /// Replace the token after a 401.
    ///
    /// `stale` is the token the rejected request carried. If another caller
    /// already replaced it, the new token is kept and the hook is not called.
    pub async fn reauthenticate(&self, stale: Option<&str>) -> Result<()> {
        let Some(reauth) = &self.reauth else {
            return Err(Error::auth("no reauthentication hook configured"));
        };

        let mut token = self.token.write().await;

        // Double-check after acquiring write lock (another task might have refreshed)
        if token.as_deref() != stale {
            debug!("Token already refreshed by another request");
            return Ok(());
        }

        warn!("Token rejected with 401, reauthenticating");
        let fresh = reauth
            .reauthenticate()
            .await
            .map_err(|e| Error::auth(format!("reauthentication failed: {e}")))?;
        if fresh.is_empty() {
            return Err(Error::auth("reauthentication returned an empty token"));
        }
        *token = Some(fresh);
        Ok(())
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.config {
            AuthConfig::None => "none",
            AuthConfig::Token { .. } => "token",
            AuthConfig::Bearer { .. } => "bearer",
        };
        f.debug_struct("Authenticator")
            .field("kind", &kind)
            .field("has_reauth", &self.reauth.is_some())
            .finish_non_exhaustive()
    }
}
