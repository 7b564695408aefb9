//! Auth configuration types
//!
//! Token acquisition happens outside this crate; these types only describe
//! where an already issued token goes on each request.

use serde::{Deserialize, Serialize};

/// Header used by OpenStack-style services for scoped tokens
pub const DEFAULT_TOKEN_HEADER: &str = "X-Auth-Token";

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Token sent verbatim in a header (`X-Auth-Token` unless overridden)
    Token {
        /// The token value
        token: String,
        /// Header name override
        #[serde(default)]
        header_name: Option<String>,
    },

    /// Token sent as `Authorization: Bearer <token>`
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// Token in the default `X-Auth-Token` header
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token {
            token: token.into(),
            header_name: None,
        }
    }

    /// Bearer token in the `Authorization` header
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// The configured token, if any
    pub fn initial_token(&self) -> Option<&str> {
        match self {
            AuthConfig::None => None,
            AuthConfig::Token { token, .. } | AuthConfig::Bearer { token } => Some(token),
        }
    }

    /// Same placement with a different token; `None` becomes a header token
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        let token = token.into();
        match self {
            AuthConfig::None => AuthConfig::token(token),
            AuthConfig::Token { header_name, .. } => AuthConfig::Token { token, header_name },
            AuthConfig::Bearer { .. } => AuthConfig::Bearer { token },
        }
    }
}
