//! Error types for stackpager
//!
//! Every public API returns `Result<T, Error>` where `Error` is defined here.
//! Errors are never retried or swallowed inside the crate; the caller of a
//! request or a page walk always sees them.

use thiserror::Error;

/// Maximum number of characters of a raw body kept inside an error
pub(crate) const MAX_FRAGMENT_LEN: usize = 512;

/// The main error type for stackpager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Unauthorized: {method} {url} returned 401 (reauthenticated: {reauth_attempted}): {body}")]
    Unauthorized {
        method: String,
        url: String,
        body: String,
        reauth_attempted: bool,
    },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {method} {url}: {body}")]
    HttpStatus {
        status: u16,
        method: String,
        url: String,
        body: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    // ============================================================================
    // Decoding and Pagination Errors
    // ============================================================================
    #[error("Failed to decode response: {message} (body: {fragment})")]
    Decode { message: String, fragment: String },

    #[error("Pagination protocol error: {message}")]
    PaginationProtocol { message: String },

    #[error("Pager halted after an earlier error")]
    PagerHalted,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(
        status: u16,
        method: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::HttpStatus {
            status,
            method: method.into(),
            url: url.into(),
            body: body.into(),
        }
    }

    /// Create a decode error, keeping a bounded fragment of the offending body
    pub fn decode(message: impl Into<String>, fragment: impl AsRef<str>) -> Self {
        Self::Decode {
            message: message.into(),
            fragment: truncate_fragment(fragment.as_ref()),
        }
    }

    /// Create a pagination protocol error
    pub fn pagination(message: impl Into<String>) -> Self {
        Self::PaginationProtocol {
            message: message.into(),
        }
    }

    /// HTTP status code carried by this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Unauthorized { .. } => Some(401),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a 404 from the server
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Check if this error is likely transient.
    ///
    /// The crate itself never retries; this is a hint for callers that do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Cut a raw body down to a size that is safe to embed in an error message
pub(crate) fn truncate_fragment(raw: &str) -> String {
    if raw.chars().count() <= MAX_FRAGMENT_LEN {
        return raw.to_string();
    }
    let mut cut: String = raw.chars().take(MAX_FRAGMENT_LEN).collect();
    cut.push_str("...");
    cut
}

/// Result type alias for stackpager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
