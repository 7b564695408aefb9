//! Common types used throughout stackpager
//!
//! Shared type aliases, the HTTP method enum and the per-method table of
//! accepted status codes.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
}

impl Method {
    /// Uppercase name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
            Method::HEAD => reqwest::Method::HEAD,
        }
    }
}

// ============================================================================
// Accepted Status Codes
// ============================================================================

/// Status codes treated as success for each method when a request does not
/// name its own set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkCodes {
    #[serde(default = "default_get")]
    pub get: Vec<u16>,
    #[serde(default = "default_post")]
    pub post: Vec<u16>,
    #[serde(default = "default_put")]
    pub put: Vec<u16>,
    #[serde(default = "default_patch")]
    pub patch: Vec<u16>,
    #[serde(default = "default_delete")]
    pub delete: Vec<u16>,
    #[serde(default = "default_head")]
    pub head: Vec<u16>,
}

fn default_get() -> Vec<u16> {
    vec![200]
}

fn default_post() -> Vec<u16> {
    vec![201, 202]
}

fn default_put() -> Vec<u16> {
    vec![201, 202]
}

fn default_patch() -> Vec<u16> {
    vec![200, 202, 204]
}

fn default_delete() -> Vec<u16> {
    vec![202, 204]
}

fn default_head() -> Vec<u16> {
    vec![204]
}

impl Default for OkCodes {
    fn default() -> Self {
        Self {
            get: default_get(),
            post: default_post(),
            put: default_put(),
            patch: default_patch(),
            delete: default_delete(),
            head: default_head(),
        }
    }
}

impl OkCodes {
    /// Accepted codes for a method
    pub fn for_method(&self, method: Method) -> &[u16] {
        match method {
            Method::GET => &self.get,
            Method::POST => &self.post,
            Method::PUT => &self.put,
            Method::PATCH => &self.patch,
            Method::DELETE => &self.delete,
            Method::HEAD => &self.head,
        }
    }

    /// Replace the accepted codes for a method
    #[must_use]
    pub fn with(mut self, method: Method, codes: impl Into<Vec<u16>>) -> Self {
        let codes = codes.into();
        match method {
            Method::GET => self.get = codes,
            Method::POST => self.post = codes,
            Method::PUT => self.put = codes,
            Method::PATCH => self.patch = codes,
            Method::DELETE => self.delete = codes,
            Method::HEAD => self.head = codes,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Method::GET, &[200] ; "get")]
    #[test_case(Method::POST, &[201, 202] ; "post")]
    #[test_case(Method::PUT, &[201, 202] ; "put")]
    #[test_case(Method::PATCH, &[200, 202, 204] ; "patch")]
    #[test_case(Method::DELETE, &[202, 204] ; "delete")]
    #[test_case(Method::HEAD, &[204] ; "head")]
    fn test_default_ok_codes(method: Method, expected: &[u16]) {
        assert_eq!(OkCodes::default().for_method(method), expected);
    }

    #[test]
    fn test_ok_codes_override() {
        let codes = OkCodes::default().with(Method::PUT, vec![200, 204]);
        assert_eq!(codes.for_method(Method::PUT), &[200, 204]);
        assert_eq!(codes.for_method(Method::GET), &[200]);
    }

    #[test]
    fn test_ok_codes_partial_yaml() {
        let codes: OkCodes = serde_yaml::from_str("delete: [200]").unwrap();
        assert_eq!(codes.delete, vec![200]);
        assert_eq!(codes.post, vec![201, 202]);
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::HEAD), reqwest::Method::HEAD);
        assert_eq!(Method::PATCH.to_string(), "PATCH");
    }
}
