//! Page variants
//!
//! Every service paginates one of three ways, and each way is a variant of
//! the closed [`Page`] enum:
//! - [`SinglePage`]: the whole collection in one response
//! - [`LinkedPage`]: a `next` URL in the body or in a `Link` header
//! - [`MarkerPage`]: `?marker=<last id>&limit=N` query parameters
//!
//! All variants answer the same two questions: is this page empty, and
//! where is the next one. `Ok(None)` from `next_page_url` ends the walk.

use super::types::PageResult;
use crate::error::{Error, Result};
use crate::extract::{items_under, value_at_path};
use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

/// Default body path holding pagination links
pub const DEFAULT_LINKS_PATH: &str = "links";

/// Default item field used as the marker
pub const DEFAULT_MARKER_FIELD: &str = "id";

/// Default query parameter carrying the marker
pub const DEFAULT_MARKER_PARAM: &str = "marker";

/// One `<url>; params` entry of a Link header
static LINK_ENTRY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]*)>([^<]*)").unwrap());

/// The `rel` parameter of a Link header entry
static LINK_REL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\brel\s*=\s*"?([^";,]+)"?"#).unwrap());

// ============================================================================
// Page
// ============================================================================

/// One fetched page of a collection
#[derive(Debug, Clone)]
pub enum Page {
    /// Whole collection in one response
    Single(SinglePage),
    /// Next page located by URL
    Linked(LinkedPage),
    /// Next page located by the last item's marker
    Marker(MarkerPage),
}

impl Page {
    /// The raw page snapshot
    pub fn result(&self) -> &PageResult {
        match self {
            Page::Single(p) => &p.result,
            Page::Linked(p) => &p.result,
            Page::Marker(p) => &p.result,
        }
    }

    /// Decoded body
    pub fn body(&self) -> &Value {
        &self.result().body
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.result().headers
    }

    /// URL this page was fetched from
    pub fn url(&self) -> &Url {
        &self.result().url
    }

    /// Envelope key holding the items
    pub fn key(&self) -> &str {
        match self {
            Page::Single(p) => &p.key,
            Page::Linked(p) => &p.key,
            Page::Marker(p) => &p.key,
        }
    }

    /// Number of items on this page
    pub fn len(&self) -> Result<usize> {
        Ok(items_under(self.body(), self.key())?.len())
    }

    /// Check whether the page holds zero items.
    ///
    /// A missing or non-array envelope is a decode error, not an empty page.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Locate the next page; `Ok(None)` means this is the last one
    pub fn next_page_url(&self) -> Result<Option<Url>> {
        match self {
            Page::Single(_) => Ok(None),
            Page::Linked(p) => p.next_page_url(),
            Page::Marker(p) => p.next_page_url(),
        }
    }
}

impl From<SinglePage> for Page {
    fn from(page: SinglePage) -> Self {
        Page::Single(page)
    }
}

impl From<LinkedPage> for Page {
    fn from(page: LinkedPage) -> Self {
        Page::Linked(page)
    }
}

impl From<MarkerPage> for Page {
    fn from(page: MarkerPage) -> Self {
        Page::Marker(page)
    }
}

// ============================================================================
// Single Page
// ============================================================================

/// A collection that never spans more than one response
#[derive(Debug, Clone)]
pub struct SinglePage {
    result: PageResult,
    key: String,
}

impl SinglePage {
    /// Wrap a page result whose items live under `key`
    pub fn new(result: PageResult, key: impl Into<String>) -> Self {
        Self {
            result,
            key: key.into(),
        }
    }
}

// ============================================================================
// Linked Page
// ============================================================================

/// A page whose successor is named by URL.
///
/// The body path is checked first. It may hold an array of `{rel, href}`
/// objects, an object with a `next` field, or the URL itself. The `Link`
/// header is the fallback.
#[derive(Debug, Clone)]
pub struct LinkedPage {
    result: PageResult,
    key: String,
    links_path: String,
}

impl LinkedPage {
    /// Wrap a page result whose items live under `key`
    pub fn new(result: PageResult, key: impl Into<String>) -> Self {
        Self {
            result,
            key: key.into(),
            links_path: DEFAULT_LINKS_PATH.to_string(),
        }
    }

    /// Read links from a different body path (e.g. `healthmonitors_links`)
    #[must_use]
    pub fn with_links_path(mut self, path: impl Into<String>) -> Self {
        self.links_path = path.into();
        self
    }

    /// Locate the next page
    pub fn next_page_url(&self) -> Result<Option<Url>> {
        let current = &self.result.url;
        let next = match self.body_link()? {
            Some(body) => {
                match self.header_link() {
                    Ok(Some(header)) if header != body => warn!(
                        body_link = %body,
                        header_link = %header,
                        "Body and Link header disagree on the next page, following the body"
                    ),
                    Ok(_) => {}
                    Err(e) => warn!(
                        body_link = %body,
                        error = %e,
                        "Unusable Link header, following the body"
                    ),
                }
                Some(body)
            }
            None => self.header_link()?,
        };

        match next {
            Some(url) if url == *current => {
                warn!(url = %url, "Next link points at the current page, stopping");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn body_link(&self) -> Result<Option<Url>> {
        let href = match value_at_path(&self.result.body, &self.links_path) {
            None | Some(Value::Null) => None,
            Some(Value::String(href)) => Some(href.as_str()),
            Some(Value::Object(links)) => match links.get("next") {
                None | Some(Value::Null) => None,
                Some(Value::String(href)) => Some(href.as_str()),
                Some(other) => {
                    return Err(Error::pagination(format!(
                        "'next' link under '{}' is not a string: {other}",
                        self.links_path
                    )))
                }
            },
            Some(Value::Array(links)) => {
                let next = links
                    .iter()
                    .find(|link| link.get("rel").and_then(Value::as_str) == Some("next"));
                match next {
                    None => None,
                    Some(link) => match link.get("href") {
                        Some(Value::String(href)) => Some(href.as_str()),
                        _ => {
                            return Err(Error::pagination(format!(
                                "'next' link under '{}' has no href: {link}",
                                self.links_path
                            )))
                        }
                    },
                }
            }
            Some(other) => {
                return Err(Error::pagination(format!(
                    "links under '{}' have an unexpected shape: {other}",
                    self.links_path
                )))
            }
        };

        match href {
            Some(href) if !href.is_empty() => self.resolve(href).map(Some),
            _ => Ok(None),
        }
    }

    fn header_link(&self) -> Result<Option<Url>> {
        for value in self.result.headers.get_all(LINK) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            if let Some(href) = parse_link_header(value, "next") {
                return self.resolve(&href).map(Some);
            }
        }
        Ok(None)
    }

    fn resolve(&self, href: &str) -> Result<Url> {
        self.result
            .url
            .join(href)
            .map_err(|e| Error::pagination(format!("malformed next link '{href}': {e}")))
    }
}

/// Parse a Link header and extract the URL for the given rel
pub fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    // Link header format: <url>; rel="next", <url>; rel="prev last"
    for entry in LINK_ENTRY_REGEX.captures_iter(header) {
        let Some(rel) = LINK_REL_REGEX.captures(&entry[2]) else {
            continue;
        };
        if rel[1]
            .split_whitespace()
            .any(|r| r.eq_ignore_ascii_case(target_rel))
        {
            return Some(entry[1].trim().to_string());
        }
    }
    None
}

// ============================================================================
// Marker Page
// ============================================================================

/// A page whose successor is requested with `?marker=<last id>`.
///
/// An explicit body field, when configured and present, takes precedence
/// over the last item's identifier. Every other query parameter, `limit`
/// included, is carried over unchanged.
#[derive(Debug, Clone)]
pub struct MarkerPage {
    result: PageResult,
    key: String,
    marker_field: String,
    marker_param: String,
    next_marker_path: Option<String>,
}

impl MarkerPage {
    /// Wrap a page result whose items live under `key`
    pub fn new(result: PageResult, key: impl Into<String>) -> Self {
        Self {
            result,
            key: key.into(),
            marker_field: DEFAULT_MARKER_FIELD.to_string(),
            marker_param: DEFAULT_MARKER_PARAM.to_string(),
            next_marker_path: None,
        }
    }

    /// Take the marker from a different item field
    #[must_use]
    pub fn with_marker_field(mut self, field: impl Into<String>) -> Self {
        self.marker_field = field.into();
        self
    }

    /// Send the marker under a different query parameter
    #[must_use]
    pub fn with_marker_param(mut self, param: impl Into<String>) -> Self {
        self.marker_param = param.into();
        self
    }

    /// Read the next marker from a body path first.
    ///
    /// A `null` or empty value there ends the walk.
    #[must_use]
    pub fn with_next_marker_path(mut self, path: impl Into<String>) -> Self {
        self.next_marker_path = Some(path.into());
        self
    }

    /// The marker that would fetch the page after this one
    pub fn next_marker(&self) -> Result<Option<String>> {
        let items = items_under(&self.result.body, &self.key)?;
        let Some(last) = items.last() else {
            return Ok(None);
        };

        if let Some(path) = &self.next_marker_path {
            match value_at_path(&self.result.body, path) {
                None => {}
                Some(Value::Null) => return Ok(None),
                Some(value) => {
                    return match marker_string(value) {
                        Some(marker) if marker.is_empty() => Ok(None),
                        Some(marker) => Ok(Some(marker)),
                        None => Err(Error::pagination(format!(
                            "next marker at '{path}' is not a string or number: {value}"
                        ))),
                    };
                }
            }
        }

        match last.get(&self.marker_field).and_then(marker_string) {
            Some(marker) if !marker.is_empty() => Ok(Some(marker)),
            _ => Err(Error::pagination(format!(
                "last item under '{}' has no usable '{}' marker: {last}",
                self.key, self.marker_field
            ))),
        }
    }

    /// Locate the next page
    pub fn next_page_url(&self) -> Result<Option<Url>> {
        let Some(marker) = self.next_marker()? else {
            return Ok(None);
        };

        let current = &self.result.url;
        let previous = current
            .query_pairs()
            .find(|(k, _)| *k == self.marker_param)
            .map(|(_, v)| v.into_owned());
        if previous.as_deref() == Some(marker.as_str()) {
            return Err(Error::pagination(format!(
                "marker '{marker}' did not advance past {current}"
            )));
        }

        let pairs: Vec<(String, String)> = current
            .query_pairs()
            .filter(|(k, _)| *k != self.marker_param)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut next = current.clone();
        next.query_pairs_mut()
            .clear()
            .extend_pairs(pairs)
            .append_pair(&self.marker_param, &marker);
        Ok(Some(next))
    }
}

fn marker_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
