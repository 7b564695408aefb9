//! Pagination types
//!
//! The raw page snapshot, the pager's state machine states and the page
//! constructor signature shared by every resource module.

use super::page::Page;
use crate::http::Response;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// One fetched page, exactly as the transport returned it
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Decoded JSON body
    pub body: Value,
    /// Response headers
    pub headers: HeaderMap,
    /// URL the page was fetched from
    pub url: Url,
}

impl PageResult {
    /// Create a page result
    pub fn new(body: Value, headers: HeaderMap, url: Url) -> Self {
        Self { body, headers, url }
    }
}

impl From<Response> for PageResult {
    fn from(response: Response) -> Self {
        Self {
            body: response.body,
            headers: response.headers,
            url: response.url,
        }
    }
}

/// Where a pager is in its walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// A URL is queued and nothing is in flight
    Ready,
    /// A page request is in flight
    Fetching,
    /// The last page has been handed out
    Exhausted,
    /// An error was hit; the pager will not fetch again
    Failed,
}

impl PagerState {
    /// Check if the pager can still produce pages
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Failed)
    }
}

/// Wraps a raw page into one of the page variants
pub type PageConstructor = Arc<dyn Fn(PageResult) -> Page + Send + Sync>;
