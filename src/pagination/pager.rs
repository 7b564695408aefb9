//! Pager: drives a walk over a paginated collection
//!
//! A pager starts from one URL, fetches a page, asks the page for its
//! successor and repeats until a page is empty, names no successor, or an
//! error occurs. Errors are sticky: once a pager fails it never fetches
//! again.
//!
//! Every fetched page is handed out, including an empty last page, so
//! callers see exactly one page per request made.

use super::page::Page;
use super::types::{PageConstructor, PageResult, PagerState};
use crate::error::{Error, Result};
use crate::http::{RequestOpts, ServiceClient};
use futures::Stream;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Walks a paginated collection one page at a time
pub struct Pager {
    client: ServiceClient,
    current: String,
    create_page: PageConstructor,
    headers: HashMap<String, String>,
    err: Option<Error>,
    state: PagerState,
    visited: HashSet<Url>,
    pages_fetched: usize,
}

impl Pager {
    /// Create a pager over `initial_url` that wraps pages with `create_page`
    pub fn new<F>(client: ServiceClient, initial_url: impl Into<String>, create_page: F) -> Self
    where
        F: Fn(PageResult) -> Page + Send + Sync + 'static,
    {
        Self {
            client,
            current: initial_url.into(),
            create_page: Arc::new(create_page),
            headers: HashMap::new(),
            err: None,
            state: PagerState::Ready,
            visited: HashSet::new(),
            pages_fetched: 0,
        }
    }

    /// Preset the error slot; the walk fails before fetching anything
    #[must_use]
    pub fn with_error(mut self, err: Error) -> Self {
        self.err = Some(err);
        self
    }

    /// Send an extra header with every page request
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Current state
    pub fn state(&self) -> PagerState {
        self.state
    }

    /// Number of page requests that returned successfully
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the walk is exhausted. Problems locating the
    /// successor of a page are reported on the call after that page is
    /// returned, so the page itself is never lost.
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        match self.state {
            PagerState::Exhausted => return Ok(None),
            PagerState::Failed => return Err(self.err.take().unwrap_or(Error::PagerHalted)),
            PagerState::Ready | PagerState::Fetching => {}
        }

        if let Some(err) = self.err.take() {
            self.state = PagerState::Failed;
            return Err(err);
        }

        self.state = PagerState::Fetching;
        let page = match self.fetch_current().await {
            Ok(page) => page,
            Err(e) => {
                self.state = PagerState::Failed;
                return Err(e);
            }
        };

        match self.advance(&page) {
            Ok(Some(next)) => {
                self.current = next.to_string();
                self.state = PagerState::Ready;
            }
            Ok(None) => {
                debug!(pages = self.pages_fetched, "Pagination exhausted");
                self.state = PagerState::Exhausted;
            }
            Err(e) => {
                self.err = Some(e);
                self.state = PagerState::Failed;
            }
        }

        Ok(Some(page))
    }

    /// Fetch every page, in order.
    ///
    /// All or nothing: if any fetch fails, only the error is returned.
    pub async fn all_pages(mut self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await? {
            pages.push(page);
        }
        Ok(pages)
    }

    /// Call `handler` once per fetched page.
    ///
    /// `Ok(false)` stops the walk before the next request is made; an error
    /// from the handler stops it and is returned to the caller.
    pub async fn each_page<F>(mut self, mut handler: F) -> Result<()>
    where
        F: FnMut(&Page) -> Result<bool>,
    {
        while let Some(page) = self.next_page().await? {
            match handler(&page) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(pages = self.pages_fetched, "Walk stopped by handler");
                    return Ok(());
                }
                Err(e) => {
                    self.state = PagerState::Failed;
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Turn the pager into a lazy stream of pages.
    ///
    /// The stream ends after the last page or right after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Page>> + Send {
        futures::stream::try_unfold(self, |mut pager| async move {
            Ok(pager.next_page().await?.map(|page| (page, pager)))
        })
    }

    async fn fetch_current(&mut self) -> Result<Page> {
        let mut opts = RequestOpts::new();
        for (key, value) in &self.headers {
            opts = opts.header(key.as_str(), value.as_str());
        }

        let response = self.client.get(&self.current, opts).await?;
        self.pages_fetched += 1;
        debug!(
            url = %response.url,
            page = self.pages_fetched,
            "Fetched page"
        );

        self.visited.insert(response.url.clone());
        let page = (self.create_page)(PageResult::from(response));
        Ok(page)
    }

    /// Decide what comes after `page`
    fn advance(&self, page: &Page) -> Result<Option<Url>> {
        if page.is_empty()? {
            return Ok(None);
        }

        let Some(next) = page.next_page_url()? else {
            return Ok(None);
        };

        if self.visited.contains(&next) {
            return Err(Error::pagination(format!(
                "next page {next} was already fetched in this walk"
            )));
        }
        Ok(Some(next))
    }
}

impl std::fmt::Debug for Pager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("current", &self.current)
            .field("state", &self.state)
            .field("pages_fetched", &self.pages_fetched)
            .field("has_error", &self.err.is_some())
            .finish_non_exhaustive()
    }
}
