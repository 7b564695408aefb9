//! Pagination module
//!
//! Supports: Single page, Linked (body links or Link header), Marker/limit
//!
//! # Overview
//!
//! The pagination module gives every paginated collection one iteration
//! contract. A resource module picks a page variant through a constructor
//! closure; the [`Pager`] does the fetching and stops at the right place
//! regardless of which variant was picked.
//!
//! ```rust,ignore
//! let pager = Pager::new(client, url, |r| MarkerPage::new(r, "healthmonitors").into());
//! let pages = pager.all_pages().await?;
//! let monitors: Vec<Monitor> = extract_pages(&pages, "healthmonitors")?;
//! ```

mod page;
mod pager;
mod types;

pub use page::{
    parse_link_header, LinkedPage, MarkerPage, Page, SinglePage, DEFAULT_LINKS_PATH,
    DEFAULT_MARKER_FIELD, DEFAULT_MARKER_PARAM,
};
pub use pager::Pager;
pub use types::{PageConstructor, PageResult, PagerState};
