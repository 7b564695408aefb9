//! Typed extraction module
//!
//! Turns decoded page bodies into typed records.
//!
//! # Overview
//!
//! Resource modules call these helpers after a `Pager` hands them pages.
//! The helpers are generic over the record type only; they never look at
//! pagination metadata.

mod extractors;
mod types;

pub use extractors::{
    extract_item, extract_items, extract_page, extract_pages, extract_resource,
    extract_resources, items_under, value_at_path,
};
pub use types::Resource;

#[cfg(test)]
mod tests;
