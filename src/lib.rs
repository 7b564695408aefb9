// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # stackpager
//!
//! A client core for paginated, authenticated REST collections on
//! OpenStack-style control planes.
//!
//! ## Features
//!
//! - **Service client**: token injection, per-method accepted status codes,
//!   one re-authentication on 401, optional rate limiting
//! - **One iteration contract** over single-page, linked and marker/limit
//!   collections
//! - **Typed extraction** of records from page envelopes
//! - **Resource modules** for health monitors, endpoint groups and nodes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stackpager::config::CloudsFile;
//! use stackpager::extract::extract_resources;
//! use stackpager::services::monitors;
//!
//! #[tokio::main]
//! async fn main() -> stackpager::Result<()> {
//!     let cloud = CloudsFile::load("clouds.yaml")?.cloud(Some("devstack"))?;
//!     let client = cloud.service_client(monitors::SERVICE_TYPE)?;
//!
//!     let pages = monitors::list(&client, &monitors::ListOpts::default())
//!         .all_pages()
//!         .await?;
//!     let all: Vec<monitors::Monitor> = extract_resources(&pages)?;
//!     println!("{} monitors", all.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │          services: monitors · endpointgroups · nodes          │
//! └──────────────────────────────────────────────────────────────┘
//!                 │ Pager::new(client, url, ctor)
//! ┌───────────────┴──────────┬─────────────────┬─────────────────┐
//! │        pagination        │     extract     │     config      │
//! ├──────────────────────────┼─────────────────┼─────────────────┤
//! │ Pager (step/all/each)    │ extract_pages   │ clouds.yaml     │
//! │ Single · Linked · Marker │ Resource keys   │ env overrides   │
//! └──────────────────────────┴─────────────────┴─────────────────┘
//!                 │ GET
//! ┌───────────────┴──────────────────────────────────────────────┐
//! │ http::ServiceClient  ·  auth::Authenticator  ·  RateLimiter   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Token placement and re-authentication
pub mod auth;

/// Service client with rate limiting
pub mod http;

/// Page variants and the pager
pub mod pagination;

/// Typed record extraction
pub mod extract;

/// Clouds file configuration
pub mod config;

/// Resource modules
pub mod services;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use extract::{extract_pages, extract_resources, Resource};
pub use http::{RequestOpts, Response, ServiceClient, ServiceClientConfig};
pub use pagination::{LinkedPage, MarkerPage, Page, PageResult, Pager, PagerState, SinglePage};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
