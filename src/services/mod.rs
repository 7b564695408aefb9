//! Resource modules
//!
//! Each module binds one service collection to a page variant:
//! - `monitors`: load-balancer health monitors, marker pagination
//! - `endpointgroups`: identity endpoint groups, linked pagination
//! - `nodes`: clustering nodes, linked pagination

pub mod endpointgroups;
pub mod monitors;
pub mod nodes;

use crate::error::Result;
use crate::http::build_query_string;
use serde::Serialize;

/// Append the query string for `opts` to `url`
pub(crate) fn with_query<T: Serialize>(url: String, opts: &T) -> Result<String> {
    Ok(url + &build_query_string(opts)?)
}
