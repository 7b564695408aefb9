//! HTTP transport module
//!
//! Provides the `ServiceClient` every request and page fetch goes through.
//!
//! # Features
//!
//! - **Token Injection**: `X-Auth-Token` (or bearer) on every call
//! - **Status Classification**: per-method accepted codes, overridable per call
//! - **Single Reauthentication**: one replay after a 401 when a hook is set
//! - **Rate Limiting**: optional token bucket using governor
//! - **Query Strings**: list options serialized through serde

mod client;
mod query;
mod rate_limit;

pub use client::{
    RequestBody, RequestOpts, Response, ServiceClient, ServiceClientConfig,
    ServiceClientConfigBuilder,
};
pub use query::build_query_string;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
