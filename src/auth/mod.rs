//! Authentication module
//!
//! Supports: `X-Auth-Token` style headers and bearer tokens.
//!
//! The `Authenticator` injects the current token into every request and,
//! when a `Reauthenticator` is attached, replaces it once after a 401.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, ReauthFn, Reauthenticator};
pub use types::{AuthConfig, DEFAULT_TOKEN_HEADER};
