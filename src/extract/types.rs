//! Extraction traits
//!
//! Ties a record type to the envelope keys its service wraps it in.

use serde::de::DeserializeOwned;

/// A record type returned by a service inside a named envelope.
///
/// Lists arrive as `{"<COLLECTION_KEY>": [...]}` and single lookups as
/// `{"<RESOURCE_KEY>": {...}}`.
pub trait Resource: DeserializeOwned {
    /// Key of the array in list responses (e.g. `healthmonitors`)
    const COLLECTION_KEY: &'static str;
    /// Key of the object in single-resource responses (e.g. `healthmonitor`)
    const RESOURCE_KEY: &'static str;
}
