//! Envelope extraction routines
//!
//! Each routine reads one envelope key out of a decoded body and hands the
//! value to serde. Shape mismatches come back as `Error::Decode` with the
//! offending JSON attached.

use super::types::Resource;
use crate::error::{Error, Result};
use crate::pagination::Page;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Look up a dot-separated path (`links`, `$.pagination.next`).
///
/// Numeric segments index into arrays; negative ones count from the end.
pub fn value_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => {
                let index = part.parse::<i64>().ok()?;
                let len = items.len() as i64;
                let idx = if index < 0 { len + index } else { index };
                if idx < 0 {
                    return None;
                }
                items.get(idx as usize)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Borrow the array stored under `key`
pub fn items_under<'a>(body: &'a Value, key: &str) -> Result<&'a [Value]> {
    let Some(value) = body.get(key) else {
        return Err(Error::decode(
            format!("missing envelope key '{key}'"),
            body.to_string(),
        ));
    };
    match value {
        Value::Array(items) => Ok(items),
        other => Err(Error::decode(
            format!("envelope key '{key}' does not hold an array"),
            other.to_string(),
        )),
    }
}

/// Decode the array under `key` into typed records
pub fn extract_items<T: DeserializeOwned>(body: &Value, key: &str) -> Result<Vec<T>> {
    items_under(body, key)?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|e| {
                Error::decode(format!("item {index} under '{key}': {e}"), item.to_string())
            })
        })
        .collect()
}

/// Decode the object under `key` into one typed record
pub fn extract_item<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T> {
    let Some(value) = body.get(key) else {
        return Err(Error::decode(
            format!("missing envelope key '{key}'"),
            body.to_string(),
        ));
    };
    T::deserialize(value)
        .map_err(|e| Error::decode(format!("record under '{key}': {e}"), value.to_string()))
}

/// Decode one page's items
pub fn extract_page<T: DeserializeOwned>(page: &Page, key: &str) -> Result<Vec<T>> {
    extract_items(page.body(), key)
}

/// Decode and concatenate the items of every page, in order
pub fn extract_pages<T: DeserializeOwned>(pages: &[Page], key: &str) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for page in pages {
        records.extend(extract_page::<T>(page, key)?);
    }
    Ok(records)
}

/// Decode every page using the record type's own collection key
pub fn extract_resources<T: Resource>(pages: &[Page]) -> Result<Vec<T>> {
    extract_pages(pages, T::COLLECTION_KEY)
}

/// Decode a single-resource response using the record type's own key
pub fn extract_resource<T: Resource>(body: &Value) -> Result<T> {
    extract_item(body, T::RESOURCE_KEY)
}
