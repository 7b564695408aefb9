//! Query string building for list options
//!
//! Resource modules describe their filters as plain serde structs; this
//! turns one into `?a=1&b=x`, skipping unset fields.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Serialize `opts` into a query string, including the leading `?`.
///
/// `None` fields and empty strings are skipped, arrays repeat the key, and
/// an options value with no set fields yields an empty string.
pub fn build_query_string<T: Serialize>(opts: &T) -> Result<String> {
    let value = serde_json::to_value(opts)?;
    let Value::Object(fields) = value else {
        return Err(Error::config(
            "query options must serialize to a JSON object",
        ));
    };

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in &fields {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar_to_string(item) {
                        serializer.append_pair(key, &s);
                        any = true;
                    }
                }
            }
            other => {
                if let Some(s) = scalar_to_string(other) {
                    if !s.is_empty() {
                        serializer.append_pair(key, &s);
                        any = true;
                    }
                }
            }
        }
    }

    if any {
        Ok(format!("?{}", serializer.finish()))
    } else {
        Ok(String::new())
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod query_tests {
    use super::*;
    use serde::Serialize;

    #[derive(Default, Serialize)]
    struct Opts {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        limit: Option<u32>,
        admin_state_up: Option<bool>,
        #[serde(rename = "tags", skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    }

    #[test]
    fn test_empty_options() {
        assert_eq!(build_query_string(&Opts::default()).unwrap(), "");
    }

    #[test]
    fn test_set_fields() {
        let opts = Opts {
            name: Some("web lb".to_string()),
            limit: Some(2),
            admin_state_up: Some(true),
            tags: vec!["a".to_string(), "b".to_string()],
        };
        let query = build_query_string(&opts).unwrap();
        assert!(query.starts_with('?'));
        assert!(query.contains("name=web+lb"));
        assert!(query.contains("limit=2"));
        assert!(query.contains("admin_state_up=true"));
        assert!(query.contains("tags=a&tags=b"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(build_query_string(&vec![1, 2]).is_err());
    }
}
