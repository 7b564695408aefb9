//! Tests for extract module

use super::*;
use crate::error::Error;
use crate::pagination::{MarkerPage, Page, PageResult, SinglePage};
use pretty_assertions::assert_eq;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::{json, Value};
use test_case::test_case;
use url::Url;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct TestMonitor {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    delay: u32,
    #[serde(default)]
    http_version: f64,
    #[serde(default)]
    pools: Vec<PoolRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct PoolRef {
    id: String,
}

impl Resource for TestMonitor {
    const COLLECTION_KEY: &'static str = "healthmonitors";
    const RESOURCE_KEY: &'static str = "healthmonitor";
}

fn web() -> TestMonitor {
    TestMonitor {
        id: "466c8345-28d8-4f84-a246-e04380b0461d".to_string(),
        name: "web".to_string(),
        kind: "PING".to_string(),
        delay: 10,
        http_version: 0.0,
        pools: vec![PoolRef {
            id: "84f1b61f-58c4-45bf-a8a9-2dafb9e5214d".to_string(),
        }],
    }
}

fn db() -> TestMonitor {
    TestMonitor {
        id: "5d4b5228-33b0-4e60-b225-9b727c1a20e7".to_string(),
        name: "db".to_string(),
        kind: "HTTP".to_string(),
        delay: 5,
        http_version: 1.1,
        pools: vec![PoolRef {
            id: "d459f7d8-c6ee-439d-8713-d3fc08aeed8d".to_string(),
        }],
    }
}

fn web_json() -> Value {
    json!({
        "admin_state_up": true,
        "project_id": "83657cfcdfe44cd5920adaf26c48ceea",
        "delay": 10,
        "name": "web",
        "max_retries": 1,
        "timeout": 1,
        "type": "PING",
        "pools": [{"id": "84f1b61f-58c4-45bf-a8a9-2dafb9e5214d"}],
        "id": "466c8345-28d8-4f84-a246-e04380b0461d"
    })
}

fn db_json() -> Value {
    json!({
        "delay": 5,
        "name": "db",
        "http_method": "GET",
        "http_version": 1.1,
        "type": "HTTP",
        "pools": [{"id": "d459f7d8-c6ee-439d-8713-d3fc08aeed8d"}],
        "id": "5d4b5228-33b0-4e60-b225-9b727c1a20e7"
    })
}

fn page(body: Value) -> Page {
    let result = PageResult::new(
        body,
        HeaderMap::new(),
        Url::parse("http://lb/v2.0/lbaas/healthmonitors").unwrap(),
    );
    MarkerPage::new(result, "healthmonitors").into()
}

// ============================================================================
// Path Lookup Tests
// ============================================================================

#[test_case("links", Some(json!({"next": "n"})) ; "top level")]
#[test_case("links.next", Some(json!("n")) ; "nested")]
#[test_case("$.links.next", Some(json!("n")) ; "dollar prefix")]
#[test_case("items.0.id", Some(json!(1)) ; "array index")]
#[test_case("items.-1.id", Some(json!(2)) ; "negative index")]
#[test_case("items.5.id", None ; "index out of range")]
#[test_case("missing.path", None ; "missing")]
fn test_value_at_path(path: &str, expected: Option<Value>) {
    let body = json!({
        "links": {"next": "n"},
        "items": [{"id": 1}, {"id": 2}]
    });
    assert_eq!(value_at_path(&body, path).cloned(), expected);
}

#[test]
fn test_value_at_path_root() {
    let body = json!({"a": 1});
    assert_eq!(value_at_path(&body, "$"), Some(&body));
}

// ============================================================================
// Item Extraction Tests
// ============================================================================

#[test]
fn test_extract_items_fixture() {
    let body = json!({"healthmonitors": [web_json(), db_json()]});
    let monitors: Vec<TestMonitor> = extract_items(&body, "healthmonitors").unwrap();
    assert_eq!(monitors, vec![web(), db()]);
}

#[test]
fn test_extract_items_empty() {
    let body = json!({"healthmonitors": []});
    let monitors: Vec<TestMonitor> = extract_items(&body, "healthmonitors").unwrap();
    assert!(monitors.is_empty());
}

#[test]
fn test_extract_items_missing_key() {
    let body = json!({"loadbalancers": []});
    let err = extract_items::<TestMonitor>(&body, "healthmonitors").unwrap_err();
    match err {
        Error::Decode { message, fragment } => {
            assert!(message.contains("healthmonitors"));
            assert!(fragment.contains("loadbalancers"));
        }
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[test]
fn test_extract_items_not_an_array() {
    let body = json!({"healthmonitors": {"id": "x"}});
    assert!(matches!(
        extract_items::<TestMonitor>(&body, "healthmonitors"),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_extract_items_bad_field_names_item() {
    let body = json!({"healthmonitors": [web_json(), {"id": "x", "name": "broken", "type": "TCP", "delay": "soon"}]});
    let err = extract_items::<TestMonitor>(&body, "healthmonitors").unwrap_err();
    match err {
        Error::Decode { message, fragment } => {
            assert!(message.contains("item 1"));
            assert!(fragment.contains("soon"));
        }
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[test]
fn test_extract_item_single() {
    let body = json!({"healthmonitor": db_json()});
    let monitor: TestMonitor = extract_item(&body, "healthmonitor").unwrap();
    assert_eq!(monitor, db());

    assert!(matches!(
        extract_item::<TestMonitor>(&json!({}), "healthmonitor"),
        Err(Error::Decode { .. })
    ));
}

// ============================================================================
// Page Extraction Tests
// ============================================================================

#[test]
fn test_extract_pages_concatenates_in_order() {
    let pages = vec![
        page(json!({"healthmonitors": [web_json()]})),
        page(json!({"healthmonitors": [db_json()]})),
        page(json!({"healthmonitors": []})),
    ];
    let monitors: Vec<TestMonitor> = extract_pages(&pages, "healthmonitors").unwrap();
    assert_eq!(monitors, vec![web(), db()]);
}

#[test]
fn test_extract_page_uses_given_key() {
    let result = PageResult::new(
        json!({"endpoint_groups": [{"id": "24"}]}),
        HeaderMap::new(),
        Url::parse("http://ks/v3/OS-EP-FILTER/endpoint_groups").unwrap(),
    );
    let single: Page = SinglePage::new(result, "endpoint_groups").into();
    let raw: Vec<Value> = extract_page(&single, "endpoint_groups").unwrap();
    assert_eq!(raw, vec![json!({"id": "24"})]);
}

#[test]
fn test_extract_pages_fails_on_any_bad_page() {
    let pages = vec![
        page(json!({"healthmonitors": [web_json()]})),
        page(json!({"unexpected": true})),
    ];
    assert!(extract_pages::<TestMonitor>(&pages, "healthmonitors").is_err());
}

#[test]
fn test_resource_keys() {
    let pages = vec![page(json!({"healthmonitors": [web_json(), db_json()]}))];
    let monitors: Vec<TestMonitor> = extract_resources(&pages).unwrap();
    assert_eq!(monitors.len(), 2);

    let monitor: TestMonitor = extract_resource(&json!({"healthmonitor": web_json()})).unwrap();
    assert_eq!(monitor, web());
}

#[test]
fn test_decode_fragment_is_truncated() {
    let long = "x".repeat(4096);
    let body = json!({"other": long});
    match items_under(&body, "healthmonitors") {
        Err(Error::Decode { fragment, .. }) => assert!(fragment.len() < 1024),
        other => panic!("expected Decode error, got {other:?}"),
    }
}
