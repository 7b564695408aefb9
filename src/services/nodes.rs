//! Clustering nodes (`nodes`)
//!
//! Lists follow the `links.next` URL in the body. Node timestamps are
//! sent as RFC 3339, without a zone, as `""` or as `null`, depending on
//! how far the node got through its lifecycle.

use super::with_query;
use crate::error::Result;
use crate::extract::{extract_resource, Resource};
use crate::http::{RequestOpts, ServiceClient};
use crate::pagination::{LinkedPage, Page, PageResult, Pager};
use crate::types::JsonObject;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Service type of the endpoint these calls go to
pub const SERVICE_TYPE: &str = "clustering";

const ROOT_PATH: &str = "nodes";

/// A member of a cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub cluster_id: String,
    pub profile_id: String,
    pub profile_name: String,
    pub physical_id: String,
    pub project: String,
    pub user: String,
    pub domain: String,
    pub role: String,
    pub index: i64,
    pub status: String,
    pub status_reason: String,
    pub metadata: JsonObject,
    pub data: JsonObject,
    pub dependents: JsonObject,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub init_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Node {
    const COLLECTION_KEY: &'static str = "nodes";
    const RESOURCE_KEY: &'static str = "node";
}

/// Filters for [`list`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// e.g. `name:asc,status:desc`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_project: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

fn page_for(result: PageResult) -> Page {
    LinkedPage::new(result, Node::COLLECTION_KEY).into()
}

/// Walk the nodes visible to the caller
pub fn list(client: &ServiceClient, opts: &ListOpts) -> Pager {
    match with_query(client.service_url(&[ROOT_PATH]), opts) {
        Ok(url) => Pager::new(client.clone(), url, page_for),
        Err(e) => Pager::new(client.clone(), "", page_for).with_error(e),
    }
}

/// Fetch one node
pub async fn get(client: &ServiceClient, id: &str) -> Result<Node> {
    let response = client
        .get(&client.resource_url(ROOT_PATH, &[id])?, RequestOpts::new())
        .await?;
    extract_resource(&response.body)
}

/// Delete a node.
///
/// Deletion is asynchronous; the returned value is the action URL from the
/// `Location` header when the service sends one.
pub async fn delete(client: &ServiceClient, id: &str) -> Result<Option<String>> {
    let response = client
        .delete(&client.resource_url(ROOT_PATH, &[id])?, RequestOpts::new())
        .await?;
    let action = response.header("location").map(str::to_string);
    debug!(id, action = ?action, "Deleted node");
    Ok(action)
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
