//! Load-balancer health monitors (`lbaas/healthmonitors`)
//!
//! Lists use marker pagination: `?marker=<last id>&limit=N`.

use super::with_query;
use crate::error::Result;
use crate::extract::{extract_resource, Resource};
use crate::http::{RequestOpts, ServiceClient};
use crate::pagination::{MarkerPage, Page, PageResult, Pager};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Service type of the endpoint these calls go to
pub const SERVICE_TYPE: &str = "load-balancer";

const ROOT_PATH: &str = "lbaas/healthmonitors";

/// A pool a monitor is attached to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolId {
    pub id: String,
}

/// A health monitor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    pub id: String,
    pub name: String,
    pub project_id: String,
    /// PING, TCP, HTTP, HTTPS, TLS-HELLO, UDP-CONNECT or SCTP
    #[serde(rename = "type")]
    pub monitor_type: String,
    /// Seconds between checks
    pub delay: u32,
    /// Seconds a check may take
    pub timeout: u32,
    pub max_retries: u32,
    pub max_retries_down: u32,
    pub http_method: String,
    pub http_version: f64,
    pub url_path: String,
    /// e.g. `200`, `200,202` or `200-204`
    pub expected_codes: String,
    pub domain_name: String,
    pub admin_state_up: bool,
    pub pools: Vec<PoolId>,
    pub provisioning_status: String,
    pub operating_status: String,
    pub tags: Vec<String>,
}

impl Resource for Monitor {
    const COLLECTION_KEY: &'static str = "healthmonitors";
    const RESOURCE_KEY: &'static str = "healthmonitor";
}

/// Filters for [`list`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub monitor_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<String>,
}

/// Body of [`create`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateOpts {
    pub pool_id: String,
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub delay: u32,
    pub timeout: u32,
    pub max_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries_down: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_version: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_codes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Body of [`update`]; unset fields are left alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries_down: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_version: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_codes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Walk the monitors visible to the caller
pub fn list(client: &ServiceClient, opts: &ListOpts) -> Pager {
    match with_query(client.service_url(&[ROOT_PATH]), opts) {
        Ok(url) => Pager::new(client.clone(), url, page_for),
        Err(e) => Pager::new(client.clone(), "", page_for).with_error(e),
    }
}

fn page_for(result: PageResult) -> Page {
    MarkerPage::new(result, Monitor::COLLECTION_KEY).into()
}

/// Fetch one monitor
pub async fn get(client: &ServiceClient, id: &str) -> Result<Monitor> {
    let response = client
        .get(&client.resource_url(ROOT_PATH, &[id])?, RequestOpts::new())
        .await?;
    extract_resource(&response.body)
}

/// Create a monitor; the service answers 201 or 202
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<Monitor> {
    let body = json!({ (Monitor::RESOURCE_KEY): opts });
    let response = client
        .post(&client.service_url(&[ROOT_PATH]), body, RequestOpts::new())
        .await?;
    let monitor: Monitor = extract_resource(&response.body)?;
    debug!(id = %monitor.id, status = response.status, "Created health monitor");
    Ok(monitor)
}

/// Update a monitor in place
pub async fn update(client: &ServiceClient, id: &str, opts: &UpdateOpts) -> Result<Monitor> {
    let body = json!({ (Monitor::RESOURCE_KEY): opts });
    let response = client
        .put(
            &client.resource_url(ROOT_PATH, &[id])?,
            body,
            RequestOpts::new().ok_codes([200, 202]),
        )
        .await?;
    extract_resource(&response.body)
}

/// Delete a monitor
pub async fn delete(client: &ServiceClient, id: &str) -> Result<()> {
    client
        .delete(&client.resource_url(ROOT_PATH, &[id])?, RequestOpts::new())
        .await?;
    debug!(id, "Deleted health monitor");
    Ok(())
}
