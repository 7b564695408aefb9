//! Identity endpoint groups (`OS-EP-FILTER/endpoint_groups`)
//!
//! Lists follow the `links.next` URL in the body.

use super::with_query;
use crate::error::Result;
use crate::extract::{extract_resource, Resource};
use crate::http::{RequestOpts, ServiceClient};
use crate::pagination::{LinkedPage, Page, PageResult, Pager};
use crate::types::{JsonObject, Method};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Service type of the endpoint these calls go to
pub const SERVICE_TYPE: &str = "identity";

const ROOT_PATH: &str = "OS-EP-FILTER/endpoint_groups";
const PROJECTS_PATH: &str = "OS-EP-FILTER/projects";

/// A named filter selecting a set of endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Endpoint attributes to match, e.g. `interface` or `region_id`
    pub filters: JsonObject,
}

impl Resource for EndpointGroup {
    const COLLECTION_KEY: &'static str = "endpoint_groups";
    const RESOURCE_KEY: &'static str = "endpoint_group";
}

/// Filters for [`list`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn page_for(result: PageResult) -> Page {
    LinkedPage::new(result, EndpointGroup::COLLECTION_KEY).into()
}

/// Walk all endpoint groups
pub fn list(client: &ServiceClient, opts: &ListOpts) -> Pager {
    match with_query(client.service_url(&[ROOT_PATH]), opts) {
        Ok(url) => Pager::new(client.clone(), url, page_for),
        Err(e) => Pager::new(client.clone(), "", page_for).with_error(e),
    }
}

/// Walk the endpoint groups associated with a project
pub fn list_for_project(client: &ServiceClient, project_id: &str) -> Pager {
    match client.resource_url(PROJECTS_PATH, &[project_id, "endpoint_groups"]) {
        Ok(url) => Pager::new(client.clone(), url, page_for),
        Err(e) => Pager::new(client.clone(), "", page_for).with_error(e),
    }
}

/// Fetch one endpoint group
pub async fn get(client: &ServiceClient, id: &str) -> Result<EndpointGroup> {
    let response = client
        .get(&client.resource_url(ROOT_PATH, &[id])?, RequestOpts::new())
        .await?;
    extract_resource(&response.body)
}

fn association_url(client: &ServiceClient, id: &str, project_id: &str) -> Result<String> {
    client.resource_url(ROOT_PATH, &[id, "projects", project_id])
}

/// Associate an endpoint group with a project
pub async fn create_project_association(
    client: &ServiceClient,
    id: &str,
    project_id: &str,
) -> Result<()> {
    client
        .request(
            Method::PUT,
            &association_url(client, id, project_id)?,
            RequestOpts::new().ok_codes([204]),
        )
        .await?;
    debug!(id, project_id, "Associated endpoint group with project");
    Ok(())
}

/// Check that an endpoint group is associated with a project.
///
/// A missing association comes back as a 404 `HttpStatus` error.
pub async fn check_project_association(
    client: &ServiceClient,
    id: &str,
    project_id: &str,
) -> Result<()> {
    client
        .head(&association_url(client, id, project_id)?, RequestOpts::new())
        .await?;
    Ok(())
}

/// Remove an endpoint group to project association
pub async fn delete_project_association(
    client: &ServiceClient,
    id: &str,
    project_id: &str,
) -> Result<()> {
    client
        .delete(&association_url(client, id, project_id)?, RequestOpts::new())
        .await?;
    debug!(id, project_id, "Removed endpoint group association");
    Ok(())
}
