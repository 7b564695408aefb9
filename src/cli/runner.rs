//! CLI runner - executes commands

use crate::cli::commands::{
    Cli, Commands, EndpointGroupsCommand, MonitorsCommand, NodesCommand, OutputFormat, PageStyle,
    WalkArgs,
};
use crate::config::{default_clouds_path, CloudConfig, CloudsFile, ENV_CONFIG_FILE};
use crate::extract::extract_resources;
use crate::http::ServiceClient;
use crate::pagination::{LinkedPage, MarkerPage, Page, PageResult, Pager, SinglePage};
use crate::services::{endpointgroups, monitors, nodes};
use anyhow::{anyhow, Context};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> anyhow::Result<()> {
        match &self.cli.command {
            Commands::Monitors { action } => self.monitors(action).await,
            Commands::EndpointGroups { action } => self.endpoint_groups(action).await,
            Commands::Nodes { action } => self.nodes(action).await,
            Commands::Walk(args) => self.walk(args).await,
        }
    }

    /// Load the selected cloud from the clouds file
    fn load_cloud(&self) -> anyhow::Result<CloudConfig> {
        let path = match &self.cli.clouds {
            Some(path) => path.clone(),
            None => default_clouds_path().ok_or_else(|| {
                anyhow!("No clouds file found (use --clouds or set {ENV_CONFIG_FILE})")
            })?,
        };
        let clouds = CloudsFile::load(&path)
            .with_context(|| format!("Failed to load clouds file '{}'", path.display()))?;
        Ok(clouds.cloud(self.cli.cloud.as_deref())?)
    }

    fn client(&self, service: &str) -> anyhow::Result<ServiceClient> {
        self.load_cloud()?
            .service_client(service)
            .with_context(|| format!("Failed to create {service} client"))
    }

    async fn monitors(&self, action: &MonitorsCommand) -> anyhow::Result<()> {
        let client = self.client(monitors::SERVICE_TYPE)?;
        match action {
            MonitorsCommand::List {
                pool_id,
                name,
                limit,
            } => {
                let opts = monitors::ListOpts {
                    pool_id: pool_id.clone(),
                    name: name.clone(),
                    limit: *limit,
                    ..Default::default()
                };
                let pages = monitors::list(&client, &opts)
                    .all_pages()
                    .await
                    .context("Failed to list health monitors")?;
                let records: Vec<monitors::Monitor> = extract_resources(&pages)?;
                self.output_records(&records)
            }
            MonitorsCommand::Get { id } => {
                let monitor = monitors::get(&client, id)
                    .await
                    .with_context(|| format!("Failed to get health monitor {id}"))?;
                self.output_record(&monitor)
            }
        }
    }

    async fn endpoint_groups(&self, action: &EndpointGroupsCommand) -> anyhow::Result<()> {
        let client = self.client(endpointgroups::SERVICE_TYPE)?;
        match action {
            EndpointGroupsCommand::List { name, project } => {
                let pager = match project {
                    Some(project) => endpointgroups::list_for_project(&client, project),
                    None => endpointgroups::list(
                        &client,
                        &endpointgroups::ListOpts { name: name.clone() },
                    ),
                };
                let pages = pager
                    .all_pages()
                    .await
                    .context("Failed to list endpoint groups")?;
                let records: Vec<endpointgroups::EndpointGroup> = extract_resources(&pages)?;
                self.output_records(&records)
            }
            EndpointGroupsCommand::Get { id } => {
                let group = endpointgroups::get(&client, id)
                    .await
                    .with_context(|| format!("Failed to get endpoint group {id}"))?;
                self.output_record(&group)
            }
        }
    }

    async fn nodes(&self, action: &NodesCommand) -> anyhow::Result<()> {
        let client = self.client(nodes::SERVICE_TYPE)?;
        match action {
            NodesCommand::List {
                cluster_id,
                status,
                limit,
            } => {
                let opts = nodes::ListOpts {
                    cluster_id: cluster_id.clone(),
                    status: status.clone(),
                    limit: *limit,
                    ..Default::default()
                };
                let pages = nodes::list(&client, &opts)
                    .all_pages()
                    .await
                    .context("Failed to list nodes")?;
                let records: Vec<nodes::Node> = extract_resources(&pages)?;
                self.output_records(&records)
            }
            NodesCommand::Get { id } => {
                let node = nodes::get(&client, id)
                    .await
                    .with_context(|| format!("Failed to get node {id}"))?;
                self.output_record(&node)
            }
        }
    }

    /// Walk a collection page by page, reporting item counts
    async fn walk(&self, args: &WalkArgs) -> anyhow::Result<()> {
        let client = self.client(&args.service)?;
        let pager = Pager::new(client, args.path.clone(), page_constructor(args));

        let start = Instant::now();
        let mut pages = 0usize;
        let mut items = 0usize;
        let walked = pager
            .each_page(|page| {
                pages += 1;
                let count = page.len()?;
                items += count;
                self.output_message(&json!({
                    "type": "PAGE",
                    "page": pages,
                    "url": page.url().as_str(),
                    "items": count
                }));
                Ok(args.max_pages.map_or(true, |max| pages < max))
            })
            .await;
        walked.with_context(|| format!("Walk of '{}' failed after {pages} pages", args.path))?;

        info!(pages, items, elapsed_ms = start.elapsed().as_millis() as u64, "Walk complete");
        self.output_message(&json!({
            "type": "SUMMARY",
            "pages": pages,
            "items": items
        }));
        Ok(())
    }

    fn output_records<T: Serialize>(&self, records: &[T]) -> anyhow::Result<()> {
        debug!(count = records.len(), "Writing records");
        match self.cli.format {
            OutputFormat::Json => {
                for record in records {
                    println!("{}", serde_json::to_string(record)?);
                }
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(records)?);
            }
        }
        Ok(())
    }

    fn output_record<T: Serialize>(&self, record: &T) -> anyhow::Result<()> {
        self.output_message(&serde_json::to_value(record)?);
        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Page constructor for the style chosen on the command line
fn page_constructor(args: &WalkArgs) -> impl Fn(PageResult) -> Page + Send + Sync + 'static {
    let key = args.key.clone();
    let style = args.style;
    let links_path = args.links_path.clone();
    let marker_field = args.marker_field.clone();

    move |result| match style {
        PageStyle::Single => SinglePage::new(result, key.as_str()).into(),
        PageStyle::Linked => {
            let page = LinkedPage::new(result, key.as_str());
            match &links_path {
                Some(path) => page.with_links_path(path.as_str()).into(),
                None => page.into(),
            }
        }
        PageStyle::Marker => {
            let page = MarkerPage::new(result, key.as_str());
            match &marker_field {
                Some(field) => page.with_marker_field(field.as_str()).into(),
                None => page.into(),
            }
        }
    }
}
