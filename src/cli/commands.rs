//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Walk paginated OpenStack-style collections
#[derive(Parser, Debug)]
#[command(name = "stackpager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Clouds file (YAML); defaults to OS_CLIENT_CONFIG_FILE or clouds.yaml
    #[arg(long, global = true)]
    pub clouds: Option<PathBuf>,

    /// Cloud to use; defaults to OS_CLOUD
    #[arg(long, global = true)]
    pub cloud: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load-balancer health monitors
    Monitors {
        #[command(subcommand)]
        action: MonitorsCommand,
    },

    /// Identity endpoint groups
    #[command(name = "endpoint-groups")]
    EndpointGroups {
        #[command(subcommand)]
        action: EndpointGroupsCommand,
    },

    /// Clustering nodes
    Nodes {
        #[command(subcommand)]
        action: NodesCommand,
    },

    /// Walk any collection and report per-page item counts
    Walk(WalkArgs),
}

/// `monitors` actions
#[derive(Subcommand, Debug)]
pub enum MonitorsCommand {
    /// List monitors across all pages
    List {
        /// Filter by pool
        #[arg(long)]
        pool_id: Option<String>,

        /// Filter by name
        #[arg(long)]
        name: Option<String>,

        /// Page size
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one monitor
    Get {
        /// Monitor ID
        id: String,
    },
}

/// `endpoint-groups` actions
#[derive(Subcommand, Debug)]
pub enum EndpointGroupsCommand {
    /// List endpoint groups across all pages
    List {
        /// Filter by name
        #[arg(long)]
        name: Option<String>,

        /// Only groups associated with this project
        #[arg(long, conflicts_with = "name")]
        project: Option<String>,
    },

    /// Show one endpoint group
    Get {
        /// Endpoint group ID
        id: String,
    },
}

/// `nodes` actions
#[derive(Subcommand, Debug)]
pub enum NodesCommand {
    /// List nodes across all pages
    List {
        /// Filter by cluster
        #[arg(long)]
        cluster_id: Option<String>,

        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Page size
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one node
    Get {
        /// Node ID
        id: String,
    },
}

/// Arguments of `walk`
#[derive(Args, Debug, Clone)]
pub struct WalkArgs {
    /// Service type whose endpoint to use (e.g. `load-balancer`)
    #[arg(long)]
    pub service: String,

    /// Collection path below the endpoint, query string allowed
    #[arg(long)]
    pub path: String,

    /// Envelope key holding the items
    #[arg(long)]
    pub key: String,

    /// Pagination style
    #[arg(long, default_value = "linked")]
    pub style: PageStyle,

    /// Body path of the links (linked style)
    #[arg(long)]
    pub links_path: Option<String>,

    /// Item field used as the marker (marker style)
    #[arg(long)]
    pub marker_field: Option<String>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,
}

/// Pagination style for `walk`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PageStyle {
    /// Whole collection in one response
    Single,
    /// Next URL in the body or Link header
    Linked,
    /// `marker` query parameter from the last item
    Marker,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
