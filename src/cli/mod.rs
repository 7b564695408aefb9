//! CLI module
//!
//! Command-line interface over the resource modules.
//!
//! # Commands
//!
//! - `monitors list|get` - Load-balancer health monitors
//! - `endpoint-groups list|get` - Identity endpoint groups
//! - `nodes list|get` - Clustering nodes
//! - `walk` - Walk any collection and report page sizes

mod commands;
mod runner;

pub use commands::{
    Cli, Commands, EndpointGroupsCommand, MonitorsCommand, NodesCommand, OutputFormat, PageStyle,
    WalkArgs,
};
pub use runner::Runner;
