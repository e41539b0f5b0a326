use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use scanlens_types::{FilterCategory, NodeId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scanlens")]
#[command(about = "Find slow UI interactions and the components that own them", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Config file (default: $SCANLENS_CONFIG or <config dir>/scanlens/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a captured scenario and list its slowest interactions
    Replay {
        /// Scenario JSON: {"tree": {...}, "entries": [...]}
        scenario: PathBuf,

        /// Number of interactions to show
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Resolve the component path of one node in a captured tree
    Path {
        /// Scenario or snapshot JSON holding the tree
        scenario: PathBuf,

        /// Node id, as `8` or `node#8`
        #[arg(long)]
        node: NodeId,

        /// Keep names of this category in the path (repeatable)
        #[arg(long = "no-skip", value_name = "CATEGORY")]
        no_skip: Vec<FilterCategory>,
    },
}
