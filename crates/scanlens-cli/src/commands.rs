use super::args::{Cli, Commands};
use super::handlers;
use super::logging;
use anyhow::{Context, Result};
use scanlens_runtime::Config;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };
    tracing::debug!(?config, "loaded config");

    match cli.command {
        Commands::Replay { scenario, top } => {
            handlers::replay::handle(&scenario, top, &config, cli.format)
        }
        Commands::Path {
            scenario,
            node,
            no_skip,
        } => handlers::path::handle(&scenario, node, &no_skip, &config, cli.format),
    }
}
