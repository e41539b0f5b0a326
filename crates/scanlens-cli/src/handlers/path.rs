use crate::types::OutputFormat;
use anyhow::{Context, Result, bail};
use scanlens_engine::{
    ComponentTree, PathFilterEngine, clean_component_name, is_path_worthy, resolve_path,
};
use scanlens_runtime::{Config, Scenario, TreeSnapshot};
use scanlens_types::{FilterCategory, NodeId};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct PathReport<'a> {
    node: String,
    name: Option<&'a str>,
    path: String,
    skipped: Vec<FilterCategory>,
    ancestors: Vec<AncestorReport>,
}

/// How one composite ancestor fared against the filters, nearest first.
#[derive(Debug, Serialize)]
struct AncestorReport {
    node: String,
    name: String,
    filtered: bool,
    matches: Vec<FilterCategory>,
}

pub fn handle(
    file: &Path,
    node: NodeId,
    keep: &[FilterCategory],
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let tree = load_tree(file)?;
    let Some(record) = tree.node(node) else {
        bail!("{} not found in {}", node, file.display());
    };

    let filters = keep
        .iter()
        .fold(config.filters, |filters, category| filters.with(*category, false));
    let engine = PathFilterEngine::new(filters);
    let path = resolve_path(&tree, node, engine.filters());

    let ancestors = tree
        .ancestors(node)
        .filter(|ancestor| tree.is_composite(*ancestor))
        .filter_map(|ancestor| {
            let name = clean_component_name(&tree.display_name(ancestor)?);
            Some(AncestorReport {
                node: ancestor.to_string(),
                filtered: !is_path_worthy(&name, engine.filters()),
                matches: engine.matching_categories(&name),
                name,
            })
        })
        .collect();

    let report = PathReport {
        node: node.to_string(),
        name: record.name.as_deref(),
        path,
        skipped: filters.enabled_categories().collect(),
        ancestors,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => println!("{}", report.path),
    }

    Ok(())
}

/// Accept either a full scenario or a bare tree snapshot.
fn load_tree(file: &Path) -> Result<TreeSnapshot> {
    match Scenario::load_from(file) {
        Ok(scenario) => Ok(scenario.tree),
        Err(scenario_err) => {
            tracing::debug!(error = %scenario_err, "not a scenario, reading as snapshot");
            TreeSnapshot::load_from(file)
                .with_context(|| format!("Failed to load tree from {}", file.display()))
        }
    }
}
