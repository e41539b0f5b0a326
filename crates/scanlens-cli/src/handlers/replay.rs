use super::views::{InteractionRow, InteractionTable, ReplaySummary};
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use scanlens_engine::LongestInteractionIndex;
use scanlens_runtime::{Config, InteractionLog, InteractionMonitor, Scenario};
use serde::Serialize;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Serialize)]
struct ReplayReport {
    summary: ReplaySummary,
    interactions: Vec<InteractionRow>,
}

pub fn handle(file: &Path, top: usize, config: &Config, format: OutputFormat) -> Result<()> {
    let scenario = Scenario::load_from(file)
        .with_context(|| format!("Failed to load scenario {}", file.display()))?;

    let mut monitor = InteractionMonitor::new(
        Rc::new(scenario.tree),
        config.filters,
        LongestInteractionIndex::shared(),
        InteractionLog::shared(),
    );
    let outcomes = monitor.observe(scenario.entries);
    let summary = ReplaySummary::from_outcomes(&outcomes);
    tracing::info!(
        entries = summary.entries,
        interactions = summary.interactions,
        "replayed scenario"
    );

    let log = monitor.log().borrow();
    let interactions: Vec<InteractionRow> = monitor
        .longest(top)
        .iter()
        .map(|record| {
            let resolved = log.entries().iter().find(|r| r.record.id == record.id);
            InteractionRow::new(record, resolved)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let report = ReplayReport {
                summary,
                interactions,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            let table = InteractionTable {
                rows: &interactions,
                summary: &summary,
                enable_color: std::io::stdout().is_terminal(),
            };
            print!("{}", table);
        }
    }

    Ok(())
}
