//! Assertions over the CLI's JSON output.

use anyhow::{Context, Result};
use serde_json::Value;

fn interactions(json: &Value) -> Result<&Vec<Value>> {
    json["interactions"]
        .as_array()
        .context("Expected 'interactions' array in JSON")
}

/// Assert the replay output lists exactly `expected` interactions.
pub fn assert_interaction_count(json: &Value, expected: usize) -> Result<()> {
    let items = interactions(json)?;
    if items.len() != expected {
        anyhow::bail!("Expected {} interactions, got {}", expected, items.len());
    }
    Ok(())
}

/// Assert the replay output is ordered by latency, worst first.
pub fn assert_sorted_by_latency(json: &Value) -> Result<()> {
    let latencies = interactions(json)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item["latency"]
                .as_f64()
                .with_context(|| format!("Interaction {} missing latency", i))
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(pos) = latencies.windows(2).position(|w| w[0] < w[1]) {
        anyhow::bail!(
            "Interaction {} ({}) is faster than interaction {} ({})",
            pos,
            latencies[pos],
            pos + 1,
            latencies[pos + 1]
        );
    }
    Ok(())
}

/// Assert the component path reported for an interaction id.
pub fn assert_component_path(json: &Value, id: &str, expected: &str) -> Result<()> {
    let item = interactions(json)?
        .iter()
        .find(|item| item["id"].as_str() == Some(id))
        .with_context(|| format!("No interaction with id {}", id))?;

    let path = item["componentPath"]
        .as_str()
        .with_context(|| format!("Interaction {} has no component path", id))?;

    if path != expected {
        anyhow::bail!("Interaction {} has path {}, expected {}", id, path, expected);
    }
    Ok(())
}
