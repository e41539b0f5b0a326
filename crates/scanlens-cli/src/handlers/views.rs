use owo_colors::OwoColorize;
use scanlens_engine::EntryOutcome;
use scanlens_types::{ElementId, InteractionRecord, ResolvedInteraction};
use serde::Serialize;
use std::fmt;

/// Latency (ms) up to which an interaction counts as responsive.
const GOOD_LATENCY_MS: f64 = 200.0;
/// Latency (ms) above which an interaction counts as poor.
const POOR_LATENCY_MS: f64 = 500.0;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub entries: usize,
    pub interactions: usize,
    pub merged: usize,
    pub ignored: usize,
    pub rejected: usize,
}

impl ReplaySummary {
    pub fn from_outcomes(outcomes: &[EntryOutcome]) -> Self {
        let mut summary = Self {
            entries: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                EntryOutcome::Created => summary.interactions += 1,
                EntryOutcome::Replaced | EntryOutcome::Appended => summary.merged += 1,
                EntryOutcome::Ignored => summary.ignored += 1,
                EntryOutcome::Rejected | EntryOutcome::UnknownKind => summary.rejected += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRow {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub latency: f64,
    pub input_delay: f64,
    pub processing_duration: f64,
    pub presentation_delay: f64,
    pub entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ElementId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_path: Option<String>,
}

impl InteractionRow {
    pub fn new(record: &InteractionRecord, resolved: Option<&ResolvedInteraction>) -> Self {
        Self {
            id: record.id.to_string(),
            kind: record.kind.to_string(),
            latency: record.latency,
            input_delay: record.timing.input_delay,
            processing_duration: record.timing.processing_duration,
            presentation_delay: record.timing.presentation_delay,
            entries: record.entries.len(),
            target: record.target,
            component: resolved.map(|r| r.component_name.clone()),
            component_path: resolved.map(|r| r.component_path.clone()),
        }
    }
}

pub struct InteractionTable<'a> {
    pub rows: &'a [InteractionRow],
    pub summary: &'a ReplaySummary,
    pub enable_color: bool,
}

impl fmt::Display for InteractionTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "No interactions recorded.");
        }

        let header = format!(
            "{:<12} {:<9} {:>9} {:>9} {:>11} {:>13}  {}",
            "ID", "TYPE", "LATENCY", "INPUT", "PROCESSING", "PRESENTATION", "COMPONENT"
        );
        if self.enable_color {
            writeln!(f, "{}", header.bold())?;
        } else {
            writeln!(f, "{}", header)?;
        }

        for row in self.rows {
            let latency = format!("{:>7.1}ms", row.latency);
            let latency = if !self.enable_color {
                latency
            } else if row.latency <= GOOD_LATENCY_MS {
                latency.green().to_string()
            } else if row.latency <= POOR_LATENCY_MS {
                latency.yellow().to_string()
            } else {
                latency.red().to_string()
            };

            let component = match (&row.component, &row.component_path) {
                (Some(name), Some(path)) if name != path => format!("{} ({})", path, name),
                (Some(name), _) => name.clone(),
                _ => "-".to_string(),
            };

            writeln!(
                f,
                "{:<12} {:<9} {} {:>7.1}ms {:>9.1}ms {:>11.1}ms  {}",
                row.id,
                row.kind,
                latency,
                row.input_delay,
                row.processing_duration,
                row.presentation_delay,
                component
            )?;
        }

        let summary = format!(
            "{} entries, {} interactions ({} merged, {} ignored, {} rejected)",
            self.summary.entries,
            self.summary.interactions,
            self.summary.merged,
            self.summary.ignored,
            self.summary.rejected
        );
        if self.enable_color {
            writeln!(f, "\n{}", summary.bright_black())
        } else {
            writeln!(f, "\n{}", summary)
        }
    }
}
