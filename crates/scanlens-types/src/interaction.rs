use crate::ElementId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Entry type reported for the very first input of a page, which may arrive
/// without an interaction id.
pub const FIRST_INPUT_ENTRY_TYPE: &str = "first-input";

/// Identifier grouping all raw timing entries that belong to one user interaction.
///
/// Hosts report it either as a number or a string; both deserialize here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InteractionId(String);

impl InteractionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hosts use `0` (or an empty value) for "no interaction".
    pub fn is_unset(&self) -> bool {
        self.0.is_empty() || self.0 == "0"
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InteractionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for InteractionId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for InteractionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// One raw timing entry as emitted by the interaction source.
///
/// All times are milliseconds on the host's monotonic clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInteractionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_id: Option<InteractionId>,
    #[serde(default = "default_entry_type")]
    pub entry_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ElementId>,
    pub duration: f64,
    pub start_time: f64,
    pub processing_start: f64,
    pub processing_end: f64,
}

fn default_entry_type() -> String {
    "event".to_string()
}

impl RawInteractionEntry {
    /// The interaction id, ignoring the host's "unset" sentinel values.
    pub fn id(&self) -> Option<&InteractionId> {
        self.interaction_id.as_ref().filter(|id| !id.is_unset())
    }

    pub fn is_first_input(&self) -> bool {
        self.entry_type == FIRST_INPUT_ENTRY_TYPE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Pointer,
    Keyboard,
}

impl InteractionKind {
    /// Classify a raw event name. Anything outside the known pointer and
    /// keyboard names yields `None`.
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "pointerdown" | "pointerup" | "click" => Some(InteractionKind::Pointer),
            "keydown" | "keyup" => Some(InteractionKind::Keyboard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::Pointer => "pointer",
            InteractionKind::Keyboard => "keyboard",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Latency breakdown derived from the entry that created a record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionTiming {
    /// Time from the input until its handlers started running
    pub input_delay: f64,
    /// Time spent running handlers
    pub processing_duration: f64,
    /// Time from the end of processing until the next frame was presented
    pub presentation_delay: f64,
}

impl InteractionTiming {
    pub fn from_entry(entry: &RawInteractionEntry) -> Self {
        Self {
            input_delay: entry.processing_start - entry.start_time,
            processing_duration: entry.processing_end - entry.processing_start,
            presentation_delay: entry.duration - (entry.processing_end - entry.start_time),
        }
    }
}

/// Aggregated timing of one interaction, unique per id.
///
/// `entries` is never empty: it holds either the single entry with the
/// largest duration seen so far, or several entries that share that exact
/// duration and start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub id: InteractionId,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub start_time: f64,
    pub processing_start: f64,
    pub processing_end: f64,
    /// Current worst duration across all entries; never decreases
    pub latency: f64,
    pub timing: InteractionTiming,
    pub entries: Vec<RawInteractionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ElementId>,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn from_entry(
        id: InteractionId,
        kind: InteractionKind,
        entry: RawInteractionEntry,
        target: Option<ElementId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            start_time: entry.start_time,
            processing_start: entry.processing_start,
            processing_end: entry.processing_end,
            latency: entry.duration,
            timing: InteractionTiming::from_entry(&entry),
            target,
            timestamp,
            entries: vec![entry],
        }
    }
}

/// A finalized record enriched with the component it was attributed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInteraction {
    pub component_name: String,
    pub component_path: String,
    pub record: InteractionRecord,
}
