use crate::{ElementId, PanelId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User-facing inspect-element mode. Exactly one is active at a time.
///
/// The panel handle is carried through every initialized state and is never
/// reallocated mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InspectState {
    #[default]
    Uninitialized,
    InspectOff {
        panel: PanelId,
    },
    Inspecting {
        hovered: Option<ElementId>,
        panel: PanelId,
    },
    Focused {
        focused: ElementId,
        panel: PanelId,
    },
}

impl InspectState {
    pub fn kind(&self) -> InspectStateKind {
        match self {
            InspectState::Uninitialized => InspectStateKind::Uninitialized,
            InspectState::InspectOff { .. } => InspectStateKind::InspectOff,
            InspectState::Inspecting { .. } => InspectStateKind::Inspecting,
            InspectState::Focused { .. } => InspectStateKind::Focused,
        }
    }

    pub fn panel(&self) -> Option<PanelId> {
        match self {
            InspectState::Uninitialized => None,
            InspectState::InspectOff { panel }
            | InspectState::Inspecting { panel, .. }
            | InspectState::Focused { panel, .. } => Some(*panel),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InspectStateKind {
    Uninitialized,
    InspectOff,
    Inspecting,
    Focused,
}

impl fmt::Display for InspectStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InspectStateKind::Uninitialized => "uninitialized",
            InspectStateKind::InspectOff => "inspect-off",
            InspectStateKind::Inspecting => "inspecting",
            InspectStateKind::Focused => "focused",
        };
        write!(f, "{}", label)
    }
}

/// How the overlay highlights an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    /// Hover preview while picking
    Inspecting,
    /// Pinned selection, drawn with the lock affordance
    Locked,
}
