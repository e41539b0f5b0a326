//! Sample trees and scenarios.
//!
//! The sample is a small todo app:
//!
//! ```text
//! App
//! └─ ThemeProvider
//!    └─ TodoList (double-buffered: 3 / 30)
//!       └─ ul
//!          └─ Memo(TodoItem)
//!             └─ li
//!                └─ Button
//!                   └─ button
//! ```

use anyhow::Result;
use scanlens_runtime::{ElementRecord, NodeRecord, Scenario, SurfaceGeometry, TreeSnapshot};
use scanlens_types::{ElementId, InteractionId, NodeId, RawInteractionEntry, Rect};
use std::path::{Path, PathBuf};

pub mod nodes {
    use super::NodeId;

    pub const APP: NodeId = NodeId::new(1);
    pub const THEME_PROVIDER: NodeId = NodeId::new(2);
    pub const TODO_LIST: NodeId = NodeId::new(3);
    pub const TODO_LIST_ALTERNATE: NodeId = NodeId::new(30);
    pub const LIST: NodeId = NodeId::new(4);
    pub const TODO_ITEM: NodeId = NodeId::new(5);
    pub const ITEM: NodeId = NodeId::new(6);
    pub const BUTTON: NodeId = NodeId::new(8);
    pub const BUTTON_HOST: NodeId = NodeId::new(9);
}

pub mod elements {
    use super::ElementId;

    pub const ROOT: ElementId = ElementId::new(100);
    pub const LIST: ElementId = ElementId::new(101);
    pub const ITEM: ElementId = ElementId::new(102);
    pub const BUTTON: ElementId = ElementId::new(103);
    pub const LABEL: ElementId = ElementId::new(104);
}

pub fn todo_tree() -> TreeSnapshot {
    TreeSnapshot::new(
        vec![
            NodeRecord::composite(1, "App", None),
            NodeRecord::composite(2, "ThemeProvider", Some(1)),
            NodeRecord::composite(3, "TodoList", Some(2)).with_alternate(30, true),
            NodeRecord::composite(30, "TodoList", Some(2)).with_alternate(3, false),
            NodeRecord::host(4, "ul", Some(3)),
            NodeRecord::composite(5, "Memo(TodoItem)", Some(4)),
            NodeRecord::host(6, "li", Some(5)),
            NodeRecord::composite(8, "Button", Some(6)),
            NodeRecord::host(9, "button", Some(8)),
        ],
        vec![
            ElementRecord::new(100, None, None).with_rect(Rect::new(0.0, 0.0, 800.0, 600.0)),
            ElementRecord::new(101, Some(4), Some(100)).with_rect(Rect::new(0.0, 0.0, 400.0, 300.0)),
            ElementRecord::new(102, Some(6), Some(101)).with_rect(Rect::new(10.0, 10.0, 200.0, 40.0)),
            ElementRecord::new(103, Some(9), Some(102)).with_rect(Rect::new(150.0, 15.0, 40.0, 30.0)),
            ElementRecord::new(104, None, Some(103)).with_rect(Rect::new(155.0, 20.0, 20.0, 20.0)),
        ],
    )
}

/// Surface whose backing store is twice the CSS size at a pixel ratio of 2,
/// so viewport and surface coordinates coincide.
pub fn retina_surface() -> SurfaceGeometry {
    SurfaceGeometry {
        client_rect: Rect::new(0.0, 0.0, 800.0, 600.0),
        pixel_width: 1600.0,
        pixel_height: 1200.0,
        device_pixel_ratio: 2.0,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn entry(
    id: Option<u64>,
    entry_type: &str,
    name: &str,
    target: Option<ElementId>,
    duration: f64,
    start_time: f64,
    processing_start: f64,
    processing_end: f64,
) -> RawInteractionEntry {
    RawInteractionEntry {
        interaction_id: id.map(InteractionId::from),
        entry_type: entry_type.to_string(),
        name: name.to_string(),
        target,
        duration,
        start_time,
        processing_start,
        processing_end,
    }
}

/// Raw entries recorded against [`todo_tree`].
///
/// Yields three records, worst first: `1` (click on the button label, 120ms),
/// `2` (key press on the item, 64ms) and `first-input` (24ms on the list).
pub fn todo_entries() -> Vec<RawInteractionEntry> {
    vec![
        entry(None, "first-input", "pointerdown", Some(elements::LIST), 24.0, 500.0, 510.0, 515.0),
        entry(Some(1), "event", "pointerdown", Some(elements::LABEL), 120.0, 1000.0, 1010.0, 1060.0),
        entry(Some(1), "event", "click", Some(elements::LABEL), 120.0, 1000.0, 1012.0, 1060.0),
        entry(Some(2), "event", "keydown", Some(elements::ITEM), 48.0, 2000.0, 2004.0, 2030.0),
        entry(Some(2), "event", "keyup", Some(elements::ITEM), 64.0, 2000.0, 2006.0, 2040.0),
        entry(Some(3), "event", "mouseover", Some(elements::ITEM), 300.0, 3000.0, 3001.0, 3002.0),
        entry(None, "event", "click", Some(elements::ITEM), 90.0, 4000.0, 4001.0, 4002.0),
    ]
}

pub fn todo_scenario() -> Scenario {
    Scenario {
        tree: todo_tree(),
        entries: todo_entries(),
    }
}

/// Write the sample scenario as JSON into `dir`.
pub fn write_todo_scenario(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("scenario.json");
    let json = serde_json::to_string_pretty(&todo_scenario())?;
    std::fs::write(&path, json)?;
    Ok(path)
}
