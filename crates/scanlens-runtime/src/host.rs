use crate::Result;
use scanlens_engine::ComponentTree;
use scanlens_types::{ElementId, HighlightMode, NodeId, PanelId, Point, Rect, VersionedNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// NOTE: Host collaborators
//
// Everything that touches the real UI host goes through these traits: tree
// traversal, hit testing, listener registration, overlay drawing, the panel
// and render tracking. The state machine and the monitor only ever talk to
// the host through them, which is also what lets tests swap in a fake host.

/// Element-to-node lookups on top of the component tree.
pub trait ElementTree: ComponentTree {
    /// Nearest tree node associated with a rendered element.
    fn nearest_node(&self, element: ElementId) -> Option<NodeId>;

    /// Containing element, for walking up when an element has no node.
    fn parent_element(&self, element: ElementId) -> Option<ElementId>;

    /// Nearest composite node owning `element`.
    fn composite_for_element(&self, element: ElementId) -> Option<NodeId> {
        self.nearest_node(element)
            .and_then(|node| self.nearest_composite(node))
    }
}

/// Full tree access needed while an element is focused.
pub trait HostTree: ElementTree {
    /// The paired node of the double-buffered tree, if any.
    fn alternate(&self, node: NodeId) -> Option<NodeId>;

    /// Host oracle: is this physical node the current version?
    fn is_current(&self, node: NodeId) -> bool;

    /// Nearest concrete state-holding element for a node.
    fn first_state_node(&self, node: NodeId) -> Option<ElementId>;

    /// Viewport geometry of an element at the time of the call.
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    fn versioned(&self, node: NodeId) -> VersionedNode {
        VersionedNode::new(node, self.alternate(node))
    }

    fn current_version(&self, node: NodeId) -> NodeId {
        self.versioned(node).current(|candidate| self.is_current(candidate))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureLayerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEventKind {
    PointerMove,
    Click,
    KeyDown,
    Scroll,
    Resize,
}

/// A window-level event delivered to an installed listener.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    PointerMove {
        position: Point,
    },
    Click {
        position: Point,
        target: Option<ElementId>,
    },
    KeyDown {
        key: String,
        target: Option<ElementId>,
    },
    Scroll,
    Resize,
}

impl DomEvent {
    pub fn kind(&self) -> DomEventKind {
        match self {
            DomEvent::PointerMove { .. } => DomEventKind::PointerMove,
            DomEvent::Click { .. } => DomEventKind::Click,
            DomEvent::KeyDown { .. } => DomEventKind::KeyDown,
            DomEvent::Scroll => DomEventKind::Scroll,
            DomEvent::Resize => DomEventKind::Resize,
        }
    }
}

/// What the host should do with an event after a listener ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    /// Stop bubbling to other targets
    Stop,
    /// Stop bubbling and skip remaining listeners on the same target
    StopImmediate,
}

/// Document-level primitives: hit testing, listener registration and the
/// invisible capture layer placed above the overlay while picking.
pub trait Document {
    fn element_from_point(&self, point: Point) -> Option<ElementId>;

    fn add_listener(&mut self, kind: DomEventKind) -> Result<ListenerId>;

    fn remove_listener(&mut self, listener: ListenerId);

    /// Returns `None` when there is no overlay surface to stack the layer on.
    fn insert_capture_layer(&mut self) -> Option<CaptureLayerId>;

    fn set_capture_interception(&mut self, layer: CaptureLayerId, intercept: bool);

    fn remove_capture_layer(&mut self, layer: CaptureLayerId);
}

/// Backing-store geometry of the overlay surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    /// Surface position and size in viewport coordinates
    pub client_rect: Rect,
    /// Backing-store width in device pixels
    pub pixel_width: f64,
    /// Backing-store height in device pixels
    pub pixel_height: f64,
    /// Scale applied by the overlay when drawing
    pub device_pixel_ratio: f64,
}

impl SurfaceGeometry {
    /// Map a viewport point into the overlay's drawing coordinates, the space
    /// the lock affordance rectangle is reported in.
    pub fn to_surface(&self, point: Point) -> Point {
        let scale_x = self.pixel_width / self.client_rect.width;
        let scale_y = self.pixel_height / self.client_rect.height;
        let x = (point.x - self.client_rect.x) * scale_x;
        let y = (point.y - self.client_rect.y) * scale_y;
        Point::new(x / self.device_pixel_ratio, y / self.device_pixel_ratio)
    }
}

pub trait OverlayRenderer {
    fn draw_highlight(&mut self, element: ElementId, mode: HighlightMode);

    fn clear_overlay(&mut self);

    /// Rectangle of the lock affordance from the last locked draw.
    fn lock_icon_rect(&self) -> Option<Rect>;

    fn surface_geometry(&self) -> Option<SurfaceGeometry>;
}

/// Render-tracker data for one composite node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportData {
    pub count: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

pub trait ReportTracker {
    fn report_data(&self, node: NodeId) -> Option<ReportData>;

    /// Did this node render during the most recent commit?
    fn did_render(&self, node: NodeId) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelUpdate {
    /// Composite node whose properties/state are shown
    pub node: NodeId,
    /// Element holding the live state values
    pub state_element: ElementId,
    /// The node re-rendered since the panel last read it
    pub did_render: bool,
    pub report: Option<ReportData>,
}

pub trait PanelRenderer {
    fn render_panel(&mut self, panel: PanelId, update: PanelUpdate);

    fn clear_panel(&mut self, panel: PanelId);
}

/// Everything the inspect state machine needs from its host.
pub trait InspectHost: HostTree + Document + OverlayRenderer + PanelRenderer + ReportTracker {}

impl<T> InspectHost for T where
    T: HostTree + Document + OverlayRenderer + PanelRenderer + ReportTracker
{
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObserveOptions {
    pub entry_type: String,
    pub buffered: bool,
    pub duration_threshold: Option<f64>,
}

/// Producer of raw interaction timing entries.
pub trait InteractionSource {
    fn observe(&mut self, options: ObserveOptions) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_mapping_accounts_for_pixel_ratio() {
        let geometry = SurfaceGeometry {
            client_rect: Rect::new(0.0, 0.0, 800.0, 600.0),
            pixel_width: 1600.0,
            pixel_height: 1200.0,
            device_pixel_ratio: 2.0,
        };
        assert_eq!(geometry.to_surface(Point::new(100.0, 50.0)), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_surface_mapping_with_offset_surface() {
        let geometry = SurfaceGeometry {
            client_rect: Rect::new(10.0, 20.0, 400.0, 300.0),
            pixel_width: 400.0,
            pixel_height: 300.0,
            device_pixel_ratio: 1.0,
        };
        assert_eq!(geometry.to_surface(Point::new(110.0, 70.0)), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(DomEvent::Scroll.kind(), DomEventKind::Scroll);
        assert_eq!(
            DomEvent::KeyDown {
                key: "Escape".to_string(),
                target: None
            }
            .kind(),
            DomEventKind::KeyDown
        );
    }
}
