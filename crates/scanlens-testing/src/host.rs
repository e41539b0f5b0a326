//! In-memory host for driving the inspect state machine in tests.
//!
//! Tree access is answered by a [`TreeSnapshot`]; every side effect the
//! machine performs on the host is recorded for later assertions.

use scanlens_engine::ComponentTree;
use scanlens_runtime::{
    CaptureLayerId, Document, DomEventKind, ElementTree, Error, HostTree, InteractionSource,
    ListenerId, ObserveOptions, OverlayRenderer, PanelRenderer, PanelUpdate, ReportData,
    ReportTracker, Result, SurfaceGeometry, TreeSnapshot,
};
use scanlens_types::{ElementId, HighlightMode, NodeId, PanelId, Point, Rect};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

/// One highlight draw, with the element geometry at the time of the draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub element: ElementId,
    pub mode: HighlightMode,
    pub rect: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCall {
    Render(PanelId, PanelUpdate),
    Clear(PanelId),
}

#[derive(Debug, Clone, Copy)]
struct CaptureLayer {
    id: CaptureLayerId,
    intercepting: bool,
}

pub struct FakeHost {
    tree: TreeSnapshot,
    reports: HashMap<NodeId, ReportData>,
    rendered: HashSet<NodeId>,

    overlay_surface: bool,
    surface: Option<SurfaceGeometry>,
    lock_icon: Rect,
    drawn_lock: Option<Rect>,

    next_id: u64,
    listeners: BTreeMap<ListenerId, DomEventKind>,
    removed: Vec<ListenerId>,
    refused: HashSet<DomEventKind>,
    capture_layer: Option<CaptureLayer>,
    /// Interception state seen by each hit test
    hit_tests: RefCell<Vec<bool>>,

    draws: Vec<Draw>,
    overlay_clears: usize,
    panel_calls: Vec<PanelCall>,
}

impl FakeHost {
    pub fn new(tree: TreeSnapshot) -> Self {
        Self {
            tree,
            reports: HashMap::new(),
            rendered: HashSet::new(),
            overlay_surface: true,
            surface: None,
            lock_icon: Rect::new(0.0, 0.0, 16.0, 16.0),
            drawn_lock: None,
            next_id: 0,
            listeners: BTreeMap::new(),
            removed: Vec::new(),
            refused: HashSet::new(),
            capture_layer: None,
            hit_tests: RefCell::new(Vec::new()),
            draws: Vec::new(),
            overlay_clears: 0,
            panel_calls: Vec::new(),
        }
    }

    pub fn with_surface(mut self, surface: SurfaceGeometry) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Where the lock affordance lands, in surface coordinates, on locked draws.
    pub fn with_lock_icon(mut self, rect: Rect) -> Self {
        self.lock_icon = rect;
        self
    }

    pub fn with_report(mut self, node: u64, count: u64) -> Self {
        self.set_report(NodeId::new(node), count);
        self
    }

    pub fn without_overlay_surface(mut self) -> Self {
        self.overlay_surface = false;
        self
    }

    pub fn refusing(mut self, kind: DomEventKind) -> Self {
        self.refused.insert(kind);
        self
    }

    pub fn tree_mut(&mut self) -> &mut TreeSnapshot {
        &mut self.tree
    }

    pub fn set_report(&mut self, node: NodeId, count: u64) {
        self.reports.insert(
            node,
            ReportData {
                count,
                ..ReportData::default()
            },
        );
    }

    pub fn set_rendered(&mut self, node: NodeId, rendered: bool) {
        if rendered {
            self.rendered.insert(node);
        } else {
            self.rendered.remove(&node);
        }
    }

    /// Currently registered listeners.
    pub fn listeners(&self) -> Vec<(ListenerId, DomEventKind)> {
        self.listeners.iter().map(|(id, kind)| (*id, *kind)).collect()
    }

    pub fn listener_for(&self, kind: DomEventKind) -> Option<ListenerId> {
        self.listeners
            .iter()
            .find(|(_, k)| **k == kind)
            .map(|(id, _)| *id)
    }

    pub fn removed_listeners(&self) -> &[ListenerId] {
        &self.removed
    }

    pub fn has_capture_layer(&self) -> bool {
        self.capture_layer.is_some()
    }

    pub fn capture_intercepting(&self) -> Option<bool> {
        self.capture_layer.map(|layer| layer.intercepting)
    }

    pub fn hit_tests(&self) -> Vec<bool> {
        self.hit_tests.borrow().clone()
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn last_draw(&self) -> Option<&Draw> {
        self.draws.last()
    }

    pub fn overlay_clears(&self) -> usize {
        self.overlay_clears
    }

    pub fn panel_calls(&self) -> &[PanelCall] {
        &self.panel_calls
    }

    pub fn panel_renders(&self) -> Vec<&PanelUpdate> {
        self.panel_calls
            .iter()
            .filter_map(|call| match call {
                PanelCall::Render(_, update) => Some(update),
                PanelCall::Clear(_) => None,
            })
            .collect()
    }
}

impl ComponentTree for FakeHost {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    fn is_composite(&self, node: NodeId) -> bool {
        self.tree.is_composite(node)
    }

    fn display_name(&self, node: NodeId) -> Option<String> {
        self.tree.display_name(node)
    }
}

impl ElementTree for FakeHost {
    fn nearest_node(&self, element: ElementId) -> Option<NodeId> {
        self.tree.nearest_node(element)
    }

    fn parent_element(&self, element: ElementId) -> Option<ElementId> {
        self.tree.parent_element(element)
    }
}

impl HostTree for FakeHost {
    fn alternate(&self, node: NodeId) -> Option<NodeId> {
        self.tree.alternate(node)
    }

    fn is_current(&self, node: NodeId) -> bool {
        self.tree.is_current(node)
    }

    fn first_state_node(&self, node: NodeId) -> Option<ElementId> {
        self.tree.first_state_node(node)
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.tree.bounding_rect(element)
    }
}

impl Document for FakeHost {
    fn element_from_point(&self, point: Point) -> Option<ElementId> {
        let intercepting = self.capture_layer.is_some_and(|layer| layer.intercepting);
        self.hit_tests.borrow_mut().push(intercepting);
        if intercepting {
            // The capture layer sits on top and swallows the hit.
            return None;
        }
        self.tree.element_at(point)
    }

    fn add_listener(&mut self, kind: DomEventKind) -> Result<ListenerId> {
        if self.refused.contains(&kind) {
            return Err(Error::Listener(format!("{:?} refused", kind)));
        }
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.insert(id, kind);
        Ok(id)
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        if self.listeners.remove(&listener).is_some() {
            self.removed.push(listener);
        }
    }

    fn insert_capture_layer(&mut self) -> Option<CaptureLayerId> {
        if !self.overlay_surface {
            return None;
        }
        self.next_id += 1;
        let id = CaptureLayerId(self.next_id);
        self.capture_layer = Some(CaptureLayer {
            id,
            intercepting: true,
        });
        Some(id)
    }

    fn set_capture_interception(&mut self, layer: CaptureLayerId, intercept: bool) {
        if let Some(current) = self.capture_layer.as_mut()
            && current.id == layer
        {
            current.intercepting = intercept;
        }
    }

    fn remove_capture_layer(&mut self, layer: CaptureLayerId) {
        if self.capture_layer.is_some_and(|current| current.id == layer) {
            self.capture_layer = None;
        }
    }
}

impl OverlayRenderer for FakeHost {
    fn draw_highlight(&mut self, element: ElementId, mode: HighlightMode) {
        let rect = self.tree.bounding_rect(element);
        if mode == HighlightMode::Locked {
            self.drawn_lock = Some(self.lock_icon);
        }
        self.draws.push(Draw {
            element,
            mode,
            rect,
        });
    }

    fn clear_overlay(&mut self) {
        self.overlay_clears += 1;
        self.drawn_lock = None;
    }

    fn lock_icon_rect(&self) -> Option<Rect> {
        self.drawn_lock
    }

    fn surface_geometry(&self) -> Option<SurfaceGeometry> {
        self.surface
    }
}

impl PanelRenderer for FakeHost {
    fn render_panel(&mut self, panel: PanelId, update: PanelUpdate) {
        self.panel_calls.push(PanelCall::Render(panel, update));
    }

    fn clear_panel(&mut self, panel: PanelId) {
        self.panel_calls.push(PanelCall::Clear(panel));
    }
}

impl ReportTracker for FakeHost {
    fn report_data(&self, node: NodeId) -> Option<ReportData> {
        self.reports.get(&node).cloned()
    }

    fn did_render(&self, node: NodeId) -> bool {
        self.rendered.contains(&node)
    }
}

/// Interaction source that records subscriptions and can refuse entry types.
#[derive(Debug, Default)]
pub struct FakeSource {
    refused: HashSet<String>,
    subscriptions: Vec<ObserveOptions>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing(mut self, entry_type: &str) -> Self {
        self.refused.insert(entry_type.to_string());
        self
    }

    pub fn subscriptions(&self) -> &[ObserveOptions] {
        &self.subscriptions
    }
}

impl InteractionSource for FakeSource {
    fn observe(&mut self, options: ObserveOptions) -> Result<()> {
        if self.refused.contains(&options.entry_type) {
            return Err(Error::Source(format!(
                "entry type {} not supported",
                options.entry_type
            )));
        }
        self.subscriptions.push(options);
        Ok(())
    }
}
