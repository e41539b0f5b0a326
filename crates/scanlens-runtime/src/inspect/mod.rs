//! Inspect-element state machine.
//!
//! Drives the hover → lock → inspect flow over a host UI:
//! - `inspect-off`: overlay kept clear
//! - `inspecting`: hover highlight follows the pointer, click locks
//! - `focused`: properties/state panel for the locked element's component
//!
//! The machine reacts to two signal channels, user-driven state changes and
//! render-report updates. Signals are coalesced over a short window and each
//! flush performs exactly one transition: tear down the listeners of the
//! previous installation, then install the listeners of the current state.

mod focus;
mod listeners;

use crate::config::InspectConfig;
use crate::host::{DomEvent, DomEventKind, InspectHost, ListenerId, Propagation};
use crate::render_cache::SharedRenderCountCache;
use crate::throttle::Coalescer;
use listeners::ActiveListeners;
use scanlens_types::{ElementId, HighlightMode, InspectState, InspectStateKind, PanelId, Point};
use std::time::{Duration, Instant};

const ESCAPE_KEY: &str = "Escape";

const INSPECT_OFF_EVENTS: &[DomEventKind] = &[DomEventKind::PointerMove];
const INSPECTING_EVENTS: &[DomEventKind] = &[
    DomEventKind::PointerMove,
    DomEventKind::Scroll,
    DomEventKind::Resize,
    DomEventKind::Click,
];
const FOCUSED_EVENTS: &[DomEventKind] = &[
    DomEventKind::KeyDown,
    DomEventKind::Click,
    DomEventKind::Scroll,
    DomEventKind::Resize,
];

/// Which channel a signal arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Render/report data changed somewhere in the tree
    ReportData,
    /// The inspect state was replaced
    InspectState,
}

pub struct InspectStateMachine<H: InspectHost> {
    host: H,
    state: InspectState,
    signals: Coalescer<Signal>,
    active: Option<ActiveListeners>,
    render_counts: SharedRenderCountCache,
    pointer_window: Duration,
    transitions: u64,
}

impl<H: InspectHost> InspectStateMachine<H> {
    pub fn new(host: H, render_counts: SharedRenderCountCache, config: &InspectConfig) -> Self {
        Self {
            host,
            state: InspectState::Uninitialized,
            signals: Coalescer::new(config.throttle_window()),
            active: None,
            render_counts,
            pointer_window: config.pointer_window(),
            transitions: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &InspectState {
        &self.state
    }

    /// State whose listeners are currently installed.
    pub fn installed(&self) -> Option<InspectStateKind> {
        self.active.as_ref().map(|active| active.kind)
    }

    pub fn installed_listeners(&self) -> Vec<ListenerId> {
        self.active
            .as_ref()
            .map(|active| active.listener_ids().collect())
            .unwrap_or_default()
    }

    /// Number of transitions performed so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// When the next coalesced transition is due, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.signals.deadline()
    }

    /// User-driven inspect-mode change.
    pub fn set_state(&mut self, state: InspectState, now: Instant) {
        self.state = state;
        self.signals.push(Signal::InspectState, now);
    }

    /// Report/render data changed.
    pub fn notify_report_data(&mut self, now: Instant) {
        self.signals.push(Signal::ReportData, now);
    }

    /// Run the pending transition if its window has elapsed. Returns whether
    /// a transition ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.signals.poll(now) {
            Some(signal) => {
                tracing::trace!(?signal, state = %self.state.kind(), "coalesced signal flushed");
                self.transition();
                true
            }
            None => false,
        }
    }

    /// Tear down everything and hand the host back.
    pub fn dispose(mut self) -> H {
        if let Some(active) = self.active.take() {
            active.teardown(&mut self.host);
        }
        self.host
    }

    fn transition(&mut self) {
        if let Some(active) = self.active.take() {
            active.teardown(&mut self.host);
        }
        self.transitions += 1;

        self.active = match self.state {
            InspectState::Uninitialized => None,
            InspectState::InspectOff { .. } => {
                self.host.clear_overlay();
                Some(self.install(InspectStateKind::InspectOff, INSPECT_OFF_EVENTS, false))
            }
            InspectState::Inspecting { .. } => {
                Some(self.install(InspectStateKind::Inspecting, INSPECTING_EVENTS, true))
            }
            InspectState::Focused { focused, panel } => {
                let refreshed = focus::refresh_focused(
                    &mut self.host,
                    &mut self.render_counts.borrow_mut(),
                    focused,
                    panel,
                );
                refreshed.map(|()| self.install(InspectStateKind::Focused, FOCUSED_EVENTS, false))
            }
        };
    }

    fn install(
        &mut self,
        kind: InspectStateKind,
        events: &[DomEventKind],
        with_capture_layer: bool,
    ) -> ActiveListeners {
        let capture_layer = if with_capture_layer {
            let layer = self.host.insert_capture_layer();
            if layer.is_none() {
                tracing::debug!("no overlay surface; picking without a capture layer");
            }
            layer
        } else {
            None
        };
        ActiveListeners::install(&mut self.host, kind, events, capture_layer, self.pointer_window)
    }

    /// Deliver an event to the listener the host registered under `listener`.
    ///
    /// Listeners from a torn-down installation are ignored, as are events that
    /// arrive after the state changed but before the transition ran.
    pub fn handle_event(
        &mut self,
        listener: ListenerId,
        event: DomEvent,
        now: Instant,
    ) -> Propagation {
        let Some(mut active) = self.active.take() else {
            return Propagation::Continue;
        };

        let live = active.event_kind(listener) == Some(event.kind())
            && active.kind == self.state.kind();
        let propagation = if live {
            self.dispatch(&mut active, event, now)
        } else {
            tracing::trace!(?listener, "ignoring event for stale listener");
            Propagation::Continue
        };

        self.active = Some(active);
        propagation
    }

    fn dispatch(
        &mut self,
        active: &mut ActiveListeners,
        event: DomEvent,
        now: Instant,
    ) -> Propagation {
        match self.state {
            InspectState::Uninitialized => Propagation::Continue,
            InspectState::InspectOff { .. } => {
                if let DomEvent::PointerMove { .. } = event {
                    // A draw scheduled just before entering inspect-off can land after it.
                    self.host.clear_overlay();
                }
                Propagation::Continue
            }
            InspectState::Inspecting { hovered, panel } => {
                self.on_inspecting(active, hovered, panel, event, now)
            }
            InspectState::Focused { focused, panel } => self.on_focused(focused, panel, event, now),
        }
    }

    fn on_inspecting(
        &mut self,
        active: &mut ActiveListeners,
        hovered: Option<ElementId>,
        panel: PanelId,
        event: DomEvent,
        now: Instant,
    ) -> Propagation {
        match event {
            DomEvent::PointerMove { position } => {
                if !active.pointer_limiter.allow(now) {
                    return Propagation::Continue;
                }
                let Some(element) = self.hit_test(active, position) else {
                    return Propagation::Continue;
                };
                active.hovered = Some(element);
                self.state = InspectState::Inspecting {
                    hovered: Some(element),
                    panel,
                };
                self.host.draw_highlight(element, HighlightMode::Inspecting);
                Propagation::Continue
            }
            DomEvent::Scroll | DomEvent::Resize => {
                if let Some(element) = hovered {
                    self.host.draw_highlight(element, HighlightMode::Inspecting);
                }
                Propagation::Continue
            }
            DomEvent::Click { position, .. } => {
                let element = match active.hovered {
                    Some(element) => Some(element),
                    None => self.hit_test(active, position),
                };
                let Some(element) = element else {
                    tracing::debug!(?position, "click hit no element");
                    return Propagation::StopImmediate;
                };
                self.host.draw_highlight(element, HighlightMode::Locked);
                self.set_state(
                    InspectState::Focused {
                        focused: element,
                        panel,
                    },
                    now,
                );
                Propagation::StopImmediate
            }
            DomEvent::KeyDown { .. } => Propagation::Continue,
        }
    }

    fn on_focused(
        &mut self,
        focused: ElementId,
        panel: PanelId,
        event: DomEvent,
        now: Instant,
    ) -> Propagation {
        match event {
            DomEvent::KeyDown { key, target } => {
                if key != ESCAPE_KEY {
                    return Propagation::Continue;
                }
                let element = target.unwrap_or(focused);
                self.host.clear_overlay();
                self.host.draw_highlight(element, HighlightMode::Inspecting);
                self.set_state(
                    InspectState::Inspecting {
                        hovered: Some(element),
                        panel,
                    },
                    now,
                );
                Propagation::Continue
            }
            DomEvent::Click { position, target } => {
                if !self.hits_lock_icon(position) {
                    return Propagation::Continue;
                }
                let element = target.unwrap_or(focused);
                self.host.clear_panel(panel);
                self.host.clear_overlay();
                self.host.draw_highlight(element, HighlightMode::Inspecting);
                self.set_state(
                    InspectState::Inspecting {
                        hovered: Some(element),
                        panel,
                    },
                    now,
                );
                Propagation::Stop
            }
            DomEvent::Scroll | DomEvent::Resize => {
                self.host.draw_highlight(focused, HighlightMode::Locked);
                Propagation::Continue
            }
            DomEvent::PointerMove { .. } => Propagation::Continue,
        }
    }

    /// Hit-test the real element under `position`, with the capture layer's
    /// interception lifted for the duration of the query.
    fn hit_test(&mut self, active: &ActiveListeners, position: Point) -> Option<ElementId> {
        if let Some(layer) = active.capture_layer {
            self.host.set_capture_interception(layer, false);
        }
        let element = self.host.element_from_point(position);
        if let Some(layer) = active.capture_layer {
            self.host.set_capture_interception(layer, true);
        }
        element
    }

    fn hits_lock_icon(&self, position: Point) -> bool {
        let Some(lock) = self.host.lock_icon_rect() else {
            return false;
        };
        let Some(geometry) = self.host.surface_geometry() else {
            return false;
        };
        lock.contains(geometry.to_surface(position))
    }
}
