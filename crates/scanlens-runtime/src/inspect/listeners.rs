use crate::host::{CaptureLayerId, Document, DomEventKind, ListenerId};
use crate::throttle::RateLimiter;
use scanlens_types::{ElementId, InspectStateKind};
use std::time::Duration;

/// Listeners and resources owned by the state whose listeners are installed.
///
/// Dropping this without calling [`ActiveListeners::teardown`] leaks host
/// registrations, so the machine always tears down before installing.
#[derive(Debug)]
pub(crate) struct ActiveListeners {
    pub kind: InspectStateKind,
    listeners: Vec<(ListenerId, DomEventKind)>,
    pub capture_layer: Option<CaptureLayerId>,
    /// Last element hit-tested by this installation's pointer-move listener
    pub hovered: Option<ElementId>,
    pub pointer_limiter: RateLimiter,
}

impl ActiveListeners {
    pub fn install<D: Document + ?Sized>(
        document: &mut D,
        kind: InspectStateKind,
        events: &[DomEventKind],
        capture_layer: Option<CaptureLayerId>,
        pointer_window: Duration,
    ) -> Self {
        let mut listeners = Vec::with_capacity(events.len());
        for event in events {
            match document.add_listener(*event) {
                Ok(id) => listeners.push((id, *event)),
                Err(err) => {
                    tracing::warn!(state = %kind, ?event, error = %err, "listener not installed");
                }
            }
        }

        tracing::trace!(state = %kind, count = listeners.len(), "installed listeners");

        Self {
            kind,
            listeners,
            capture_layer,
            hovered: None,
            pointer_limiter: RateLimiter::new(pointer_window),
        }
    }

    /// Event kind a listener was installed for, if it belongs to this installation.
    pub fn event_kind(&self, listener: ListenerId) -> Option<DomEventKind> {
        self.listeners
            .iter()
            .find(|(id, _)| *id == listener)
            .map(|(_, kind)| *kind)
    }

    pub fn listener_ids(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.listeners.iter().map(|(id, _)| *id)
    }

    pub fn teardown<D: Document + ?Sized>(self, document: &mut D) {
        for (id, _) in &self.listeners {
            document.remove_listener(*id);
        }
        if let Some(layer) = self.capture_layer {
            document.remove_capture_layer(layer);
        }
        tracing::trace!(state = %self.kind, "tore down listeners");
    }
}
