pub mod config;
pub mod error;
pub mod host;
pub mod inspect;
pub mod monitor;
pub mod render_cache;
pub mod snapshot;
pub mod throttle;

pub use config::{Config, InspectConfig};
pub use error::{Error, Result};
pub use host::{
    CaptureLayerId, Document, DomEvent, DomEventKind, ElementTree, HostTree, InspectHost,
    InteractionSource, ListenerId, ObserveOptions, OverlayRenderer, PanelRenderer, PanelUpdate,
    Propagation, ReportData, ReportTracker, SurfaceGeometry,
};
pub use inspect::{InspectStateMachine, Signal};
pub use monitor::{InteractionLog, InteractionMonitor, SharedInteractionLog, attribute};
pub use render_cache::{RenderCountCache, SharedRenderCountCache};
pub use snapshot::{ElementRecord, NodeRecord, Scenario, TreeSnapshot};
pub use throttle::{Coalescer, RateLimiter};
