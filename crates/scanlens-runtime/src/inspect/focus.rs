use crate::host::{
    ElementTree, HostTree, InspectHost, OverlayRenderer, PanelRenderer, PanelUpdate, ReportTracker,
};
use crate::render_cache::RenderCountCache;
use scanlens_engine::ComponentTree;
use scanlens_types::{ElementId, HighlightMode, PanelId};

/// One refresh of the focused element: resolve its owning component, update
/// the panel and redraw the locked highlight.
///
/// Any missing piece (node, state element, geometry, composite ancestor)
/// aborts the refresh without side effects and returns `None`.
pub(crate) fn refresh_focused<H: InspectHost + ?Sized>(
    host: &mut H,
    render_counts: &mut RenderCountCache,
    focused: ElementId,
    panel: PanelId,
) -> Option<()> {
    let Some(associated) = host.nearest_node(focused) else {
        tracing::debug!(%focused, "focused element has no associated node");
        return None;
    };
    let current = host.current_version(associated);

    let Some(state_element) = host.first_state_node(current) else {
        tracing::debug!(node = %current, "no state node for focused element");
        return None;
    };
    if host.bounding_rect(state_element).is_none() {
        tracing::debug!(element = %state_element, "state node has no geometry");
        return None;
    }

    let Some(composite) = host.nearest_composite(current) else {
        tracing::debug!(node = %current, "no composite ancestor for focused element");
        return None;
    };
    let composite = host.current_version(composite);
    let pair = host.versioned(composite);

    // Double-buffered trees alias two node objects to one component, so the
    // tracker may have filed the data under either.
    let report = host.report_data(composite).or_else(|| {
        pair.alternate
            .and_then(|alternate| host.report_data(alternate))
    });

    let count = report.as_ref().map_or(0, |r| r.count);
    let last_read = render_counts.swap(&pair, count);
    // Without report data there is no count to compare; the tracker decides alone.
    let did_render = match &report {
        Some(_) => count != last_read && host.did_render(composite),
        None => host.did_render(composite),
    };

    tracing::trace!(
        node = %composite,
        count,
        last_read,
        did_render,
        "refreshing focused panel"
    );

    host.render_panel(
        panel,
        PanelUpdate {
            node: composite,
            state_element,
            did_render,
            report,
        },
    );
    host.draw_highlight(focused, HighlightMode::Locked);
    Some(())
}
