use crate::host::{ElementTree, InteractionSource, ObserveOptions};
use scanlens_engine::{
    ComponentTree, EntryOutcome, InteractionAggregator, SharedInteractionIndex, resolve_path,
};
use scanlens_types::{
    FIRST_INPUT_ENTRY_TYPE, InteractionRecord, PathFilters, RawInteractionEntry,
    ResolvedInteraction,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Only event entries at least this long (ms) are delivered by the source.
pub const EVENT_DURATION_THRESHOLD_MS: f64 = 16.0;

const EVENT_ENTRY_TYPE: &str = "event";

pub type SharedInteractionLog = Rc<RefCell<InteractionLog>>;

/// Attributed interactions, in the order they were first seen.
#[derive(Debug, Default)]
pub struct InteractionLog {
    entries: Vec<ResolvedInteraction>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedInteractionLog {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn push(&mut self, interaction: ResolvedInteraction) {
        self.entries.push(interaction);
    }

    pub fn entries(&self) -> &[ResolvedInteraction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attribute a record to the component that owns its target element.
///
/// Walks up the element chain until an element resolves to a composite node.
/// Returns `None` when the record has no target, no composite owns it, or the
/// composite has no display name.
pub fn attribute<T: ElementTree>(
    tree: &T,
    record: &InteractionRecord,
    filters: &PathFilters,
) -> Option<ResolvedInteraction> {
    let mut element = record.target?;
    let composite = loop {
        if let Some(node) = tree.composite_for_element(element) {
            break node;
        }
        element = tree.parent_element(element)?;
    };

    let component_name = tree.display_name(composite)?;
    let component_path = resolve_path(tree, composite, filters);

    Some(ResolvedInteraction {
        component_name,
        component_path,
        record: record.clone(),
    })
}

/// Session-long interaction monitor: aggregates raw entries and attributes
/// each new interaction to a component path.
pub struct InteractionMonitor {
    aggregator: InteractionAggregator,
    log: SharedInteractionLog,
}

impl InteractionMonitor {
    pub fn new<T: ElementTree + 'static>(
        tree: Rc<T>,
        filters: PathFilters,
        index: SharedInteractionIndex,
        log: SharedInteractionLog,
    ) -> Self {
        let sink = Rc::clone(&log);
        let aggregator = InteractionAggregator::new(index, move |record| {
            match attribute(tree.as_ref(), record, &filters) {
                Some(resolved) => {
                    tracing::debug!(
                        interaction_id = %record.id,
                        component = %resolved.component_name,
                        path = %resolved.component_path,
                        "attributed interaction"
                    );
                    sink.borrow_mut().push(resolved);
                }
                None => {
                    tracing::debug!(
                        interaction_id = %record.id,
                        target = ?record.target,
                        "interaction has no attributable component"
                    );
                }
            }
        });

        Self { aggregator, log }
    }

    /// Subscribe to the source's event and first-input streams. Returns how
    /// many subscriptions were accepted.
    pub fn subscribe<S: InteractionSource + ?Sized>(&self, source: &mut S) -> usize {
        let subscriptions = [
            ObserveOptions {
                entry_type: EVENT_ENTRY_TYPE.to_string(),
                buffered: true,
                duration_threshold: Some(EVENT_DURATION_THRESHOLD_MS),
            },
            ObserveOptions {
                entry_type: FIRST_INPUT_ENTRY_TYPE.to_string(),
                buffered: true,
                duration_threshold: None,
            },
        ];

        let mut accepted = 0;
        for options in subscriptions {
            let entry_type = options.entry_type.clone();
            match source.observe(options) {
                Ok(()) => accepted += 1,
                Err(err) => {
                    tracing::warn!(%entry_type, error = %err, "interaction source unavailable");
                }
            }
        }
        accepted
    }

    /// Process one delivered batch of entries, in order.
    pub fn observe(
        &mut self,
        entries: impl IntoIterator<Item = RawInteractionEntry>,
    ) -> Vec<EntryOutcome> {
        self.aggregator.process_all(entries)
    }

    /// Up to `limit` records, worst latency first.
    pub fn longest(&self, limit: usize) -> Vec<InteractionRecord> {
        self.aggregator
            .index()
            .borrow()
            .longest(limit)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn index(&self) -> &SharedInteractionIndex {
        self.aggregator.index()
    }

    pub fn log(&self) -> &SharedInteractionLog {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{ElementRecord, NodeRecord, TreeSnapshot};
    use crate::{Error, Result};
    use scanlens_engine::LongestInteractionIndex;
    use scanlens_types::{ElementId, InteractionId};

    fn tree() -> TreeSnapshot {
        TreeSnapshot::new(
            vec![
                NodeRecord::composite(1, "App", None),
                NodeRecord::composite(5, "ThemeProvider", Some(1)),
                NodeRecord::composite(2, "Memo(Toolbar)", Some(5)),
                NodeRecord::composite(3, "SearchBox", Some(2)),
                NodeRecord::host(4, "input", Some(3)),
            ],
            vec![
                ElementRecord::new(10, None, None),
                ElementRecord::new(11, Some(4), Some(10)),
                ElementRecord::new(12, None, Some(11)),
            ],
        )
    }

    fn entry(id: &str, target: Option<u64>, duration: f64) -> RawInteractionEntry {
        RawInteractionEntry {
            interaction_id: Some(InteractionId::from(id)),
            entry_type: "event".to_string(),
            name: "keydown".to_string(),
            target: target.map(ElementId::new),
            duration,
            start_time: 10.0,
            processing_start: 12.0,
            processing_end: 20.0,
        }
    }

    fn monitor() -> InteractionMonitor {
        InteractionMonitor::new(
            Rc::new(tree()),
            PathFilters::default(),
            LongestInteractionIndex::shared(),
            InteractionLog::shared(),
        )
    }

    #[test]
    fn test_new_interaction_is_attributed() {
        let mut monitor = monitor();
        monitor.observe(vec![entry("k1", Some(12), 40.0)]);

        let log = monitor.log().borrow();
        assert_eq!(log.len(), 1);
        let resolved = &log.entries()[0];
        assert_eq!(resolved.component_name, "SearchBox");
        assert_eq!(resolved.component_path, "App.Toolbar.SearchBox");
    }

    #[test]
    fn test_merged_entries_are_not_attributed_again() {
        let mut monitor = monitor();
        monitor.observe(vec![entry("k1", Some(11), 40.0), entry("k1", Some(11), 90.0)]);

        assert_eq!(monitor.log().borrow().len(), 1);
        assert_eq!(monitor.longest(5)[0].latency, 90.0);
    }

    #[test]
    fn test_unattributable_targets_are_skipped() {
        let mut monitor = monitor();
        monitor.observe(vec![entry("a", None, 30.0), entry("b", Some(10), 30.0)]);

        assert!(monitor.log().borrow().is_empty());
        assert_eq!(monitor.index().borrow().len(), 2);
    }

    struct Source {
        refuse: Option<&'static str>,
        seen: Vec<ObserveOptions>,
    }

    impl InteractionSource for Source {
        fn observe(&mut self, options: ObserveOptions) -> Result<()> {
            if self.refuse == Some(options.entry_type.as_str()) {
                return Err(Error::Source(options.entry_type));
            }
            self.seen.push(options);
            Ok(())
        }
    }

    #[test]
    fn test_subscribe_requests_event_and_first_input() {
        let mut source = Source {
            refuse: None,
            seen: Vec::new(),
        };
        assert_eq!(monitor().subscribe(&mut source), 2);
        assert_eq!(source.seen[0].duration_threshold, Some(16.0));
        assert!(source.seen.iter().all(|o| o.buffered));
        assert_eq!(source.seen[1].entry_type, "first-input");
    }

    #[test]
    fn test_refused_subscription_is_not_fatal() {
        let mut source = Source {
            refuse: Some("event"),
            seen: Vec::new(),
        };
        assert_eq!(monitor().subscribe(&mut source), 1);
        assert_eq!(source.seen.len(), 1);
    }
}
