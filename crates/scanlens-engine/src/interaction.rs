use chrono::Utc;
use scanlens_types::{
    ElementId, InteractionId, InteractionKind, InteractionRecord, RawInteractionEntry,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// NOTE: InteractionAggregator Design
//
// A single interaction (one click, one key press) is reported as several raw
// entries (pointerdown, pointerup, click...). They share an interaction id and
// are merged into one record that keeps the worst duration seen so far:
// - longer entry: replaces the entries list, latency goes up
// - same duration and same start time: another view of the same frame, appended
// - anything else: ignored
// The latency of a record therefore never decreases.
//
// Component attribution is not done here. The new-record callback hands the
// record to the caller, which resolves the target against the host tree.

/// Key used for a `first-input` entry that arrives without an interaction id.
const FIRST_INPUT_KEY: &str = "first-input";

/// Index shared between an aggregator and the code that reads it.
pub type SharedInteractionIndex = Rc<RefCell<LongestInteractionIndex>>;

/// Append-only registry of interaction records, kept sorted by latency,
/// worst first. Records are updated in place and never removed.
#[derive(Debug, Default)]
pub struct LongestInteractionIndex {
    records: HashMap<InteractionId, InteractionRecord>,
    order: Vec<InteractionId>,
}

impl LongestInteractionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedInteractionIndex {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &InteractionId) -> Option<&InteractionRecord> {
        self.records.get(id)
    }

    /// Records in descending latency order.
    pub fn iter(&self) -> impl Iterator<Item = &InteractionRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn longest(&self, limit: usize) -> Vec<&InteractionRecord> {
        self.iter().take(limit).collect()
    }

    fn insert(&mut self, record: InteractionRecord) {
        self.order.push(record.id.clone());
        self.records.insert(record.id.clone(), record);
    }

    fn get_mut(&mut self, id: &InteractionId) -> Option<&mut InteractionRecord> {
        self.records.get_mut(id)
    }

    // Stable, so equal latencies keep insertion order.
    fn sort(&mut self) {
        let records = &self.records;
        self.order.sort_by(|a, b| {
            let latency = |id: &InteractionId| records.get(id).map_or(0.0, |r| r.latency);
            latency(b).total_cmp(&latency(a))
        });
    }
}

/// What the aggregator did with one raw entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Neither an interaction id nor a first-input entry
    Rejected,
    /// First entry for its id carried an event name we cannot classify
    UnknownKind,
    /// A new record was created and the callback invoked
    Created,
    /// Longer duration: the record now holds only this entry
    Replaced,
    /// Same duration and start time as the stored entries
    Appended,
    /// Shorter, or equal duration from a different frame
    Ignored,
}

type NewInteractionCallback = Box<dyn FnMut(&InteractionRecord)>;

/// Long-lived subscriber that folds raw timing entries into interaction records.
pub struct InteractionAggregator {
    index: SharedInteractionIndex,
    first_targets: HashMap<InteractionId, ElementId>,
    on_new: NewInteractionCallback,
}

impl InteractionAggregator {
    pub fn new(
        index: SharedInteractionIndex,
        on_new: impl FnMut(&InteractionRecord) + 'static,
    ) -> Self {
        Self {
            index,
            first_targets: HashMap::new(),
            on_new: Box::new(on_new),
        }
    }

    pub fn index(&self) -> &SharedInteractionIndex {
        &self.index
    }

    /// First target ever reported for an interaction id.
    pub fn first_target(&self, id: &InteractionId) -> Option<ElementId> {
        self.first_targets.get(id).copied()
    }

    pub fn process(&mut self, entry: RawInteractionEntry) -> EntryOutcome {
        let id = match entry.id() {
            Some(id) => id.clone(),
            None if entry.is_first_input() => InteractionId::new(FIRST_INPUT_KEY),
            None => {
                tracing::trace!(name = %entry.name, "rejected entry without interaction id");
                return EntryOutcome::Rejected;
            }
        };

        if entry.id().is_some()
            && let Some(target) = entry.target
        {
            self.first_targets.entry(id.clone()).or_insert(target);
        }

        let created = {
            let mut index = self.index.borrow_mut();
            let outcome = match index.get_mut(&id) {
                Some(existing) => merge_into(existing, entry),
                None => match InteractionKind::from_event_name(&entry.name) {
                    Some(kind) => {
                        let target = entry.target.or_else(|| self.first_targets.get(&id).copied());
                        let record = InteractionRecord::from_entry(
                            id.clone(),
                            kind,
                            entry,
                            target,
                            Utc::now(),
                        );
                        index.insert(record);
                        EntryOutcome::Created
                    }
                    None => {
                        tracing::warn!(
                            interaction_id = %id,
                            name = %entry.name,
                            "dropping interaction with unrecognized event name"
                        );
                        return EntryOutcome::UnknownKind;
                    }
                },
            };
            index.sort();
            match outcome {
                EntryOutcome::Created => index.get(&id).cloned(),
                _ => {
                    tracing::trace!(interaction_id = %id, ?outcome, "merged entry");
                    return outcome;
                }
            }
        };

        // The index borrow is released so the callback may read it.
        if let Some(record) = created {
            tracing::debug!(
                interaction_id = %record.id,
                kind = %record.kind,
                latency = record.latency,
                "new interaction"
            );
            (self.on_new)(&record);
        }
        EntryOutcome::Created
    }

    pub fn process_all(
        &mut self,
        entries: impl IntoIterator<Item = RawInteractionEntry>,
    ) -> Vec<EntryOutcome> {
        entries.into_iter().map(|entry| self.process(entry)).collect()
    }
}

fn merge_into(existing: &mut InteractionRecord, entry: RawInteractionEntry) -> EntryOutcome {
    if entry.duration > existing.latency {
        existing.latency = entry.duration;
        existing.entries = vec![entry];
        EntryOutcome::Replaced
    } else if entry.duration == existing.latency
        && existing
            .entries
            .first()
            .is_some_and(|first| first.start_time == entry.start_time)
    {
        existing.entries.push(entry);
        EntryOutcome::Appended
    } else {
        EntryOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, duration: f64, start: f64) -> RawInteractionEntry {
        RawInteractionEntry {
            interaction_id: Some(InteractionId::from(id)),
            entry_type: "event".to_string(),
            name: name.to_string(),
            target: Some(ElementId::new(1)),
            duration,
            start_time: start,
            processing_start: start + 2.0,
            processing_end: start + 10.0,
        }
    }

    fn aggregator() -> (InteractionAggregator, Rc<RefCell<Vec<InteractionId>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let aggregator = InteractionAggregator::new(LongestInteractionIndex::shared(), move |r| {
            sink.borrow_mut().push(r.id.clone())
        });
        (aggregator, seen)
    }

    #[test]
    fn test_longer_entry_replaces_entries() {
        let (mut agg, seen) = aggregator();
        let first = entry("x1", "click", 50.0, 0.0);
        let second = entry("x1", "click", 80.0, 0.0);

        assert_eq!(agg.process(first), EntryOutcome::Created);
        assert_eq!(agg.process(second.clone()), EntryOutcome::Replaced);

        let index = agg.index().borrow();
        let record = index.get(&InteractionId::from("x1")).unwrap();
        assert_eq!(record.latency, 80.0);
        assert_eq!(record.entries, vec![second]);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_equal_duration_same_start_appends() {
        let (mut agg, _) = aggregator();
        agg.process(entry("x1", "pointerdown", 40.0, 5.0));
        assert_eq!(
            agg.process(entry("x1", "pointerup", 40.0, 5.0)),
            EntryOutcome::Appended
        );
        assert_eq!(
            agg.process(entry("x1", "click", 40.0, 6.0)),
            EntryOutcome::Ignored
        );
        assert_eq!(
            agg.process(entry("x1", "click", 30.0, 5.0)),
            EntryOutcome::Ignored
        );

        let index = agg.index().borrow();
        let record = index.get(&InteractionId::from("x1")).unwrap();
        assert_eq!(record.entries.len(), 2);
        assert_eq!(record.latency, 40.0);
    }

    #[test]
    fn test_rejects_entries_without_id() {
        let (mut agg, seen) = aggregator();
        let mut raw = entry("x", "click", 10.0, 0.0);
        raw.interaction_id = None;
        assert_eq!(agg.process(raw), EntryOutcome::Rejected);
        assert!(agg.index().borrow().is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_first_input_without_id_is_accepted() {
        let (mut agg, seen) = aggregator();
        let mut raw = entry("x", "pointerdown", 10.0, 0.0);
        raw.interaction_id = None;
        raw.entry_type = "first-input".to_string();
        assert_eq!(agg.process(raw), EntryOutcome::Created);
        assert_eq!(seen.borrow().as_slice(), &[InteractionId::from(FIRST_INPUT_KEY)]);
    }

    #[test]
    fn test_unknown_name_on_first_sight_is_dropped() {
        let (mut agg, seen) = aggregator();
        assert_eq!(
            agg.process(entry("x2", "mouseover", 90.0, 0.0)),
            EntryOutcome::UnknownKind
        );
        assert!(agg.index().borrow().is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unknown_name_merges_into_existing_record() {
        let (mut agg, _) = aggregator();
        agg.process(entry("x3", "keydown", 20.0, 0.0));
        assert_eq!(
            agg.process(entry("x3", "keypress", 60.0, 0.0)),
            EntryOutcome::Replaced
        );
    }

    #[test]
    fn test_index_sorted_by_latency_descending() {
        let (mut agg, _) = aggregator();
        agg.process(entry("a", "click", 30.0, 0.0));
        agg.process(entry("b", "click", 90.0, 100.0));
        agg.process(entry("c", "keyup", 60.0, 200.0));
        agg.process(entry("a", "click", 120.0, 0.0));

        let index = agg.index().borrow();
        let order: Vec<&str> = index.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(index.longest(2).len(), 2);
    }

    #[test]
    fn test_first_seen_target_is_remembered() {
        let (mut agg, _) = aggregator();
        let mut untargeted = entry("t1", "click", 10.0, 0.0);
        untargeted.target = None;
        agg.process(untargeted);

        let mut late = entry("t1", "click", 20.0, 0.0);
        late.target = Some(ElementId::new(5));
        agg.process(late);
        let mut later = entry("t1", "click", 30.0, 0.0);
        later.target = Some(ElementId::new(6));
        agg.process(later);

        assert_eq!(
            agg.first_target(&InteractionId::from("t1")),
            Some(ElementId::new(5))
        );
    }

    #[test]
    fn test_timing_breakdown_frozen_at_creation() {
        let (mut agg, _) = aggregator();
        agg.process(entry("d", "click", 50.0, 100.0));
        agg.process(entry("d", "click", 75.0, 100.0));

        let index = agg.index().borrow();
        let record = index.get(&InteractionId::from("d")).unwrap();
        assert_eq!(record.timing.input_delay, 2.0);
        assert_eq!(record.timing.processing_duration, 8.0);
        assert_eq!(record.timing.presentation_delay, 40.0);
        assert_eq!(record.latency, 75.0);
    }
}
