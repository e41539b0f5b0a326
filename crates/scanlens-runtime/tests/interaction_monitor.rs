use scanlens_engine::{EntryOutcome, LongestInteractionIndex};
use scanlens_runtime::{InteractionLog, InteractionMonitor, Scenario};
use scanlens_testing::FakeSource;
use scanlens_testing::fixtures::{todo_entries, todo_tree, write_todo_scenario};
use scanlens_types::{InteractionId, InteractionKind, PathFilters};
use std::rc::Rc;
use tempfile::TempDir;

fn monitor(filters: PathFilters) -> InteractionMonitor {
    InteractionMonitor::new(
        Rc::new(todo_tree()),
        filters,
        LongestInteractionIndex::shared(),
        InteractionLog::shared(),
    )
}

#[test]
fn test_sample_entries_fold_into_three_records() {
    let mut monitor = monitor(PathFilters::default());
    let outcomes = monitor.observe(todo_entries());

    assert_eq!(
        outcomes,
        vec![
            EntryOutcome::Created,
            EntryOutcome::Created,
            EntryOutcome::Appended,
            EntryOutcome::Created,
            EntryOutcome::Replaced,
            EntryOutcome::UnknownKind,
            EntryOutcome::Rejected,
        ]
    );

    let longest = monitor.longest(10);
    let ids: Vec<&str> = longest.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "first-input"]);
    assert_eq!(longest[0].entries.len(), 2);
    assert_eq!(longest[1].kind, InteractionKind::Keyboard);
    assert_eq!(longest[1].latency, 64.0);
}

#[test]
fn test_new_records_are_attributed_to_component_paths() {
    let mut monitor = monitor(PathFilters::default());
    monitor.observe(todo_entries());

    let log = monitor.log().borrow();
    let paths: Vec<(&str, &str, &str)> = log
        .entries()
        .iter()
        .map(|r| {
            (
                r.record.id.as_str(),
                r.component_name.as_str(),
                r.component_path.as_str(),
            )
        })
        .collect();

    assert_eq!(
        paths,
        vec![
            ("first-input", "TodoList", "App.TodoList"),
            ("1", "Button", "App.TodoList.TodoItem.Button"),
            ("2", "Memo(TodoItem)", "App.TodoList.Memo(TodoItem)"),
        ]
    );
}

#[test]
fn test_attribution_uses_configured_filters() {
    let mut monitor = monitor(PathFilters::none());
    monitor.observe(todo_entries());

    let log = monitor.log().borrow();
    let button = log
        .entries()
        .iter()
        .find(|r| r.record.id == InteractionId::from("1"))
        .unwrap();
    assert_eq!(
        button.component_path,
        "App.ThemeProvider.TodoList.TodoItem.Button"
    );
}

#[test]
fn test_subscribes_to_both_streams_and_survives_refusal() {
    let monitor = monitor(PathFilters::default());

    let mut source = FakeSource::new();
    assert_eq!(monitor.subscribe(&mut source), 2);
    let types: Vec<&str> = source
        .subscriptions()
        .iter()
        .map(|o| o.entry_type.as_str())
        .collect();
    assert_eq!(types, vec!["event", "first-input"]);
    assert_eq!(source.subscriptions()[0].duration_threshold, Some(16.0));

    let mut partial = FakeSource::new().refusing("first-input");
    assert_eq!(monitor.subscribe(&mut partial), 1);
}

#[test]
fn test_scenario_file_round_trip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_todo_scenario(dir.path())?;

    let scenario = Scenario::load_from(&path)?;
    assert_eq!(scenario.entries, todo_entries());
    assert_eq!(scenario.tree.nodes(), todo_tree().nodes());
    Ok(())
}

#[test]
fn test_scenario_with_cyclic_elements_is_refused() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("loop.json");
    std::fs::write(
        &path,
        r#"{
            "tree": {
                "nodes": [{"id": 1, "name": "App", "composite": true}],
                "elements": [
                    {"id": 10, "parent": 11},
                    {"id": 11, "parent": 10}
                ]
            },
            "entries": []
        }"#,
    )?;

    let err = Scenario::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("is its own ancestor"), "{err}");
    Ok(())
}
