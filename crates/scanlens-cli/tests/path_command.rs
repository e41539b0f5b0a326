use anyhow::Result;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use scanlens_testing::TestWorld;

fn command(world: &TestWorld) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("scanlens");
    world.configure_command(&mut cmd);
    cmd
}

#[test]
fn test_path_prints_filtered_chain() {
    let world = TestWorld::new().with_todo_scenario();

    command(&world)
        .args(["path", "scenario.json", "--node", "8"])
        .assert()
        .success()
        .stdout("App.TodoList.TodoItem.Button\n");
}

#[test]
fn test_path_accepts_displayed_node_form() {
    let world = TestWorld::new().with_todo_scenario();

    command(&world)
        .args(["path", "scenario.json", "--node", "node#5"])
        .assert()
        .success()
        .stdout("App.TodoList.Memo(TodoItem)\n");
}

#[test]
fn test_no_skip_needs_both_overlapping_categories() {
    let world = TestWorld::new().with_todo_scenario();

    command(&world)
        .args(["path", "scenario.json", "--node", "8", "--no-skip", "providers"])
        .assert()
        .success()
        .stdout("App.TodoList.TodoItem.Button\n");

    command(&world)
        .args([
            "path",
            "scenario.json",
            "--node",
            "8",
            "--no-skip",
            "providers",
            "--no-skip",
            "boundaries",
        ])
        .assert()
        .success()
        .stdout("App.ThemeProvider.TodoList.TodoItem.Button\n");
}

#[test]
fn test_path_json_explains_each_ancestor() -> Result<()> {
    let world = TestWorld::new().with_todo_scenario();
    let result = world.run(&["--format", "json", "path", "scenario.json", "--node", "8"])?;
    assert!(result.success());

    let json = result.json()?;
    assert_eq!(json["node"], "node#8");
    assert_eq!(json["name"], "Button");
    assert_eq!(json["path"], "App.TodoList.TodoItem.Button");

    let ancestors = json["ancestors"].as_array().unwrap();
    let names: Vec<&str> = ancestors.iter().filter_map(|a| a["name"].as_str()).collect();
    assert_eq!(names, vec!["TodoItem", "TodoList", "ThemeProvider", "App"]);
    assert_eq!(ancestors[2]["filtered"], true);
    assert_eq!(ancestors[2]["matches"], serde_json::json!(["providers", "boundaries"]));
    assert_eq!(ancestors[0]["filtered"], false);
    Ok(())
}

#[test]
fn test_path_reads_bare_snapshot() {
    let world = TestWorld::new().with_file(
        "tree.json",
        r#"{"nodes": [
            {"id": 1, "name": "Root", "composite": true},
            {"id": 2, "name": "Dashboard", "composite": true, "parent": 1},
            {"id": 3, "name": "Chart", "composite": true, "parent": 2}
        ]}"#,
    );

    command(&world)
        .args(["path", "tree.json", "--node", "3"])
        .assert()
        .success()
        .stdout("Dashboard.Chart\n");
}

#[test]
fn test_short_ancestor_is_reported_as_filtered() -> Result<()> {
    let world = TestWorld::new().with_file(
        "short.json",
        r#"{"nodes": [
            {"id": 1, "name": "Shell", "composite": true},
            {"id": 2, "name": "Ab", "composite": true, "parent": 1},
            {"id": 3, "name": "Button", "composite": true, "parent": 2}
        ]}"#,
    );
    let result = world.run(&["--format", "json", "path", "short.json", "--node", "3"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;
    assert_eq!(json["path"], "Shell.Button");
    assert_eq!(json["ancestors"][0]["name"], "Ab");
    assert_eq!(json["ancestors"][0]["filtered"], true);
    assert_eq!(json["ancestors"][0]["matches"], serde_json::json!([]));
    assert_eq!(json["ancestors"][1]["filtered"], false);
    Ok(())
}

#[test]
fn test_cyclic_tree_is_rejected() {
    let world = TestWorld::new().with_file(
        "loop.json",
        r#"{"nodes": [
            {"id": 1, "name": "Left", "composite": true, "parent": 2},
            {"id": 2, "name": "Right", "composite": true, "parent": 1}
        ]}"#,
    );

    command(&world)
        .args(["path", "loop.json", "--node", "1"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("node#1 is its own ancestor"));
}

#[test]
fn test_unknown_node_fails() {
    let world = TestWorld::new().with_todo_scenario();

    command(&world)
        .args(["path", "scenario.json", "--node", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("node#99 not found"));
}

#[test]
fn test_unknown_category_is_rejected() {
    let world = TestWorld::new().with_todo_scenario();

    command(&world)
        .args(["path", "scenario.json", "--node", "8", "--no-skip", "widgets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown filter category"));
}
