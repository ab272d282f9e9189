mod support;

use predicates::str::contains;
use support::TestBoard;

#[test]
fn task_add_lands_in_current_project() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    let task = board.json(&["task", "add", "write report", "--state", "Por hacer"])?;

    assert_eq!(task["projectId"].as_u64(), Some(1));
    assert_eq!(task["state"].as_str(), Some("Por hacer"));

    let state = board.read_state()?;
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(Some(state.tasks[0].id.as_str()), task["id"].as_str());
    Ok(())
}

#[test]
fn task_add_defaults_to_first_state() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    let task = board.json(&["task", "add", "triage"])?;
    assert_eq!(task["state"].as_str(), Some("Por hacer"));
    Ok(())
}

#[test]
fn blank_title_fails_with_validation_error() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    board
        .cmd()
        .args(["task", "add", "   "])
        .assert()
        .code(2)
        .stderr(contains("El título de la tarea no puede estar vacío"));

    assert!(!board.slot_path().exists());
    Ok(())
}

#[test]
fn task_update_changes_state() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    let task = board.json(&["task", "add", "ship it"])?;
    let id = task["id"].as_str().expect("task id").to_string();

    let updated = board.json(&["task", "update", &id, "--state", "Completado"])?;
    assert_eq!(updated["state"].as_str(), Some("Completado"));

    let dashboard = board.json(&["dashboard"])?;
    assert_eq!(dashboard["metrics"]["completedTasks"].as_u64(), Some(1));
    Ok(())
}

#[test]
fn task_rm_unknown_id_reports_json_error() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    let output = board
        .cmd()
        .args(["task", "rm", "missing", "--json"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output)?;

    assert_eq!(value["status"].as_str(), Some("error"));
    assert_eq!(value["command"].as_str(), Some("task rm"));
    assert_eq!(value["error"]["kind"].as_str(), Some("validation"));
    assert_eq!(
        value["error"]["message"].as_str(),
        Some("La tarea a eliminar no existe")
    );
    Ok(())
}

#[test]
fn board_only_shows_current_project() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    board.json(&["task", "add", "first project task"])?;
    board.json(&["project", "use", "2"])?;
    board.json(&["task", "add", "second project task"])?;

    let view = board.json(&["board"])?;
    let columns = view["columns"].as_array().expect("columns");
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0]["state"].as_str(), Some("Por hacer"));
    let todo = columns[0]["tasks"].as_array().expect("tasks");
    assert_eq!(todo.len(), 1);
    assert_eq!(todo[0]["title"].as_str(), Some("second project task"));

    let list = board.json(&["task", "list", "--project", "1"])?;
    assert_eq!(list["total"].as_u64(), Some(1));
    Ok(())
}

#[test]
fn concurrent_adds_are_all_kept() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    let bin = assert_cmd::cargo::cargo_bin("taskdeck");

    let children = (0..4)
        .map(|i| {
            std::process::Command::new(&bin)
                .env_remove("RUST_LOG")
                .env("TASKDECK_DIR", board.path())
                .args(["task", "add", &format!("paralela {i}"), "--quiet"])
                .spawn()
        })
        .collect::<std::io::Result<Vec<_>>>()?;
    for mut child in children {
        assert!(child.wait()?.success());
    }

    let state = board.read_state()?;
    assert_eq!(state.tasks.len(), 4);
    Ok(())
}
