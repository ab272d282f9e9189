use std::fs;

use taskdeck::lock::{lock_path_for, FileLock};
use taskdeck::storage::{Persistence, DEFAULT_SLOT};
use taskdeck::{Error, FileSlot, MemorySlot, ProjectDraft, RootState, Store, TaskDraft};

#[test]
fn file_store_hydrates_previous_session() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    let task_id = {
        let mut store = Store::open_default(FileSlot::new(dir.path(), DEFAULT_SLOT))?;
        store.add_project(ProjectDraft::new("Casa", "tareas de casa"))?;
        store.set_current_project(3)?;
        store.add_task(TaskDraft::new("pintar", "En progreso"))?.id
    };

    let store = Store::open_default(FileSlot::new(dir.path(), DEFAULT_SLOT))?;
    assert_eq!(store.projects().len(), 3);
    assert_eq!(store.current_project().map(|p| p.name.as_str()), Some("Casa"));
    let task = store.task(&task_id).expect("persisted task");
    assert_eq!(task.project_id, 3);
    Ok(())
}

#[test]
fn persisted_json_uses_slot_layout() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let slot = FileSlot::new(dir.path(), DEFAULT_SLOT);
    let path = slot.path().to_path_buf();
    let mut store = Store::open_default(slot)?;
    store.add_task(TaskDraft::new("a", "Por hacer"))?;

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    assert_eq!(value["currentProjectId"], 1);
    assert_eq!(value["taskStates"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["tasks"][0]["projectId"], 1);
    assert_eq!(value["tasks"][0]["state"], "Por hacer");
    Ok(())
}

#[test]
fn corrupt_slot_falls_back_to_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let slot = FileSlot::new(dir.path(), DEFAULT_SLOT);
    fs::write(slot.path(), "[1, 2")?;

    let store = Store::open_default(slot)?;
    assert_eq!(store.state(), &RootState::default());
    Ok(())
}

#[test]
fn defaults_are_not_written_until_first_change() -> Result<(), Box<dyn std::error::Error>> {
    let slot = MemorySlot::new();
    let mut store = Store::open_default(slot.clone())?;
    assert!(slot.content().is_none());

    store.set_current_project(2)?;
    assert_eq!(slot.writes(), 1);
    Ok(())
}

#[test]
fn save_failure_diverges_until_next_success() -> Result<(), Box<dyn std::error::Error>> {
    let slot = MemorySlot::new();
    let mut store = Store::open_default(slot.clone())?;

    slot.set_fail_writes(true);
    store.add_task(TaskDraft::new("lost on disk", "Por hacer"))?;
    assert_eq!(store.tasks().len(), 1);
    assert!(slot.content().is_none());

    slot.set_fail_writes(false);
    store.add_task(TaskDraft::new("second", "Por hacer"))?;
    let saved = Persistence::new(slot).load()?.expect("saved state");
    assert_eq!(saved.tasks.len(), 2);
    Ok(())
}

#[test]
fn memory_slot_seeds_hydration() -> Result<(), Box<dyn std::error::Error>> {
    let raw = r#"{"tasks":[],"projects":[{"id":7,"name":"Solo","description":""}],"currentProjectId":7,"taskStates":["Abierta","Cerrada"]}"#;
    let store = Store::open_default(MemorySlot::with_content(raw))?;
    assert_eq!(store.current_project_id(), Some(7));
    assert_eq!(store.task_states(), ["Abierta".to_string(), "Cerrada".to_string()]);
    assert_eq!(store.project_metrics().tasks_by_state.len(), 2);
    Ok(())
}

#[test]
fn held_board_keeps_both_sessions_changes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    let mut first = Store::open_default(FileSlot::new(dir.path(), DEFAULT_SLOT).hold()?)?;
    first.add_task(TaskDraft::new("primera", "Por hacer"))?;

    let busy = FileSlot::new(dir.path(), DEFAULT_SLOT)
        .with_lock_timeout(50)
        .hold();
    assert!(matches!(busy, Err(Error::LockFailed(_))));
    drop(first);

    let mut second = Store::open_default(FileSlot::new(dir.path(), DEFAULT_SLOT).hold()?)?;
    second.add_task(TaskDraft::new("segunda", "Por hacer"))?;
    drop(second);

    let reopened = Store::open_default(FileSlot::new(dir.path(), DEFAULT_SLOT))?;
    assert_eq!(reopened.tasks().len(), 2);
    Ok(())
}

#[test]
fn contended_open_fails_instead_of_seeding() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    {
        let mut store = Store::open_default(FileSlot::new(dir.path(), DEFAULT_SLOT))?;
        for i in 0..5 {
            store.add_task(TaskDraft::new(format!("tarea {i}"), "Por hacer"))?;
        }
    }

    let slot = FileSlot::new(dir.path(), DEFAULT_SLOT).with_lock_timeout(50);
    let other = FileLock::acquire(lock_path_for(slot.path()), 50)?;
    let opened = Store::open_default(slot.clone());
    assert!(matches!(opened, Err(Error::LockFailed(_))));
    drop(other);

    let mut store = Store::open_default(slot)?;
    store.add_task(TaskDraft::new("una más", "Por hacer"))?;
    let reopened = Store::open_default(FileSlot::new(dir.path(), DEFAULT_SLOT))?;
    assert_eq!(reopened.tasks().len(), 6);
    Ok(())
}
