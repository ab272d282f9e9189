use taskdeck::{DeleteProject, Error, MemorySlot, ProjectDraft, Store, TaskDraft};

fn defaults() -> Store<MemorySlot> {
    Store::open_default(MemorySlot::new()).expect("open")
}

#[test]
fn add_task_to_default_board() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = defaults();
    let task = store.add_task(TaskDraft::new("write report", "Por hacer"))?;

    assert_eq!(task.project_id, 1);
    let todo = store.tasks_by_state("Por hacer");
    assert_eq!(todo.len(), 1);
    assert_eq!(todo[0].id, task.id);
    assert_eq!(store.project_metrics().total_tasks, 1);
    Ok(())
}

#[test]
fn duplicate_seed_name_is_rejected() {
    let mut store = defaults();
    let err = store
        .add_project(ProjectDraft::new("Proyecto 1", "x"))
        .expect_err("duplicate name");

    assert!(matches!(err, Error::DuplicateProjectName(_)));
    assert_eq!(err.to_string(), "Ya existe un proyecto con este nombre");
    assert_eq!(store.projects().len(), 2);
}

#[test]
fn deleting_current_project_drops_its_tasks() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = defaults();
    store.add_task(TaskDraft::new("only task", "Por hacer"))?;

    let removed = store.delete_project(DeleteProject::discard_tasks(1))?;

    assert_eq!(removed, 1);
    assert!(store.tasks().is_empty());
    assert_eq!(store.current_project_id(), Some(2));
    assert_eq!(store.projects().len(), 1);
    Ok(())
}

#[test]
fn transfer_preserves_task_count() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = defaults();
    store.add_task(TaskDraft::new("a", "Por hacer"))?;
    store.add_task(TaskDraft::new("b", "En progreso"))?;
    store.set_current_project(2)?;
    store.add_task(TaskDraft::new("c", "Completado"))?;

    store.delete_project(DeleteProject::transfer_to(1, 2))?;

    assert_eq!(store.tasks().len(), 3);
    assert!(store.tasks().iter().all(|task| task.project_id == 2));
    Ok(())
}

#[test]
fn discard_removes_exactly_the_owned_tasks() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = defaults();
    store.add_task(TaskDraft::new("a", "Por hacer"))?;
    store.add_task(TaskDraft::new("b", "Por hacer"))?;
    store.set_current_project(2)?;
    store.add_task(TaskDraft::new("c", "Por hacer"))?;
    let before = store.tasks().len();

    let removed = store.delete_project(DeleteProject::discard_tasks(1))?;

    assert_eq!(removed, 2);
    assert_eq!(store.tasks().len(), before - 2);
    assert_eq!(store.current_project_id(), Some(2));
    Ok(())
}

#[test]
fn transfer_flag_without_target_discards() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = defaults();
    store.add_task(TaskDraft::new("a", "Por hacer"))?;

    store.delete_project(DeleteProject {
        project_id: 1,
        transfer_tasks: true,
        target_project_id: None,
    })?;

    assert!(store.tasks().is_empty());
    Ok(())
}

#[test]
fn failed_update_leaves_state_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = defaults();
    let task = store.add_task(TaskDraft::new("keep me", "Por hacer"))?;
    let before = store.state().clone();

    let mut blank = task.clone();
    blank.title = "\t ".to_string();
    assert!(matches!(
        store.update_task(blank),
        Err(Error::EmptyTaskTitle)
    ));

    let mut orphan = task;
    orphan.project_id = 42;
    assert!(matches!(
        store.update_task(orphan),
        Err(Error::ProjectNotFound(42))
    ));

    assert_eq!(store.state(), &before);
    Ok(())
}

#[test]
fn tasks_by_project_ignores_current_project() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = defaults();
    store.add_task(TaskDraft::new("a", "Por hacer"))?;
    store.set_current_project(2)?;

    assert_eq!(store.tasks_by_project(1).len(), 1);
    assert!(store.tasks_by_state("Por hacer").is_empty());
    Ok(())
}

#[test]
fn completed_label_can_be_overridden() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = defaults().with_completed_state("En progreso");
    store.add_task(TaskDraft::new("a", "En progreso"))?;
    store.add_task(TaskDraft::new("b", "Completado"))?;

    assert_eq!(store.project_metrics().completed_tasks, 1);
    Ok(())
}
