//! taskdeck task command implementations.

use serde::Serialize;

use crate::cli::BoardContext;
use crate::error::{Error, Result};
use crate::model::{Task, TaskDraft};
use crate::output::{emit_success, Report};

pub struct AddOptions {
    pub title: String,
    pub state: Option<String>,
}

pub struct UpdateOptions {
    pub id: String,
    pub title: Option<String>,
    pub state: Option<String>,
    pub project: Option<u64>,
}

pub struct ListOptions {
    pub project: Option<u64>,
    pub state: Option<String>,
}

#[derive(Serialize)]
struct TaskRemovedOutput {
    id: String,
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    project_id: Option<u64>,
    total: usize,
    tasks: Vec<&'a Task>,
}

pub(crate) fn run_add(ctx: &mut BoardContext, options: AddOptions) -> Result<()> {
    let state = match options.state {
        Some(state) => state,
        None => ctx.store.task_states().first().cloned().unwrap_or_default(),
    };
    let task = ctx.store.add_task(TaskDraft::new(options.title, state))?;

    let mut report = Report::new("Task created");
    task_facts(&mut report, &task);
    emit_success(ctx.options, "task add", &task, Some(&report))
}

pub(crate) fn run_update(ctx: &mut BoardContext, options: UpdateOptions) -> Result<()> {
    let mut task = ctx
        .store
        .task(&options.id)
        .cloned()
        .ok_or_else(|| Error::TaskToUpdateNotFound(options.id.clone()))?;
    if options.title.is_none() && options.state.is_none() && options.project.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to update: pass --title, --state or --project".to_string(),
        ));
    }
    if let Some(title) = options.title {
        task.title = title;
    }
    if let Some(state) = options.state {
        task.state = state;
    }
    if let Some(project) = options.project {
        task.project_id = project;
    }
    ctx.store.update_task(task.clone())?;

    let mut report = Report::new("Task updated");
    task_facts(&mut report, &task);
    emit_success(ctx.options, "task update", &task, Some(&report))
}

pub(crate) fn run_rm(ctx: &mut BoardContext, id: &str) -> Result<()> {
    ctx.store.delete_task(id)?;
    let output = TaskRemovedOutput { id: id.to_string() };
    let mut report = Report::new("Task deleted");
    report.fact("ID", id);
    emit_success(ctx.options, "task rm", &output, Some(&report))
}

pub(crate) fn run_list(ctx: &BoardContext, options: ListOptions) -> Result<()> {
    let store = &ctx.store;
    let project_id = options.project.or(store.current_project_id());
    let mut tasks = match project_id {
        Some(id) => store.tasks_by_project(id),
        None => Vec::new(),
    };
    if let Some(state) = options.state.as_deref() {
        tasks.retain(|task| task.state == state);
    }

    let output = TaskListOutput {
        project_id,
        total: tasks.len(),
        tasks,
    };

    let header = match project_id.and_then(|id| store.project(id)) {
        Some(project) => format!("Tasks in {}", project.name),
        None => "Tasks".to_string(),
    };
    let mut report = Report::new(header);
    report.fact("Total", output.total.to_string());
    for task in &output.tasks {
        report.line(format!("{} [{}] {}", task.id, task.state, task.title));
    }
    if project_id.is_none() {
        report.note("no current project; pass --project");
    }
    emit_success(ctx.options, "task list", &output, Some(&report))
}

fn task_facts(report: &mut Report, task: &Task) {
    report.fact("ID", task.id.clone());
    report.fact("Title", task.title.clone());
    report.fact("State", task.state.clone());
    report.fact("Project", task.project_id.to_string());
}
