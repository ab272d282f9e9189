//! taskdeck project command implementations.

use serde::Serialize;

use crate::cli::BoardContext;
use crate::error::{Error, Result};
use crate::model::{DeleteProject, Project, ProjectDraft};
use crate::output::{emit_success, Report};

pub struct AddOptions {
    pub name: String,
    pub description: String,
}

pub struct UpdateOptions {
    pub id: u64,
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct RmOptions {
    pub id: u64,
    pub transfer_to: Option<u64>,
}

#[derive(Serialize)]
struct ProjectListOutput<'a> {
    total: usize,
    current_project_id: Option<u64>,
    projects: Vec<ProjectEntry<'a>>,
}

#[derive(Serialize)]
struct ProjectEntry<'a> {
    #[serde(flatten)]
    project: &'a Project,
    tasks: usize,
    current: bool,
}

#[derive(Serialize)]
struct ProjectRemovedOutput {
    id: u64,
    transferred_to: Option<u64>,
    tasks_affected: usize,
    current_project_id: Option<u64>,
}

#[derive(Serialize)]
struct CurrentProjectOutput<'a> {
    current_project_id: Option<u64>,
    project: Option<&'a Project>,
}

pub(crate) fn run_add(ctx: &mut BoardContext, options: AddOptions) -> Result<()> {
    let project = ctx
        .store
        .add_project(ProjectDraft::new(options.name, options.description))?;

    let mut report = Report::new("Project created");
    project_facts(&mut report, &project);
    emit_success(ctx.options, "project add", &project, Some(&report))
}

pub(crate) fn run_update(ctx: &mut BoardContext, options: UpdateOptions) -> Result<()> {
    let mut project = ctx
        .store
        .project(options.id)
        .cloned()
        .ok_or(Error::ProjectNotFound(options.id))?;
    if options.name.is_none() && options.description.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to update: pass --name or --description".to_string(),
        ));
    }
    if let Some(name) = options.name {
        project.name = name;
    }
    if let Some(description) = options.description {
        project.description = description;
    }
    ctx.store.update_project(project.clone())?;

    let mut report = Report::new("Project updated");
    project_facts(&mut report, &project);
    emit_success(ctx.options, "project update", &project, Some(&report))
}

pub(crate) fn run_rm(ctx: &mut BoardContext, options: RmOptions) -> Result<()> {
    let request = match options.transfer_to {
        Some(target) => DeleteProject::transfer_to(options.id, target),
        None => DeleteProject::discard_tasks(options.id),
    };
    let tasks_affected = ctx.store.delete_project(request)?;
    let output = ProjectRemovedOutput {
        id: options.id,
        transferred_to: options.transfer_to,
        tasks_affected,
        current_project_id: ctx.store.current_project_id(),
    };

    let mut report = Report::new("Project deleted");
    report.fact("ID", options.id.to_string());
    match options.transfer_to {
        Some(target) => {
            report.fact("Tasks moved", format!("{tasks_affected} -> project {target}"))
        }
        None => report.fact("Tasks deleted", tasks_affected.to_string()),
    }
    match ctx.store.current_project() {
        Some(current) => report.fact("Current", format!("{} {}", current.id, current.name)),
        None => report.note("no projects left"),
    }
    emit_success(ctx.options, "project rm", &output, Some(&report))
}

pub(crate) fn run_list(ctx: &BoardContext) -> Result<()> {
    let store = &ctx.store;
    let current = store.current_project_id();
    let projects: Vec<ProjectEntry<'_>> = store
        .projects()
        .iter()
        .map(|project| ProjectEntry {
            project,
            tasks: store.tasks_by_project(project.id).len(),
            current: current == Some(project.id),
        })
        .collect();
    let output = ProjectListOutput {
        total: projects.len(),
        current_project_id: current,
        projects,
    };

    let mut report = Report::new("Projects");
    report.fact("Total", output.total.to_string());
    for entry in &output.projects {
        let marker = if entry.current { "*" } else { " " };
        report.line(format!(
            "{marker} {} {} ({} tasks)",
            entry.project.id, entry.project.name, entry.tasks
        ));
    }
    emit_success(ctx.options, "project list", &output, Some(&report))
}

pub(crate) fn run_use(ctx: &mut BoardContext, id: u64) -> Result<()> {
    ctx.store.set_current_project(id)?;
    let output = CurrentProjectOutput {
        current_project_id: ctx.store.current_project_id(),
        project: ctx.store.current_project(),
    };

    let mut report = Report::new("Current project set");
    if let Some(project) = output.project {
        project_facts(&mut report, project);
    }
    emit_success(ctx.options, "project use", &output, Some(&report))
}

fn project_facts(report: &mut Report, project: &Project) {
    report.fact("ID", project.id.to_string());
    report.fact("Name", project.name.clone());
    if !project.description.is_empty() {
        report.fact("Description", project.description.clone());
    }
}
