//! Read-only board views: dashboard, states and the per-state board.

use serde::Serialize;

use crate::cli::BoardContext;
use crate::error::Result;
use crate::model::{Project, ProjectMetrics, Task};
use crate::output::{emit_success, Report};

#[derive(Serialize)]
struct DashboardOutput<'a> {
    current_project: Option<&'a Project>,
    metrics: ProjectMetrics,
}

#[derive(Serialize)]
struct StateCount<'a> {
    state: &'a str,
    tasks: usize,
}

#[derive(Serialize)]
struct StatesOutput<'a> {
    current_project_id: Option<u64>,
    states: Vec<StateCount<'a>>,
}

#[derive(Serialize)]
struct BoardColumn<'a> {
    state: &'a str,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct BoardOutput<'a> {
    current_project: Option<&'a Project>,
    columns: Vec<BoardColumn<'a>>,
}

pub(crate) fn run_dashboard(ctx: &BoardContext) -> Result<()> {
    let store = &ctx.store;
    let output = DashboardOutput {
        current_project: store.current_project(),
        metrics: store.project_metrics(),
    };
    let metrics = &output.metrics;

    let mut report = Report::new("Dashboard");
    report.fact("Projects", metrics.total_projects.to_string());
    report.fact("Tasks", metrics.total_tasks.to_string());
    report.fact(
        "Completed",
        format!(
            "{} ({}%)",
            metrics.completed_tasks,
            percent(metrics.completed_tasks, metrics.total_tasks)
        ),
    );
    if let Some(project) = output.current_project {
        report.fact("Current project", project.name.clone());
    }
    // Taxonomy order, not map order.
    for state in store.task_states() {
        let count = metrics.tasks_by_state.get(state).copied().unwrap_or(0);
        report.line(format!("{state}: {count}"));
    }
    emit_success(ctx.options, "dashboard", &output, Some(&report))
}

pub(crate) fn run_states(ctx: &BoardContext) -> Result<()> {
    let store = &ctx.store;
    let states: Vec<StateCount<'_>> = store
        .task_states()
        .iter()
        .map(|state| StateCount {
            state: state.as_str(),
            tasks: store.tasks_by_state(state).len(),
        })
        .collect();
    let output = StatesOutput {
        current_project_id: store.current_project_id(),
        states,
    };

    let mut report = Report::new("Task states");
    for entry in &output.states {
        report.line(format!("{} ({})", entry.state, entry.tasks));
    }
    emit_success(ctx.options, "states", &output, Some(&report))
}

pub(crate) fn run_board(ctx: &BoardContext) -> Result<()> {
    let store = &ctx.store;
    let columns: Vec<BoardColumn<'_>> = store
        .task_states()
        .iter()
        .map(|state| BoardColumn {
            state: state.as_str(),
            tasks: store.tasks_by_state(state),
        })
        .collect();
    let output = BoardOutput {
        current_project: store.current_project(),
        columns,
    };

    let header = match output.current_project {
        Some(project) => format!("Board: {}", project.name),
        None => "Board".to_string(),
    };
    let mut report = Report::new(header);
    for column in &output.columns {
        report.fact(column.state, column.tasks.len().to_string());
        for task in &column.tasks {
            report.line(format!("[{}] {} {}", column.state, task.id, task.title));
        }
    }
    if output.current_project.is_none() {
        report.note("no current project; run `taskdeck project use <id>`");
    }
    emit_success(ctx.options, "board", &output, Some(&report))
}

fn percent(part: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        part * 100 / total
    }
}
