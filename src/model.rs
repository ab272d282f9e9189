//! Board data model.
//!
//! Field names serialize in camelCase so the persisted slot keeps the
//! `tasks` / `projects` / `currentProjectId` / `taskStates` layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default task-state taxonomy, in display order.
pub const DEFAULT_TASK_STATES: [&str; 3] = ["Por hacer", "En progreso", "Completado"];

/// Label counted as done by [`ProjectMetrics::completed_tasks`].
pub const COMPLETED_STATE: &str = "Completado";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub state: String,
    pub project_id: u64,
}

/// Input for `add_task`: id and project are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub state: String,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            state: state.into(),
        }
    }
}

/// Input for `add_project`: the id is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Input for `delete_project`.
///
/// Owned tasks move to `target_project_id` only when `transfer_tasks` is set
/// and a target is given; otherwise they are deleted with the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteProject {
    pub project_id: u64,
    pub transfer_tasks: bool,
    pub target_project_id: Option<u64>,
}

impl DeleteProject {
    pub fn discard_tasks(project_id: u64) -> Self {
        Self {
            project_id,
            transfer_tasks: false,
            target_project_id: None,
        }
    }

    pub fn transfer_to(project_id: u64, target_project_id: u64) -> Self {
        Self {
            project_id,
            transfer_tasks: true,
            target_project_id: Some(target_project_id),
        }
    }

    /// Target project when this request moves tasks instead of deleting them.
    pub fn transfer_target(&self) -> Option<u64> {
        if self.transfer_tasks {
            self.target_project_id
        } else {
            None
        }
    }
}

/// The single persisted tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootState {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub current_project_id: Option<u64>,
    pub task_states: Vec<String>,
}

impl RootState {
    /// Seed state used when nothing has been persisted yet.
    pub fn seed(task_states: Vec<String>) -> Self {
        Self {
            tasks: Vec::new(),
            projects: vec![
                Project {
                    id: 1,
                    name: "Proyecto 1".to_string(),
                    description: "Descripción del Proyecto 1".to_string(),
                },
                Project {
                    id: 2,
                    name: "Proyecto 2".to_string(),
                    description: "Descripción del Proyecto 2".to_string(),
                },
            ],
            current_project_id: Some(1),
            task_states,
        }
    }

    pub fn next_project_id(&self) -> u64 {
        self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    pub fn has_project(&self, id: u64) -> bool {
        self.projects.iter().any(|p| p.id == id)
    }

    pub fn has_task(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn has_task_state(&self, state: &str) -> bool {
        self.task_states.iter().any(|s| s == state)
    }
}

impl Default for RootState {
    fn default() -> Self {
        Self::seed(DEFAULT_TASK_STATES.iter().map(|s| s.to_string()).collect())
    }
}

/// Dashboard aggregate over every project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub tasks_by_state: BTreeMap<String, usize>,
}
