//! The board store.
//!
//! [`Store`] owns the [`RootState`] and is the only thing allowed to change
//! it. Changes come in two layers:
//!
//! - **Mutation primitives** (private): one state transition each, no
//!   validation, followed by a full write-through save.
//! - **Actions** (public): read state, check preconditions, then call the
//!   primitives. A failed precondition returns an error and leaves the state
//!   untouched.
//!
//! Getters are pure reads. Persistence is best-effort (see
//! [`crate::storage::Persistence`]): an action that passed validation always
//! completes in memory even if the save fails.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{
    DeleteProject, Project, ProjectDraft, ProjectMetrics, RootState, Task, TaskDraft,
    COMPLETED_STATE,
};
use crate::storage::{Persistence, Slot};

#[derive(Debug)]
pub struct Store<S: Slot> {
    state: RootState,
    persistence: Persistence<S>,
    completed_state: String,
}

impl<S: Slot> Store<S> {
    /// Hydrate from `slot`, or start from `defaults` when it is empty or
    /// holds malformed JSON. Defaults are not written until the first
    /// mutation.
    ///
    /// Fails when the slot exists but cannot be read, e.g. another process
    /// holds its lock.
    pub fn open(slot: S, defaults: RootState) -> Result<Self> {
        let persistence = Persistence::new(slot);
        let state = match persistence.load()? {
            Some(state) => {
                tracing::info!(
                    slot = persistence.slot().name(),
                    projects = state.projects.len(),
                    tasks = state.tasks.len(),
                    "hydrated state"
                );
                state
            }
            None => {
                tracing::info!(slot = persistence.slot().name(), "using default state");
                defaults
            }
        };
        Ok(Self {
            state,
            persistence,
            completed_state: COMPLETED_STATE.to_string(),
        })
    }

    /// Hydrate with the built-in seed state as fallback.
    pub fn open_default(slot: S) -> Result<Self> {
        Self::open(slot, RootState::default())
    }

    /// Override the label counted by `project_metrics().completed_tasks`.
    ///
    /// Ignored with a warning when the board's taxonomy has no such state.
    pub fn with_completed_state(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if self.state.has_task_state(&label) {
            self.completed_state = label;
        } else {
            tracing::warn!(
                label = %label,
                keeping = %self.completed_state,
                "completed state not in board taxonomy"
            );
        }
        self
    }

    pub fn completed_state(&self) -> &str {
        &self.completed_state
    }

    pub fn slot(&self) -> &S {
        self.persistence.slot()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Add a task to the current project. Returns the stored task.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Task> {
        self.validate_task_fields(&draft.title, &draft.state)?;
        let project_id = self
            .state
            .current_project_id
            .filter(|id| self.state.has_project(*id))
            .ok_or(Error::NoCurrentProject)?;

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            state: draft.state,
            project_id,
        };
        tracing::debug!(task_id = %task.id, project_id, "add task");
        self.push_task(task.clone());
        Ok(task)
    }

    pub fn update_task(&mut self, task: Task) -> Result<()> {
        self.validate_task_fields(&task.title, &task.state)?;
        if !self.state.has_task(&task.id) {
            return Err(Error::TaskToUpdateNotFound(task.id));
        }
        if !self.state.has_project(task.project_id) {
            return Err(Error::ProjectNotFound(task.project_id));
        }
        tracing::debug!(task_id = %task.id, "update task");
        self.replace_task(task);
        Ok(())
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<()> {
        if !self.state.has_task(task_id) {
            return Err(Error::TaskToDeleteNotFound(task_id.to_string()));
        }
        tracing::debug!(task_id, "delete task");
        self.remove_task(task_id);
        Ok(())
    }

    /// Add a project with the next free id. Returns the stored project.
    pub fn add_project(&mut self, draft: ProjectDraft) -> Result<Project> {
        if draft.name.trim().is_empty() {
            return Err(Error::EmptyProjectName);
        }
        if self.state.projects.iter().any(|p| p.name == draft.name) {
            return Err(Error::DuplicateProjectName(draft.name));
        }

        let project = Project {
            id: self.state.next_project_id(),
            name: draft.name,
            description: draft.description,
        };
        tracing::debug!(project_id = project.id, "add project");
        self.push_project(project.clone());
        Ok(project)
    }

    pub fn update_project(&mut self, project: Project) -> Result<()> {
        if project.name.trim().is_empty() {
            return Err(Error::EmptyProjectName);
        }
        if self
            .state
            .projects
            .iter()
            .any(|p| p.name == project.name && p.id != project.id)
        {
            return Err(Error::DuplicateProjectName(project.name));
        }
        if !self.state.has_project(project.id) {
            return Err(Error::ProjectNotFound(project.id));
        }
        tracing::debug!(project_id = project.id, "update project");
        self.replace_project(project);
        Ok(())
    }

    pub fn set_current_project(&mut self, project_id: u64) -> Result<()> {
        if !self.state.has_project(project_id) {
            return Err(Error::ProjectNotFound(project_id));
        }
        tracing::debug!(project_id, "set current project");
        self.assign_current_project(Some(project_id));
        Ok(())
    }

    /// Delete a project, moving or discarding its tasks first.
    ///
    /// Returns the number of tasks that were moved or deleted.
    pub fn delete_project(&mut self, request: DeleteProject) -> Result<usize> {
        let project_id = request.project_id;
        if !self.state.has_project(project_id) {
            return Err(Error::ProjectNotFound(project_id));
        }
        let target = request.transfer_target();
        if let Some(target) = target {
            if target == project_id || !self.state.has_project(target) {
                return Err(Error::InvalidTransferTarget {
                    from: project_id,
                    to: target,
                });
            }
        }

        let owned: HashSet<String> = self
            .tasks_by_project(project_id)
            .into_iter()
            .map(|task| task.id.clone())
            .collect();
        let affected = owned.len();

        match target {
            Some(target) => {
                tracing::debug!(project_id, target, tasks = affected, "transfer tasks");
                self.reassign_tasks(&owned, target);
            }
            None => {
                tracing::debug!(project_id, tasks = affected, "delete project tasks");
                self.remove_tasks(&owned);
            }
        }
        self.remove_project(project_id);
        Ok(affected)
    }

    fn validate_task_fields(&self, title: &str, state: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(Error::EmptyTaskTitle);
        }
        if state.is_empty() {
            return Err(Error::MissingTaskState);
        }
        if !self.state.has_task_state(state) {
            return Err(Error::UnknownTaskState(state.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Mutation primitives
    // =========================================================================

    fn push_task(&mut self, task: Task) {
        self.state.tasks.push(task);
        self.persist();
    }

    fn replace_task(&mut self, task: Task) {
        if let Some(slot) = self.state.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
            self.persist();
        }
    }

    fn remove_task(&mut self, task_id: &str) {
        self.state.tasks.retain(|t| t.id != task_id);
        self.persist();
    }

    fn remove_tasks(&mut self, task_ids: &HashSet<String>) {
        self.state.tasks.retain(|t| !task_ids.contains(&t.id));
        self.persist();
    }

    fn reassign_tasks(&mut self, task_ids: &HashSet<String>, project_id: u64) {
        for task in self
            .state
            .tasks
            .iter_mut()
            .filter(|t| task_ids.contains(&t.id))
        {
            task.project_id = project_id;
        }
        self.persist();
    }

    fn push_project(&mut self, project: Project) {
        self.state.projects.push(project);
        self.persist();
    }

    fn replace_project(&mut self, project: Project) {
        if let Some(slot) = self.state.projects.iter_mut().find(|p| p.id == project.id) {
            *slot = project;
            self.persist();
        }
    }

    fn remove_project(&mut self, project_id: u64) {
        self.state.projects.retain(|p| p.id != project_id);
        if self.state.current_project_id == Some(project_id) {
            self.state.current_project_id = self.state.projects.first().map(|p| p.id);
        }
        self.persist();
    }

    fn assign_current_project(&mut self, project_id: Option<u64>) {
        self.state.current_project_id = project_id;
        self.persist();
    }

    fn persist(&self) {
        self.persistence.save(&self.state);
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn state(&self) -> &RootState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn projects(&self) -> &[Project] {
        &self.state.projects
    }

    pub fn task_states(&self) -> &[String] {
        &self.state.task_states
    }

    pub fn current_project_id(&self) -> Option<u64> {
        self.state.current_project_id
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn project(&self, project_id: u64) -> Option<&Project> {
        self.state.projects.iter().find(|p| p.id == project_id)
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.state
            .current_project_id
            .and_then(|id| self.project(id))
    }

    /// Tasks in `state_name` that belong to the current project.
    pub fn tasks_by_state(&self, state_name: &str) -> Vec<&Task> {
        let Some(current) = self.state.current_project_id else {
            return Vec::new();
        };
        self.state
            .tasks
            .iter()
            .filter(|t| t.state == state_name && t.project_id == current)
            .collect()
    }

    /// Every task of `project_id`, regardless of the current project.
    pub fn tasks_by_project(&self, project_id: u64) -> Vec<&Task> {
        self.state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .collect()
    }

    /// Counts across all projects; not scoped to the current one.
    pub fn project_metrics(&self) -> ProjectMetrics {
        let tasks = &self.state.tasks;
        let tasks_by_state: BTreeMap<String, usize> = self
            .state
            .task_states
            .iter()
            .map(|label| {
                let count = tasks.iter().filter(|t| &t.state == label).count();
                (label.clone(), count)
            })
            .collect();

        ProjectMetrics {
            total_projects: self.state.projects.len(),
            total_tasks: tasks.len(),
            completed_tasks: tasks
                .iter()
                .filter(|t| t.state == self.completed_state)
                .count(),
            tasks_by_state,
        }
    }
}

/// Cloneable handle that serializes every action behind one lock.
#[derive(Debug)]
pub struct SharedStore<S: Slot> {
    inner: Arc<Mutex<Store<S>>>,
}

impl<S: Slot> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Slot> SharedStore<S> {
    pub fn new(store: Store<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access; actions inside run one at a time.
    pub fn with<T>(&self, f: impl FnOnce(&mut Store<S>) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Hold the lock for a sequence of reads.
    pub fn lock(&self) -> MutexGuard<'_, Store<S>> {
        self.inner.lock()
    }
}
