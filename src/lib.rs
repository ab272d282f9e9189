//! taskdeck - local task and project board
//!
//! A single-user board: projects, tasks, and a fixed task-state taxonomy,
//! held by one [`store::Store`] and written through to a JSON slot after
//! every change.
//!
//! # Core Concepts
//!
//! - **Root state**: the single persisted tree (tasks, projects, current
//!   project, task states)
//! - **Actions**: validated operations that mutate the root state
//! - **Getters**: read-only views derived from the root state
//! - **Slot**: the named key-value cell the state is saved to
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskdeck.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `model`: Projects, tasks and the root state
//! - `output`: Human and JSON output formatting
//! - `storage`: Slots and best-effort persistence
//! - `store`: Actions, mutation primitives and getters

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
pub use model::{DeleteProject, Project, ProjectDraft, ProjectMetrics, RootState, Task, TaskDraft};
pub use storage::{FileSlot, MemorySlot, Slot};
pub use store::{SharedStore, Store};
