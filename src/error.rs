//! Error types for taskdeck
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (validation failure, bad config, bad args)
//! - 4: Operation failed (I/O, serialization, lock contention)
//!
//! Validation messages are user-facing and kept in Spanish, the language of
//! the board's default labels.

use std::path::PathBuf;
use thiserror::Error;

pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

#[derive(Error, Debug)]
pub enum Error {
    // Validation errors (exit code 2)
    #[error("El título de la tarea no puede estar vacío")]
    EmptyTaskTitle,

    #[error("Debe seleccionar un estado para la tarea")]
    MissingTaskState,

    #[error("El estado '{0}' no existe")]
    UnknownTaskState(String),

    #[error("La tarea a actualizar no existe")]
    TaskToUpdateNotFound(String),

    #[error("La tarea a eliminar no existe")]
    TaskToDeleteNotFound(String),

    #[error("El nombre del proyecto no puede estar vacío")]
    EmptyProjectName,

    #[error("Ya existe un proyecto con este nombre")]
    DuplicateProjectName(String),

    #[error("El proyecto {0} no existe")]
    ProjectNotFound(u64),

    #[error("No hay un proyecto seleccionado")]
    NoCurrentProject,

    #[error("No se pueden transferir las tareas del proyecto {from} al proyecto {to}")]
    InvalidTransferTarget { from: u64, to: u64 },

    // Other user errors (exit code 2)
    #[error("invalid taskdeck.toml: {0}")]
    InvalidConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Operation failures (exit code 4)
    #[error("board I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("board data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not parse taskdeck.toml: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("timed out waiting for lock {}", .0.display())]
    LockFailed(PathBuf),

    #[error("{0}")]
    OperationFailed(String),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            err if err.is_validation() => exit_codes::USER_ERROR,
            Error::InvalidConfig(_) | Error::InvalidArgument(_) => exit_codes::USER_ERROR,
            _ => exit_codes::OPERATION_FAILED,
        }
    }

    /// True for failures raised by the store's action preconditions.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyTaskTitle
                | Error::MissingTaskState
                | Error::UnknownTaskState(_)
                | Error::TaskToUpdateNotFound(_)
                | Error::TaskToDeleteNotFound(_)
                | Error::EmptyProjectName
                | Error::DuplicateProjectName(_)
                | Error::ProjectNotFound(_)
                | Error::NoCurrentProject
                | Error::InvalidTransferTarget { .. }
        )
    }

    /// Structured context for the offending input, if any.
    pub fn details(&self) -> Option<serde_json::Value> {
        use serde_json::json;

        match self {
            Error::UnknownTaskState(state) => Some(json!({ "state": state })),
            Error::TaskToUpdateNotFound(id) | Error::TaskToDeleteNotFound(id) => {
                Some(json!({ "task_id": id }))
            }
            Error::DuplicateProjectName(name) => Some(json!({ "name": name })),
            Error::ProjectNotFound(id) => Some(json!({ "project_id": id })),
            Error::InvalidTransferTarget { from, to } => {
                Some(json!({ "from": from, "to": to }))
            }
            Error::InvalidConfig(message) | Error::InvalidArgument(message) => {
                Some(json!({ "message": message }))
            }
            Error::LockFailed(path) => Some(json!({ "path": path.to_string_lossy() })),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
