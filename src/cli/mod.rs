//! Command-line interface for taskdeck
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::FileSlot;
use crate::store::Store;

mod board;
mod project;
mod task;

/// taskdeck - local task and project board
///
/// Tracks tasks across projects with a fixed set of task states. The whole
/// board is stored as one JSON file in the data directory.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the board state and taskdeck.toml
    #[arg(long, global = true, env = "TASKDECK_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Metrics across all projects
    Dashboard,

    /// Task states with counts for the current project
    States,

    /// Current project's tasks grouped by state
    Board,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to the current project
    Add {
        /// Task title
        title: String,

        /// Task state (defaults to the first state)
        #[arg(long)]
        state: Option<String>,
    },

    /// Update a task
    Update {
        /// Task ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New state
        #[arg(long)]
        state: Option<String>,

        /// Move the task to another project
        #[arg(long)]
        project: Option<u64>,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: String,
    },

    /// List tasks (defaults to the current project)
    List {
        /// Project ID to list instead of the current one
        #[arg(long)]
        project: Option<u64>,

        /// Only tasks in this state
        #[arg(long)]
        state: Option<String>,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    Add {
        /// Project name
        name: String,

        /// Project description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Rename or re-describe a project
    Update {
        /// Project ID
        id: u64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a project and its tasks
    Rm {
        /// Project ID
        id: u64,

        /// Move the project's tasks here instead of deleting them
        #[arg(long)]
        transfer_to: Option<u64>,
    },

    /// List projects
    List,

    /// Select the current project
    Use {
        /// Project ID
        id: u64,
    },
}

/// Resolved data directory, config and hydrated store for one invocation.
///
/// The store's slot holds the board lock until the context is dropped, so
/// concurrent invocations run one after another.
pub(crate) struct BoardContext {
    pub store: Store<FileSlot>,
    pub options: OutputOptions,
}

impl BoardContext {
    fn open(data_dir: Option<PathBuf>, json: bool, quiet: bool) -> Result<Self> {
        let data_dir = config::resolve_data_dir(data_dir);
        let config = Config::load_from_dir(&data_dir);
        tracing::debug!(data_dir = %data_dir.display(), slot = %config.storage.slot, "opening board");

        let slot = FileSlot::new(&data_dir, config.storage.slot.clone()).hold()?;
        let store = Store::open(slot, config.default_state())?
            .with_completed_state(config.tasks.completed_state.clone());
        Ok(Self {
            store,
            options: OutputOptions { json, quiet },
        })
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let mut ctx = BoardContext::open(self.data_dir, self.json, self.quiet)?;
        match self.command {
            Commands::Dashboard => board::run_dashboard(&ctx),
            Commands::States => board::run_states(&ctx),
            Commands::Board => board::run_board(&ctx),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add { title, state } => {
                    task::run_add(&mut ctx, task::AddOptions { title, state })
                }
                TaskCommands::Update {
                    id,
                    title,
                    state,
                    project,
                } => task::run_update(
                    &mut ctx,
                    task::UpdateOptions {
                        id,
                        title,
                        state,
                        project,
                    },
                ),
                TaskCommands::Rm { id } => task::run_rm(&mut ctx, &id),
                TaskCommands::List { project, state } => {
                    task::run_list(&ctx, task::ListOptions { project, state })
                }
            },
            Commands::Project(cmd) => match cmd {
                ProjectCommands::Add { name, description } => {
                    project::run_add(&mut ctx, project::AddOptions { name, description })
                }
                ProjectCommands::Update {
                    id,
                    name,
                    description,
                } => project::run_update(
                    &mut ctx,
                    project::UpdateOptions {
                        id,
                        name,
                        description,
                    },
                ),
                ProjectCommands::Rm { id, transfer_to } => {
                    project::run_rm(&mut ctx, project::RmOptions { id, transfer_to })
                }
                ProjectCommands::List => project::run_list(&ctx),
                ProjectCommands::Use { id } => project::run_use(&mut ctx, id),
            },
        }
    }
}
