//! Command-line driver for the WAR ROOM core.
//!
//! Every invocation is one session: load the document, apply at most one
//! mutation (which saves), print the result.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use log::debug;
use warroom_core::{
    core_version, normalize_title, CompletionState, JsonFileStore, MissionDeleteMode, MissionId,
    StateManager, StorageConfig, TaskId, VisibilityMode, VisibleBoard,
};

#[derive(Parser)]
#[command(name = "warroom")]
#[command(about = "Task and mission tracker", version)]
struct Cli {
    /// Data directory (defaults to WARROOM_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show missions and tasks
    List {
        /// overview | focus | accomplishment
        #[arg(long, default_value = "overview")]
        mode: VisibilityMode,
    },

    /// Add a task
    AddTask {
        title: String,
        /// Assign the new task to this mission
        #[arg(long)]
        mission: Option<MissionId>,
    },

    /// Add a mission
    AddMission { title: String },

    /// Toggle a task between open and done
    Toggle { task: TaskId },

    /// Move a task under a mission, or detach it when no mission is given
    Assign {
        task: TaskId,
        #[arg(long)]
        mission: Option<MissionId>,
    },

    /// Rename a task
    RenameTask { task: TaskId, title: String },

    /// Rename a mission
    RenameMission { mission: MissionId, title: String },

    /// Mark a mission complete (requires all of its tasks done)
    CompleteMission {
        mission: MissionId,
        /// Clear the completion flag instead
        #[arg(long)]
        reopen: bool,
    },

    /// Delete a task
    DeleteTask { task: TaskId },

    /// Delete a mission, detaching its tasks unless --cascade is given
    DeleteMission {
        mission: MissionId,
        #[arg(long)]
        cascade: bool,
    },

    /// Copy the data file into the backups folder
    Backup,

    /// Print the data file location
    Where,

    /// Print the core version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let _logger = Logger::try_with_str(level)?
        .log_to_stderr()
        .start()
        .context("failed to start logger")?;

    let config = match cli.data_dir {
        Some(dir) => StorageConfig::in_dir(dir),
        None => StorageConfig::from_env(),
    };
    let store = JsonFileStore::new(config);
    debug!(
        "event=cli_start module=cli status=ok data_file={}",
        store.data_file().display()
    );

    match cli.command {
        Commands::Backup => {
            let report = store.backup();
            match (report.file, report.error) {
                (Some(file), _) => {
                    println!("backup written to {}", file.display());
                    Ok(())
                }
                (None, error) => Err(anyhow!(
                    "backup failed: {}",
                    error.unwrap_or_else(|| "unknown error".to_string())
                )),
            }
        }
        Commands::Where => {
            println!("{}", store.data_file().display());
            Ok(())
        }
        Commands::Version => {
            println!("warroom {}", core_version());
            Ok(())
        }
        command => run_session(store, command),
    }
}

fn run_session(store: JsonFileStore, command: Commands) -> Result<()> {
    let mut manager = StateManager::open(store)?;

    match command {
        Commands::List { mode } => {
            print_board(&manager.visible(mode));
        }
        Commands::AddTask { title, mission } => {
            let task = manager.add_task(normalize_title(&title)?)?;
            if mission.is_some() {
                manager.assign_task_to_mission(&task.id, mission)?;
            }
            println!("{}", task.id);
        }
        Commands::AddMission { title } => {
            let mission = manager.add_mission(normalize_title(&title)?)?;
            println!("{}", mission.id);
        }
        Commands::Toggle { task } => {
            let task = manager
                .toggle_task(&task)?
                .ok_or_else(|| anyhow!("task not found: {task}"))?;
            println!("{} {}", checkbox(task.is_done), task.title);
        }
        Commands::Assign { task, mission } => {
            manager
                .assign_task_to_mission(&task, mission)?
                .ok_or_else(|| anyhow!("task not found: {task}"))?;
        }
        Commands::RenameTask { task, title } => {
            manager
                .rename_task(&task, normalize_title(&title)?)?
                .ok_or_else(|| anyhow!("task not found: {task}"))?;
        }
        Commands::RenameMission { mission, title } => {
            manager
                .rename_mission(&mission, normalize_title(&title)?)?
                .ok_or_else(|| anyhow!("mission not found: {mission}"))?;
        }
        Commands::CompleteMission { mission, reopen } => {
            let updated = manager
                .set_mission_completed(&mission, !reopen)?
                .ok_or_else(|| anyhow!("mission not found: {mission}"))?;
            if !reopen && !updated.is_manually_completed {
                return Err(anyhow!(
                    "mission `{}` still has open tasks or no tasks",
                    updated.title
                ));
            }
        }
        Commands::DeleteTask { task } => {
            manager
                .delete_task(&task)?
                .ok_or_else(|| anyhow!("task not found: {task}"))?;
        }
        Commands::DeleteMission { mission, cascade } => {
            let mode = if cascade {
                MissionDeleteMode::DeleteTasks
            } else {
                MissionDeleteMode::DetachTasks
            };
            let deleted = manager
                .delete_mission(&mission, mode)?
                .ok_or_else(|| anyhow!("mission not found: {mission}"))?;
            println!("{} task(s) affected", deleted.tasks.len());
        }
        Commands::Backup | Commands::Where | Commands::Version => {}
    }

    Ok(())
}

fn print_board(board: &VisibleBoard<'_>) {
    for group in &board.missions {
        let marker = match group.completion {
            CompletionState::ManuallyCompleted => "[x]",
            CompletionState::Eligible => "[~]",
            CompletionState::InProgress => "[ ]",
        };
        println!("{marker} Mission: {}  ({})", group.mission.title, group.mission.id);
        for task in &group.tasks {
            println!("    {} {}  ({})", checkbox(task.is_done), task.title, task.id);
        }
    }
    for task in &board.standalone {
        println!("{} {}  ({})", checkbox(task.is_done), task.title, task.id);
    }
    if board.is_empty() {
        println!("Nothing to show.");
    }
}

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}
