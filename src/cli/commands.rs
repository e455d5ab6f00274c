use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::filter::Filter;
use crate::model::task::TaskId;

#[derive(Parser)]
#[command(name = "tl", about = concat!("[x] ticklist v", env!("CARGO_PKG_VERSION"), " - a small to-do list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different store file
    #[arg(long = "store", global = true)]
    pub store: Option<PathBuf>,

    /// Use a different config file
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a commented config file template
    Init(InitArgs),
    /// Add a task
    Add(AddArgs),
    /// List tasks
    #[command(alias = "ls")]
    List(ListArgs),
    /// Flip a task between done and not done
    Toggle(IdArgs),
    /// Mark a task done
    Done(IdArgs),
    /// Mark a task not done
    Undo(IdArgs),
    /// Delete a task
    #[command(alias = "delete")]
    Rm(IdArgs),
    /// Change a task's text (prompts when TEXT is omitted)
    Edit(EditArgs),
    /// View or prune the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Which tasks to show: all, complete, incomplete
    #[arg(long, short = 'f', default_value_t = Filter::All)]
    pub filter: Filter,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task id as shown by `tl list`
    pub id: TaskId,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id as shown by `tl list`
    pub id: TaskId,
    /// New text (words are joined with spaces)
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Show only the most recent N entries
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(PruneArgs),
}

#[derive(Args)]
pub struct PruneArgs {
    /// Remove entries older than this many days
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(i64).range(0..))]
    pub days: i64,
    /// Remove every entry
    #[arg(long, conflicts_with = "days")]
    pub all: bool,
}
