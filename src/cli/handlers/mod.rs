mod init;
mod prompt;
pub use init::cmd_init;
pub use prompt::StdinPrompt;

use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::io::recovery;
use crate::io::store::{FileStore, KeyValueStore};
use crate::model::config::Config;
use crate::model::filter::Filter;
use crate::model::task::TaskId;
use crate::ops::controller::Controller;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Config and store location after applying `--config` and `--store`
pub struct Settings {
    pub config: Config,
    pub store_path: PathBuf,
}

pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config_io::default_config_path);
    let config = config_io::read_config(&config_path)?;
    let store_path = config_io::resolve_store_path(&config, cli.store.as_deref());
    Ok(Settings { config, store_path })
}

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Init must work even when the existing config is broken
    if let Some(Commands::Init(args)) = &cli.command {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(config_io::default_config_path);
        return cmd_init(args, &path);
    }

    let settings = load_settings(&cli)?;

    match cli.command {
        None => crate::tui::run(settings.config, settings.store_path),
        Some(cmd) => match cmd {
            Commands::Init(_) => Ok(()),

            // Read commands
            Commands::List(args) => cmd_list(&settings, args, json),
            Commands::Recovery(args) => cmd_recovery(&settings, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&settings, args, json),
            Commands::Toggle(args) => cmd_toggle(&settings, args, json),
            Commands::Done(args) => cmd_set_completed(&settings, args, true, json),
            Commands::Undo(args) => cmd_set_completed(&settings, args, false, json),
            Commands::Rm(args) => cmd_rm(&settings, args, json),
            Commands::Edit(args) => cmd_edit(&settings, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_controller(
    settings: &Settings,
    filter: Filter,
) -> Result<Controller<FileStore>, Box<dyn std::error::Error>> {
    let store = FileStore::open(&settings.store_path);
    let controller = Controller::load(store, settings.config.storage.key.clone(), filter)?;
    Ok(controller)
}

/// Print a task after a write command, as JSON or one text line
fn print_task(
    controller: &Controller<FileStore>,
    id: TaskId,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(task) = controller.task(id) {
        if json {
            println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
        } else {
            println!("{}", format_task_line(task));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(
    settings: &Settings,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = load_controller(settings, args.filter)?;
    let rows = controller.rows();

    if json {
        let output = TaskListJson {
            filter: args.filter.as_str().to_string(),
            tasks: rows.iter().map(row_to_json).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for row in rows {
        println!("{}", format_row_line(row));
    }
    Ok(())
}

fn cmd_recovery(
    settings: &Settings,
    args: RecoveryCmd,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(&settings.store_path);
    let Some(dir) = store.recovery_dir() else {
        return Ok(());
    };

    if let Some(RecoveryAction::Prune(prune)) = args.action {
        let before = if prune.all {
            None
        } else {
            let cutoff = chrono::TimeDelta::try_days(prune.days)
                .and_then(|age| chrono::Utc::now().checked_sub_signed(age))
                .ok_or_else(|| format!("--days {} is out of range", prune.days))?;
            Some(cutoff)
        };
        let removed = recovery::prune_recovery(dir, before)?;
        println!(
            "Pruned {} recovery {}",
            removed,
            if removed == 1 { "entry" } else { "entries" }
        );
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(dir, args.limit);
    if json {
        let items: Vec<RecoveryEntryJson> = entries.iter().map(recovery_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Recovery log is empty");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in format_recovery_entry(entry) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(
    settings: &Settings,
    args: AddArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = load_controller(settings, Filter::All)?;
    let text = args.text.join(" ");

    let Some(id) = controller.add(&text)? else {
        eprintln!("warning: nothing added, task text is blank");
        return Ok(());
    };

    if json {
        print_task(&controller, id, true)
    } else {
        println!("{}", id);
        Ok(())
    }
}

fn cmd_toggle(
    settings: &Settings,
    args: IdArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = load_controller(settings, Filter::All)?;
    controller.toggle_completed(args.id)?;
    print_task(&controller, args.id, json)
}

fn cmd_set_completed(
    settings: &Settings,
    args: IdArgs,
    completed: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = load_controller(settings, Filter::All)?;
    if !controller.set_completed(args.id, completed)? {
        eprintln!(
            "warning: task {} is already {}",
            args.id,
            if completed { "done" } else { "not done" }
        );
    }
    print_task(&controller, args.id, json)
}

fn cmd_rm(
    settings: &Settings,
    args: IdArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = load_controller(settings, Filter::All)?;
    let task = controller.delete(args.id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&task))?);
    } else {
        println!("Deleted {}", format_task_line(&task));
    }
    Ok(())
}

fn cmd_edit(
    settings: &Settings,
    args: EditArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = load_controller(settings, Filter::All)?;
    let changed = if args.text.is_empty() {
        controller.edit_with(args.id, &mut StdinPrompt::new())?
    } else {
        controller.edit(args.id, &args.text.join(" "))?
    };
    if !changed {
        eprintln!("warning: task {} not changed", args.id);
    }
    print_task(&controller, args.id, json)
}
