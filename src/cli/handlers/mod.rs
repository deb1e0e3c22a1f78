use std::error::Error;
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::logging;
use crate::io::paths;
use crate::io::storage::FileStorage;
use crate::model::{AppConfig, CreateItemRequest, TodoItem, UpdateItemRequest};
use crate::ops::filter::{ItemFilter, StatusFilter, build_title_regex};
use crate::ops::store::{StoreError, TodoStore};

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Read the config and start logging.
///
/// A broken config.toml does not stop the app; it runs on defaults and the
/// problem goes to the log.
pub fn setup(data_dir: &Path) -> AppConfig {
    let configured = config_io::read_config(data_dir).map(|(config, _)| config);
    let level = configured
        .as_ref()
        .map_or("info", |config| config.log.level.as_str());
    logging::init_logging(data_dir, level);

    configured.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default config");
        AppConfig::default()
    })
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, data_dir: &Path, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let json = cli.json;

    match cli.command {
        None => crate::tui::run(data_dir, config),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(args, json, data_dir),

            // Write commands
            Commands::Add(args) => cmd_add(args, json, data_dir, config),
            Commands::Edit(args) => cmd_edit(args, json, data_dir),
            Commands::Done(args) => cmd_set_done(args.id, true, json, data_dir),
            Commands::Undone(args) => cmd_set_done(args.id, false, json, data_dir),
            Commands::Rm(args) => cmd_rm(args, json, data_dir),

            // Configuration
            Commands::Config(args) => cmd_config(args, json, data_dir),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(data_dir: &Path) -> Result<TodoStore<FileStorage>, Box<dyn Error>> {
    Ok(TodoStore::new(FileStorage::open(data_dir)?))
}

fn find_item(store: &TodoStore<FileStorage>, id: i64) -> Result<TodoItem, StoreError> {
    store
        .list()?
        .into_iter()
        .find(|item| item.id == id)
        .ok_or(StoreError::NotFound(id))
}

fn check_title(title: &str) -> Result<(), Box<dyn Error>> {
    if title.trim().is_empty() {
        return Err("title cannot be empty".into());
    }
    Ok(())
}

fn print_item(item: &TodoItem, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&item_to_json(item))?);
    } else {
        for line in format_item_detail(item) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let store = open_store(data_dir)?;
    let items = store.list()?;

    let filter = ItemFilter {
        status: if args.done {
            StatusFilter::Done
        } else if args.pending {
            StatusFilter::Pending
        } else {
            StatusFilter::All
        },
        title: args.grep.as_deref().and_then(build_title_regex),
    };
    let shown = filter.apply(&items);

    if json {
        let results: Vec<ItemJson> = shown.iter().map(|item| item_to_json(item)).collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for item in shown {
            println!("{}", format_item_line(item));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(
    args: AddArgs,
    json: bool,
    data_dir: &Path,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    check_title(&args.title)?;
    let mut store = open_store(data_dir)?;
    let item = store.create(CreateItemRequest {
        title: args.title,
        priority: args.priority.unwrap_or(config.defaults.priority),
    })?;

    if json {
        print_item(&item, true)?;
    } else {
        println!("{}", item.id);
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, json: bool, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    if args.title.is_none() && args.priority.is_none() && !args.done && !args.undone {
        return Err("nothing to change (use --title, --priority, --done or --undone)".into());
    }

    let mut store = open_store(data_dir)?;
    let mut req = UpdateItemRequest::from(&find_item(&store, args.id)?);
    if let Some(ref title) = args.title {
        check_title(title)?;
        req.title = title.trim().to_string();
    }
    if let Some(priority) = args.priority {
        req.priority = priority;
    }
    if args.done {
        req.is_done = true;
    } else if args.undone {
        req.is_done = false;
    }

    let item = store.update(req)?;
    print_item(&item, json)
}

fn cmd_set_done(id: i64, done: bool, json: bool, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut store = open_store(data_dir)?;
    let mut req = UpdateItemRequest::from(&find_item(&store, id)?);
    req.is_done = done;
    let item = store.update(req)?;
    print_item(&item, json)
}

fn cmd_rm(args: RmArgs, json: bool, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut store = open_store(data_dir)?;

    // A lone ID must exist; a batch skips the missing ones
    let removed = match args.ids.as_slice() {
        [id] => {
            store.delete(*id)?;
            1
        }
        ids => store.delete_many(ids)?,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&RemovedJson { removed })?
        );
    } else {
        println!("deleted {}", removed);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd, json: bool, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    match args.action {
        ConfigAction::Show => {
            let (config, _) = config_io::read_config(data_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Set(set) => {
            let (_, mut doc) = config_io::read_config(data_dir)?;
            config_io::set_config_value(&mut doc, &set.key, &set.value)?;
            config_io::write_config(data_dir, &doc)?;
            tracing::info!(key = %set.key, value = %set.value, "config updated");
        }
        ConfigAction::Path => {
            println!("{}", paths::config_path(data_dir).display());
        }
    }
    Ok(())
}
