//! `instat` - CLI for instat
//!
//! This binary is the front end for adding, editing, deleting and listing
//! records, and for viewing the dashboard counts.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::Context;
use clap::Parser;

use instat::cli::{Cli, Command, ConfigCommand, DeleteCommand, EditCommand, ListCommand};
use instat::{
    apply, init_logging, Action, Collection, Config, DashboardStats, FormData, RecordStore,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    let data_dir = cli.data_dir.unwrap_or_else(|| config.data_dir());
    run(&config, &data_dir, cli.command)
}

/// Dispatch a command. Configuration commands never touch the data directory.
fn run(config: &Config, data_dir: &Path, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Config(cmd) => handle_config(config, cmd),
        Command::List(cmd) => handle_list(&open_store(data_dir)?, &cmd),
        Command::Add(cmd) => {
            let form = cmd.form();
            handle_action(&open_store(data_dir)?, cmd.collection, Action::Add, &form)
        }
        Command::Edit(cmd) => handle_edit(&open_store(data_dir)?, &cmd),
        Command::Delete(DeleteCommand { collection, index }) => handle_action(
            &open_store(data_dir)?,
            collection,
            Action::Delete { index },
            &FormData::new(),
        ),
        Command::Dashboard(out) => handle_dashboard(&open_store(data_dir)?, out.json),
        Command::Status(out) => handle_status(&open_store(data_dir)?, out.json),
        Command::Collections(out) => {
            open_store(data_dir)?;
            handle_collections(out.json)
        }
    }
}

/// Open the store, creating the data directory if absent.
fn open_store(data_dir: &Path) -> anyhow::Result<RecordStore> {
    RecordStore::open(data_dir)
        .with_context(|| format!("cannot use data directory {}", data_dir.display()))
}

fn handle_list(store: &RecordStore, cmd: &ListCommand) -> anyhow::Result<()> {
    let records = store.read(cmd.collection.key())?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No {} records.", cmd.collection);
        return Ok(());
    }
    for (index, record) in records.iter().enumerate() {
        println!("[{index}] {record}");
    }
    Ok(())
}

fn handle_edit(store: &RecordStore, cmd: &EditCommand) -> anyhow::Result<()> {
    let form = cmd.form();
    handle_action(
        store,
        cmd.collection,
        Action::Edit { index: cmd.index },
        &form,
    )
}

fn handle_action(
    store: &RecordStore,
    collection: Collection,
    action: Action,
    form: &FormData,
) -> anyhow::Result<()> {
    let outcome = apply(store, collection, action, form)
        .with_context(|| format!("{action} on {collection} failed"))?;

    println!("{}", outcome.message);
    if !outcome.applied {
        std::process::exit(1);
    }
    Ok(())
}

fn handle_dashboard(store: &RecordStore, json: bool) -> anyhow::Result<()> {
    let stats = DashboardStats::compute(store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Dashboard");
        println!("---------");
        println!("Total students:     {}", stats.total_students);
        println!("Faculty members:    {}", stats.faculty_members);
        println!("Active programmes:  {}", stats.active_programmes);
        println!("Departments:        {}", stats.departments);
    }
    Ok(())
}

fn handle_status(store: &RecordStore, json: bool) -> anyhow::Result<()> {
    let stats = Collection::ALL
        .iter()
        .map(|collection| store.stats(collection.key()))
        .collect::<instat::Result<Vec<_>>>()?;

    if json {
        let status = serde_json::json!({
            "data_dir": store.base_dir(),
            "collections": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("instat status");
        println!("-------------");
        println!("Data directory: {}", store.base_dir().display());
        println!();
        for entry in &stats {
            println!(
                "  {:<22} {:>6} records  {:>8} bytes",
                entry.key, entry.records, entry.file_size_bytes
            );
        }
    }
    Ok(())
}

fn handle_collections(json: bool) -> anyhow::Result<()> {
    if json {
        let listing: serde_json::Map<String, serde_json::Value> = Collection::ALL
            .iter()
            .map(|collection| (collection.key().to_string(), collection.schema().into()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for collection in Collection::ALL {
            println!("{collection}: {}", collection.schema().join(", "));
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
