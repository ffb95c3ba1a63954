use crate::api::server as api_server;
use crate::cli::opts::*;
use crate::config::AppConfig;
use crate::dialogs::{PresetDialogs, TerminalDialogs};

use anyhow::{bail, Context, Result};
use cable_journal_core::{invoke, Channel, EntryCollection, FileDialogs, Gateway, Reply};
use cable_journal_json::JsonStore;
use serde::Serialize;
use std::io::{stdin, Read};
use std::path::Path;
use std::sync::Arc;

pub async fn run_cli(args: Cli, config: Arc<AppConfig>) -> Result<()> {
    match args.cmd {
        Command::Serve(cmd) => {
            let store = config.open_store(Arc::new(TerminalDialogs));
            let addr: std::net::SocketAddr = cmd.addr.parse()?;
            api_server::run(Arc::new(store), addr).await
        }
        Command::Load => {
            let store = config.open_store(Arc::new(PresetDialogs::default()));
            print_json(&store.load_data().await)
        }
        Command::Save { file } => {
            let store = config.open_store(Arc::new(PresetDialogs::default()));
            let entries = read_entries_arg(file.as_deref())?;
            report(store.save_data(&entries).await)
        }
        Command::Export(cmd) => export_cmd(&config, cmd).await,
        Command::Import(cmd) => {
            let dialogs: Arc<dyn FileDialogs> = match cmd.from {
                Some(path) => Arc::new(PresetDialogs {
                    open_from: Some(path),
                    ..PresetDialogs::default()
                }),
                None => Arc::new(TerminalDialogs),
            };
            let store = config.open_store(dialogs);
            report(store.import_data().await)
        }
        Command::Path => {
            println!("{}", config.data_file.display());
            Ok(())
        }
        Command::Backup { file } => {
            let store = config.open_store(Arc::new(PresetDialogs::default()));
            let entries = match file {
                Some(path) => read_entries_arg(Some(&path))?,
                None => stored_entries(&store).await?,
            };
            report(store.backup_data(&entries).await)
        }
        Command::Invoke(cmd) => {
            let store = config.open_store(Arc::new(TerminalDialogs));
            let channel: Channel = cmd.channel.parse()?;
            let arg = cmd
                .arg
                .as_deref()
                .map(serde_json::from_str::<serde_json::Value>)
                .transpose()
                .context("argument is not valid JSON")?;
            let reply = invoke(&store, channel, arg).await?;
            print_json(&reply)
        }
    }
}

async fn export_cmd(config: &AppConfig, cmd: ExportCmd) -> Result<()> {
    let dialogs: Arc<dyn FileDialogs> = match cmd.to {
        Some(path) => Arc::new(PresetDialogs {
            save_to: Some(path),
            ..PresetDialogs::default()
        }),
        None => Arc::new(TerminalDialogs),
    };
    let store = config.open_store(dialogs);
    let entries = match cmd.from {
        Some(path) => read_entries_arg(Some(&path))?,
        None => stored_entries(&store).await?,
    };
    report(store.export_data(&entries).await)
}

// ===== Helpers =====

/// Stored entries for commands that act on "the journal as it is now".
/// Unlike `load-data`, an unreadable data file is an error here.
async fn stored_entries(store: &JsonStore) -> Result<EntryCollection> {
    let entries = store
        .read_entries()
        .await
        .with_context(|| format!("cannot read {}", store.data_path().display()))?;
    Ok(entries.unwrap_or_default())
}

fn read_entries_arg(file: Option<&Path>) -> Result<EntryCollection> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    serde_json::from_str(&text).context("expected a JSON array of entries")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the reply; a failure also becomes a non-zero exit.
fn report(outcome: impl Into<Reply>) -> Result<()> {
    let reply: Reply = outcome.into();
    print_json(&reply)?;
    if let Some(error) = reply.error.filter(|_| !reply.success) {
        bail!(error);
    }
    Ok(())
}
