use cable_journal_json::paths::RunMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Development,
    Packaged,
}

impl From<ModeArg> for RunMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Development => RunMode::Development,
            ModeArg::Packaged => RunMode::Packaged,
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[command(name = "cable-journal", version, about = "Cable Journal data host (CLI/API)")]
pub struct Cli {
    /// Use this data file instead of resolving one from the run mode
    #[arg(long, global = true, env = "CABLE_JOURNAL_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Path resolution mode (defaults to CABLE_JOURNAL_PACKAGED, then the build profile)
    #[arg(long, global = true, value_enum)]
    pub mode: Option<ModeArg>,

    /// Keep only this many backup files (unlimited when unset)
    #[arg(long, global = true, env = "CABLE_JOURNAL_MAX_BACKUPS")]
    pub max_backups: Option<usize>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the stored entries
    Load,
    /// Replace the stored entries with a JSON array from FILE or stdin
    Save { file: Option<PathBuf> },
    /// Write entries to a file of your choice
    Export(ExportCmd),
    /// Read entries from a file without storing them
    Import(ImportCmd),
    /// Print the data file path
    Path,
    /// Write a timestamped backup of FILE, or of the stored entries
    Backup { file: Option<PathBuf> },
    /// Call a channel by name with an optional JSON argument
    Invoke(InvokeCmd),
    /// Serve the channels over HTTP for a front end
    Serve(ServeCmd),
}

#[derive(Debug, Args, Clone)]
pub struct ExportCmd {
    /// Destination; prompts when omitted
    #[arg(long)]
    pub to: Option<PathBuf>,
    /// Entries to export (defaults to the stored entries)
    #[arg(long)]
    pub from: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ImportCmd {
    /// Source file; prompts when omitted
    #[arg(long)]
    pub from: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct InvokeCmd {
    /// One of load-data, save-data, export-data, import-data, get-data-path, backup-data
    pub channel: String,
    /// JSON argument, e.g. '[{"id":1}]'
    pub arg: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ServeCmd {
    /// Bind address (host:port)
    #[arg(long, default_value = "127.0.0.1:8787")]
    pub addr: String,
}
