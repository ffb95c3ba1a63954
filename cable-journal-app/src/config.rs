use crate::cli::opts::Cli;
use cable_journal_core::FileDialogs;
use cable_journal_json::paths::{backups_dir, resolve_data_file, ResolveInputs, RunMode};
use cable_journal_json::JsonStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Settled once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: RunMode,
    pub data_file: PathBuf,
    pub backups_dir: PathBuf,
    pub max_backups: Option<usize>,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let mode = cli
            .mode
            .map(RunMode::from)
            .unwrap_or_else(RunMode::from_env_or_build);
        let inputs = ResolveInputs::from_process(mode, env!("CARGO_MANIFEST_DIR"));
        let config = Self::resolve(cli, &inputs);
        info!(
            data_file = %config.data_file.display(),
            portable_dir = ?inputs.portable_dir,
            portable_file = ?inputs.portable_file,
            packaged = config.mode.is_packaged(),
            "data file resolved"
        );
        config
    }

    fn resolve(cli: &Cli, inputs: &ResolveInputs) -> Self {
        let data_file = cli
            .data_file
            .clone()
            .unwrap_or_else(|| resolve_data_file(inputs));
        Self {
            mode: inputs.mode,
            backups_dir: backups_dir(&data_file),
            data_file,
            max_backups: cli.max_backups,
        }
    }

    pub fn open_store(&self, dialogs: Arc<dyn FileDialogs>) -> JsonStore {
        JsonStore::open_with(
            self.data_file.clone(),
            self.backups_dir.clone(),
            self.max_backups,
            dialogs,
        )
    }
}
