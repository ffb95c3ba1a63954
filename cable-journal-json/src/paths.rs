use cable_journal_core::{BACKUPS_DIR_NAME, DATA_FILE_NAME};
use directories::ProjectDirs;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Set by portable launchers to the folder holding the real executable.
pub const PORTABLE_DIR_VAR: &str = "PORTABLE_EXECUTABLE_DIR";
/// Set by portable launchers to the real executable itself.
pub const PORTABLE_FILE_VAR: &str = "PORTABLE_EXECUTABLE_FILE";
/// Forces packaged (`1`) or development (`0`) resolution.
pub const PACKAGED_VAR: &str = "CABLE_JOURNAL_PACKAGED";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Development,
    Packaged,
}

impl RunMode {
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            RunMode::Development
        } else {
            RunMode::Packaged
        }
    }

    /// `CABLE_JOURNAL_PACKAGED` when it parses, the build profile otherwise.
    pub fn from_env_or_build() -> Self {
        env::var(PACKAGED_VAR)
            .ok()
            .and_then(|v| parse_flag(&v))
            .map(|packaged| if packaged { RunMode::Packaged } else { RunMode::Development })
            .unwrap_or_else(Self::from_build)
    }

    pub fn is_packaged(self) -> bool {
        self == RunMode::Packaged
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Everything the resolver looks at, captured up front so resolution stays pure.
#[derive(Clone, Debug, Default)]
pub struct ResolveInputs {
    pub mode: RunMode,
    pub source_dir: PathBuf,
    pub portable_dir: Option<PathBuf>,
    pub portable_file: Option<PathBuf>,
    pub exe: Option<PathBuf>,
}

impl ResolveInputs {
    pub fn from_process(mode: RunMode, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            source_dir: source_dir.into(),
            portable_dir: non_empty_var(PORTABLE_DIR_VAR),
            portable_file: non_empty_var(PORTABLE_FILE_VAR),
            exe: env::current_exe().ok(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|v: &OsString| !v.is_empty())
        .map(PathBuf::from)
}

pub fn resolve_data_file(inputs: &ResolveInputs) -> PathBuf {
    match inputs.mode {
        RunMode::Development => inputs.source_dir.join(DATA_FILE_NAME),
        RunMode::Packaged => app_dir(inputs).join(DATA_FILE_NAME),
    }
}

fn app_dir(inputs: &ResolveInputs) -> PathBuf {
    if let Some(dir) = &inputs.portable_dir {
        return dir.clone();
    }
    if let Some(file) = &inputs.portable_file {
        return file.parent().map(Path::to_path_buf).unwrap_or_default();
    }
    // No executable path: per-user data folder, then wherever we were started.
    inputs
        .exe
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .or_else(|| {
            ProjectDirs::from("com", "cablejournal", "CableJournal")
                .map(|pd| pd.data_dir().to_path_buf())
        })
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `backups/` next to the data file.
pub fn backups_dir(data_file: &Path) -> PathBuf {
    data_file
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(BACKUPS_DIR_NAME)
}
