use async_trait::async_trait;
use cable_journal_core::{
    export_default_name, is_backup_file_name, backup_file_name, BackupOutcome, CoreError, Entry,
    EntryCollection, ExportOutcome, FileDialogs, Gateway, ImportOutcome, OpenDialog, SaveDialog,
    SaveOutcome,
};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use parking_lot::Mutex;
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::task;
use tracing::{debug, info, warn};

pub mod paths;

/// Journal storage backed by one JSON file plus a `backups/` folder.
pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: Option<usize>,
    dialogs: Arc<dyn FileDialogs>,
    last_backup: Mutex<Option<DateTime<Utc>>>,
}

impl JsonStore {
    /// Store at `path`, with backups in the sibling `backups/` folder.
    pub fn open(path: PathBuf, dialogs: Arc<dyn FileDialogs>) -> Self {
        let backups_dir = paths::backups_dir(&path);
        Self::open_with(path, backups_dir, None, dialogs)
    }

    pub fn open_with(
        path: PathBuf,
        backups_dir: PathBuf,
        max_backups: Option<usize>,
        dialogs: Arc<dyn FileDialogs>,
    ) -> Self {
        Self {
            path,
            backups_dir,
            max_backups: max_backups.map(|n| n.max(1)),
            dialogs,
            last_backup: Mutex::new(None),
        }
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Like `load_data`, but keeps "no file yet" (`Ok(None)`) apart from a
    /// file that cannot be read or parsed (`Err`).
    pub async fn read_entries(&self) -> Result<Option<EntryCollection>, CoreError> {
        let p = self.path.clone();
        blocking(move || match read_collection(&p) {
            Ok(entries) => Ok(Some(entries)),
            Err(CoreError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn try_save(&self, entries: &[Entry]) -> Result<(), CoreError> {
        let json = encode(entries)?;
        let path = self.path.clone();
        blocking(move || write_atomic(&path, &json)).await
    }

    async fn try_export(&self, entries: &[Entry]) -> Result<Option<PathBuf>, CoreError> {
        let json = encode(entries)?;
        let request = SaveDialog::json("Export data", export_default_name(Utc::now()));
        let dialogs = Arc::clone(&self.dialogs);
        blocking(move || {
            let Some(target) = dialogs.save_file(&request)? else {
                return Ok(None);
            };
            write_atomic(&target, &json)?;
            Ok(Some(target))
        })
        .await
    }

    async fn try_import(&self) -> Result<Option<EntryCollection>, CoreError> {
        let request = OpenDialog::json("Import data");
        let dialogs = Arc::clone(&self.dialogs);
        blocking(move || {
            let Some(source) = dialogs.open_file(&request)? else {
                return Ok(None);
            };
            debug!(path = %source.display(), "importing entries");
            read_collection(&source).map(Some)
        })
        .await
    }

    async fn try_backup(&self, entries: &[Entry]) -> Result<PathBuf, CoreError> {
        let json = encode(entries)?;
        let target = self
            .backups_dir
            .join(backup_file_name(self.next_backup_stamp()));
        let dir = self.backups_dir.clone();
        let keep = self.max_backups;
        let written = target.clone();
        blocking(move || {
            fs::create_dir_all(&dir)?;
            write_atomic(&written, &json)?;
            // The backup is on disk by now; retention trouble must not undo that.
            if let Some(keep) = keep {
                if let Err(e) = prune_backups(&dir, keep) {
                    warn!(dir = %dir.display(), error = %e, "backup pruning failed");
                }
            }
            Ok(())
        })
        .await?;
        Ok(target)
    }

    /// Millisecond stamp strictly later than any earlier backup of this store.
    fn next_backup_stamp(&self) -> DateTime<Utc> {
        let now = Utc::now().trunc_subsecs(3);
        let mut last = self.last_backup.lock();
        let stamp = match *last {
            Some(prev) if now <= prev => prev + Duration::milliseconds(1),
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

#[async_trait]
impl Gateway for JsonStore {
    async fn load_data(&self) -> EntryCollection {
        match self.read_entries().await {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                debug!(path = %self.path.display(), "no data file yet");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "data file unreadable, loading empty journal");
                Vec::new()
            }
        }
    }

    async fn save_data(&self, entries: &[Entry]) -> SaveOutcome {
        match self.try_save(entries).await {
            Ok(()) => {
                debug!(count = entries.len(), "saved entries");
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "save failed");
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    async fn export_data(&self, entries: &[Entry]) -> ExportOutcome {
        match self.try_export(entries).await {
            Ok(Some(path)) => {
                info!(path = %path.display(), count = entries.len(), "exported entries");
                ExportOutcome::Written(path)
            }
            Ok(None) => ExportOutcome::Canceled,
            Err(e) => {
                warn!(error = %e, "export failed");
                ExportOutcome::Failed(e.to_string())
            }
        }
    }

    async fn import_data(&self) -> ImportOutcome {
        match self.try_import().await {
            Ok(Some(entries)) => ImportOutcome::Loaded(entries),
            Ok(None) => ImportOutcome::Canceled,
            Err(e) => {
                warn!(error = %e, "import failed");
                ImportOutcome::Failed(e.to_string())
            }
        }
    }

    fn data_path(&self) -> &Path {
        &self.path
    }

    async fn backup_data(&self, entries: &[Entry]) -> BackupOutcome {
        match self.try_backup(entries).await {
            Ok(path) => {
                info!(path = %path.display(), "backup written");
                BackupOutcome::Written(path)
            }
            Err(e) => {
                warn!(dir = %self.backups_dir.display(), error = %e, "backup failed");
                BackupOutcome::Failed(e.to_string())
            }
        }
    }
}

async fn blocking<T, F>(f: F) -> Result<T, CoreError>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| CoreError::Io(std::io::Error::other(e)))?
}

/// Two-space pretty JSON, no trailing newline.
fn encode(entries: &[Entry]) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(entries)?)
}

fn read_collection(path: &Path) -> Result<EntryCollection, CoreError> {
    let mut buf = String::new();
    fs::File::open(path)?.read_to_string(&mut buf)?;
    let text = buf.strip_prefix('\u{feff}').unwrap_or(&buf);
    Ok(serde_json::from_str(text)?)
}

/// Replaces the file behind `path` in one rename. Symlinks are followed, so
/// the link stays and its target gets the new content. The target keeps its
/// permissions; new files get 0644 on unix.
fn write_atomic(path: &Path, json: &str) -> Result<(), CoreError> {
    let target = follow_links(path)?;
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.flush()?;
    let perms = match fs::metadata(&target) {
        Ok(meta) => Some(meta.permissions()),
        Err(e) if e.kind() == ErrorKind::NotFound => default_permissions(),
        Err(e) => return Err(e.into()),
    };
    if let Some(perms) = perms {
        tmp.as_file().set_permissions(perms)?;
    }
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

const MAX_LINK_HOPS: usize = 40;

fn follow_links(path: &Path) -> Result<PathBuf, CoreError> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_LINK_HOPS {
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let dest = fs::read_link(&current)?;
                current = match current.parent() {
                    Some(parent) => parent.join(dest),
                    None => dest,
                };
            }
            _ => return Ok(current),
        }
    }
    Err(CoreError::Io(std::io::Error::other(format!(
        "too many levels of symbolic links: {}",
        path.display()
    ))))
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

fn prune_backups(dir: &Path, keep: usize) -> Result<(), CoreError> {
    // Names embed the timestamp, so lexical order is age order.
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| is_backup_file_name(n))
        .collect();
    names.sort();
    if names.len() > keep {
        for name in &names[..names.len() - keep] {
            let stale = dir.join(name);
            if let Err(e) = fs::remove_file(&stale) {
                warn!(path = %stale.display(), error = %e, "could not remove old backup");
            }
        }
    }
    Ok(())
}
