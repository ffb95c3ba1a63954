use crate::{BackupOutcome, Entry, EntryCollection, ExportOutcome, ImportOutcome, SaveOutcome};
use async_trait::async_trait;
use std::path::Path;

/// The six persistence operations a front end may call.
///
/// Nothing here returns `Err`: failures, cancels and missing files all come
/// back as values the caller inspects.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Current collection, or empty when there is nothing readable on disk.
    async fn load_data(&self) -> EntryCollection;
    async fn save_data(&self, entries: &[Entry]) -> SaveOutcome;
    async fn export_data(&self, entries: &[Entry]) -> ExportOutcome;
    async fn import_data(&self) -> ImportOutcome;
    fn data_path(&self) -> &Path;
    async fn backup_data(&self, entries: &[Entry]) -> BackupOutcome;
}
