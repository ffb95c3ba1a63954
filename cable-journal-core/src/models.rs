use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One journal record. Never inspected, only carried.
pub type Entry = serde_json::Value;

/// Ordered entries as stored in the data file.
pub type EntryCollection = Vec<Entry>;

/// Wire shape shared by every gateway reply that is not a bare value.
///
/// Absent fields are omitted, so `{"success":true}` and
/// `{"success":false,"canceled":true}` come out exactly as the front end expects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<EntryCollection>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub canceled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    fn canceled() -> Self {
        Self {
            canceled: true,
            ..Self::default()
        }
    }

    fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "Reply")]
pub enum SaveOutcome {
    Saved,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "Reply")]
pub enum ExportOutcome {
    Written(PathBuf),
    Canceled,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "Reply")]
pub enum ImportOutcome {
    Loaded(EntryCollection),
    Canceled,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "Reply")]
pub enum BackupOutcome {
    Written(PathBuf),
    Failed(String),
}

impl From<SaveOutcome> for Reply {
    fn from(o: SaveOutcome) -> Self {
        match o {
            SaveOutcome::Saved => Reply::ok(),
            SaveOutcome::Failed(e) => Reply::failed(e),
        }
    }
}

impl From<ExportOutcome> for Reply {
    fn from(o: ExportOutcome) -> Self {
        match o {
            ExportOutcome::Written(path) => Reply {
                file_path: Some(path),
                ..Reply::ok()
            },
            ExportOutcome::Canceled => Reply::canceled(),
            ExportOutcome::Failed(e) => Reply::failed(e),
        }
    }
}

impl From<ImportOutcome> for Reply {
    fn from(o: ImportOutcome) -> Self {
        match o {
            ImportOutcome::Loaded(entries) => Reply {
                entries: Some(entries),
                ..Reply::ok()
            },
            ImportOutcome::Canceled => Reply::canceled(),
            ImportOutcome::Failed(e) => Reply::failed(e),
        }
    }
}

impl From<BackupOutcome> for Reply {
    fn from(o: BackupOutcome) -> Self {
        match o {
            BackupOutcome::Written(path) => Reply {
                file_path: Some(path),
                ..Reply::ok()
            },
            BackupOutcome::Failed(e) => Reply::failed(e),
        }
    }
}
