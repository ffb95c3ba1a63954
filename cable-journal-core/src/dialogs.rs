use crate::CoreError;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// "JSON files" then "All files", the pair every journal dialog offers.
    pub fn journal_defaults() -> Vec<FileFilter> {
        vec![
            FileFilter::new("JSON files", &["json"]),
            FileFilter::new("All files", &["*"]),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveDialog {
    pub title: String,
    pub default_name: String,
    pub filters: Vec<FileFilter>,
}

impl SaveDialog {
    pub fn json(title: impl Into<String>, default_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            default_name: default_name.into(),
            filters: FileFilter::journal_defaults(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenDialog {
    pub title: String,
    pub filters: Vec<FileFilter>,
}

impl OpenDialog {
    pub fn json(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            filters: FileFilter::journal_defaults(),
        }
    }
}

/// Host-side file pickers. `Ok(None)` means the user backed out.
///
/// Calls may block on user input; gateways run them off the async executor.
pub trait FileDialogs: Send + Sync {
    fn save_file(&self, request: &SaveDialog) -> Result<Option<PathBuf>, CoreError>;
    fn open_file(&self, request: &OpenDialog) -> Result<Option<PathBuf>, CoreError>;
}
