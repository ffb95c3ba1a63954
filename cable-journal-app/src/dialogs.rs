use cable_journal_core::{CoreError, FileDialogs, FileFilter, OpenDialog, SaveDialog};
use std::io::{stderr, stdin, Write};
use std::path::PathBuf;

/// Asks for paths on the terminal. Prompts go to stderr, answers come from stdin.
#[derive(Debug, Default)]
pub struct TerminalDialogs;

impl FileDialogs for TerminalDialogs {
    fn save_file(&self, request: &SaveDialog) -> Result<Option<PathBuf>, CoreError> {
        let label = format!("{} [{}] (q to cancel): ", request.title, request.default_name);
        Ok(match prompt(&label)? {
            None => None,
            Some(answer) if answer.is_empty() => Some(PathBuf::from(&request.default_name)),
            Some(answer) => Some(with_default_extension(PathBuf::from(answer), &request.filters)),
        })
    }

    fn open_file(&self, request: &OpenDialog) -> Result<Option<PathBuf>, CoreError> {
        let label = format!("{} (path, empty to cancel): ", request.title);
        let Some(answer) = prompt(&label)?.filter(|a| !a.is_empty()) else {
            return Ok(None);
        };
        let path = PathBuf::from(answer);
        if !path.is_file() {
            return Err(CoreError::Dialog(format!("no such file: {}", path.display())));
        }
        Ok(Some(path))
    }
}

/// Returns whatever was decided up front, e.g. from `--to`/`--from`; cancels otherwise.
#[derive(Debug, Default, Clone)]
pub struct PresetDialogs {
    pub save_to: Option<PathBuf>,
    pub open_from: Option<PathBuf>,
}

impl FileDialogs for PresetDialogs {
    fn save_file(&self, _: &SaveDialog) -> Result<Option<PathBuf>, CoreError> {
        Ok(self.save_to.clone())
    }

    fn open_file(&self, _: &OpenDialog) -> Result<Option<PathBuf>, CoreError> {
        Ok(self.open_from.clone())
    }
}

/// `None` on EOF or `q`, otherwise the trimmed line.
fn prompt(label: &str) -> Result<Option<String>, CoreError> {
    let mut err = stderr();
    write!(err, "{label}")?;
    err.flush()?;
    let mut line = String::new();
    if stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    if answer.eq_ignore_ascii_case("q") {
        return Ok(None);
    }
    Ok(Some(answer.to_string()))
}

// Mirrors native save dialogs, which append the first filter's extension.
fn with_default_extension(mut path: PathBuf, filters: &[FileFilter]) -> PathBuf {
    if path.extension().is_none() {
        if let Some(ext) = filters
            .first()
            .and_then(|f| f.extensions.first())
            .filter(|e| e.as_str() != "*")
        {
            path.set_extension(ext);
        }
    }
    path
}
