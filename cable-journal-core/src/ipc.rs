use crate::{
    BackupOutcome, CoreError, EntryCollection, ExportOutcome, Gateway, Reply, SaveOutcome,
};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    LoadData,
    SaveData,
    ExportData,
    ImportData,
    GetDataPath,
    BackupData,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::LoadData,
        Channel::SaveData,
        Channel::ExportData,
        Channel::ImportData,
        Channel::GetDataPath,
        Channel::BackupData,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::LoadData => "load-data",
            Channel::SaveData => "save-data",
            Channel::ExportData => "export-data",
            Channel::ImportData => "import-data",
            Channel::GetDataPath => "get-data-path",
            Channel::BackupData => "backup-data",
        }
    }

    /// Whether the channel needs an entry collection argument.
    pub fn takes_entries(self) -> bool {
        matches!(
            self,
            Channel::SaveData | Channel::ExportData | Channel::BackupData
        )
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::Invalid(format!("unknown channel: {s}")))
    }
}

/// Run one channel call and encode its reply.
///
/// An unusable entries argument is answered like any other failure of that
/// channel, `{"success":false,"error":...}`. `Err` only comes from encoding.
pub async fn invoke<G: Gateway + ?Sized>(
    gateway: &G,
    channel: Channel,
    arg: Option<Value>,
) -> Result<Value, CoreError> {
    let reply = match channel {
        Channel::LoadData => Value::Array(gateway.load_data().await),
        Channel::SaveData => match entries_arg(channel, arg) {
            Ok(entries) => serde_json::to_value(gateway.save_data(&entries).await)?,
            Err(error) => serde_json::to_value(SaveOutcome::Failed(error))?,
        },
        Channel::ExportData => match entries_arg(channel, arg) {
            Ok(entries) => serde_json::to_value(gateway.export_data(&entries).await)?,
            Err(error) => serde_json::to_value(ExportOutcome::Failed(error))?,
        },
        Channel::ImportData => serde_json::to_value(gateway.import_data().await)?,
        Channel::GetDataPath => Value::String(gateway.data_path().to_string_lossy().into_owned()),
        Channel::BackupData => match entries_arg(channel, arg) {
            Ok(entries) => serde_json::to_value(gateway.backup_data(&entries).await)?,
            Err(error) => serde_json::to_value(BackupOutcome::Failed(error))?,
        },
    };
    Ok(reply)
}

/// Reply for an entries channel whose argument never made it to the gateway,
/// e.g. a request body that is not JSON.
pub fn argument_failure(channel: Channel, error: impl fmt::Display) -> Value {
    let reply = Reply {
        error: Some(format!("{channel}: {error}")),
        ..Reply::default()
    };
    serde_json::to_value(reply).unwrap_or(Value::Null)
}

fn entries_arg(channel: Channel, arg: Option<Value>) -> Result<EntryCollection, String> {
    match arg {
        Some(Value::Array(entries)) => Ok(entries),
        Some(_) => Err(format!("{channel} expects a JSON array of entries")),
        None => Err(format!("{channel} requires an entries argument")),
    }
}
