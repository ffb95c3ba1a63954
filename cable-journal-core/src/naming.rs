use chrono::{DateTime, SecondsFormat, Utc};

pub const DATA_FILE_NAME: &str = "cable_journal_data.json";
pub const BACKUPS_DIR_NAME: &str = "backups";

/// `cable_journal_<YYYY-MM-DD>.json`, dated in UTC.
pub fn export_default_name(now: DateTime<Utc>) -> String {
    format!("cable_journal_{}.json", now.format("%Y-%m-%d"))
}

/// `backup_<ISO-8601 with millis>.json` with `:` and `.` turned into `-`.
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    let iso = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    format!("backup_{}.json", iso.replace([':', '.'], "-"))
}

pub fn is_backup_file_name(name: &str) -> bool {
    name.starts_with("backup_") && name.ends_with(".json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn backup_name_sanitizes_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(backup_file_name(at), "backup_2024-03-09T14-05-07-042Z.json");
        assert!(is_backup_file_name(&backup_file_name(at)));
    }

    #[test]
    fn export_name_uses_date_only() {
        let at = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(export_default_name(at), "cable_journal_2025-12-31.json");
    }
}
