//! Runtime configuration
//!
//! Read from `KARDIYO_*` environment variables, each with a default.

use std::path::PathBuf;

use crate::models::patient::FILE_NUMBER;

pub const DEFAULT_PATIENT_SHEET: &str = "H_Type_HT_Verileri";
pub const DEFAULT_CASE_SHEET: &str = "Vaka_Takip_Notlari";

/// Runtime configuration of the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    /// Worksheet holding one row per patient
    pub patient_sheet: String,
    /// Worksheet holding case follow-up notes
    pub case_sheet: String,
    /// Column identifying a patient
    pub key_field: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            database_path: non_empty("KARDIYO_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            patient_sheet: non_empty("KARDIYO_PATIENT_SHEET")
                .unwrap_or_else(|| DEFAULT_PATIENT_SHEET.to_string()),
            case_sheet: non_empty("KARDIYO_CASE_SHEET")
                .unwrap_or_else(|| DEFAULT_CASE_SHEET.to_string()),
            key_field: non_empty("KARDIYO_KEY_FIELD").unwrap_or_else(|| FILE_NUMBER.to_string()),
        }
    }
}

/// `<project root>/data/kardiyo.db`, located from the running executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(|target| target.parent()) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("kardiyo.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.patient_sheet, "H_Type_HT_Verileri");
        assert_eq!(config.case_sheet, "Vaka_Takip_Notlari");
        assert_eq!(config.key_field, "Dosya Numarası");
        assert!(config.database_path.ends_with("data/kardiyo.db"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("KARDIYO_DATABASE_PATH", "/tmp/test.db"),
            ("KARDIYO_PATIENT_SHEET", "Pilot"),
            ("KARDIYO_KEY_FIELD", "  "),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.database_path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.patient_sheet, "Pilot");
        assert_eq!(config.case_sheet, DEFAULT_CASE_SHEET);
        assert_eq!(config.key_field, FILE_NUMBER);
    }
}
